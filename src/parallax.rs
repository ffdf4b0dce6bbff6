use crate::host::PointerMove;
use crate::state::{ParallaxOffset, Viewport};

/// Map a pointer position to `[-1, 1]` per axis around the viewport centre.
/// A degenerate viewport yields no offset.
pub fn offset_from_pointer(client_x: f64, client_y: f64, viewport: Viewport) -> ParallaxOffset {
    if viewport.is_empty() {
        return ParallaxOffset::default();
    }
    ParallaxOffset {
        x: ((client_x / viewport.width - 0.5) * 2.0).clamp(-1.0, 1.0),
        y: ((client_y / viewport.height - 0.5) * 2.0).clamp(-1.0, 1.0),
    }
}

/// Draw-time shift for a star. Bigger stars read as nearer, so they move more.
pub fn draw_shift(offset: ParallaxOffset, radius: f64, factor: f64) -> (f64, f64) {
    (offset.x * radius * factor, offset.y * radius * factor)
}

/// Holds the last observed offset; starts centred.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallaxTracker {
    offset: ParallaxOffset,
}

impl ParallaxTracker {
    pub fn track(&mut self, ev: &PointerMove) {
        self.offset = offset_from_pointer(ev.client_x, ev.client_y, ev.viewport);
    }

    pub fn offset(&self) -> ParallaxOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport { width: 800.0, height: 600.0 };

    #[test]
    fn centre_and_corners() {
        assert_eq!(offset_from_pointer(400.0, 300.0, VP), ParallaxOffset { x: 0.0, y: 0.0 });
        assert_eq!(offset_from_pointer(0.0, 0.0, VP), ParallaxOffset { x: -1.0, y: -1.0 });
        assert_eq!(offset_from_pointer(800.0, 600.0, VP), ParallaxOffset { x: 1.0, y: 1.0 });
        assert_eq!(offset_from_pointer(600.0, 150.0, VP), ParallaxOffset { x: 0.5, y: -0.5 });
    }

    #[test]
    fn out_of_viewport_is_clamped() {
        let o = offset_from_pointer(-400.0, 1200.0, VP);
        assert_eq!((o.x, o.y), (-1.0, 1.0));
    }

    #[test]
    fn empty_viewport_gives_no_offset() {
        let o = offset_from_pointer(10.0, 10.0, Viewport::new(0.0, 600.0));
        assert_eq!(o, ParallaxOffset::default());
    }

    #[test]
    fn shift_scales_with_radius() {
        let o = ParallaxOffset { x: 1.0, y: -0.5 };
        assert_eq!(draw_shift(o, 2.0, 0.5), (1.0, -0.5));
        assert_eq!(draw_shift(o, 0.0, 0.5), (0.0, 0.0));
    }

    #[test]
    fn tracker_defaults_to_centre_and_follows_pointer() {
        let mut t = ParallaxTracker::default();
        assert_eq!(t.offset(), ParallaxOffset::default());
        t.track(&PointerMove { client_x: 800.0, client_y: 300.0, viewport: VP });
        assert_eq!(t.offset(), ParallaxOffset { x: 1.0, y: 0.0 });
    }
}
