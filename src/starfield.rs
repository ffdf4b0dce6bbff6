use std::cell::RefCell;
use std::rc::Rc;
use crate::constants::*;
use crate::rng;
use crate::state::{SharedStar, Star};

/// Fixed-size set of background stars for one mount. Stars are never removed,
/// only carried around the torus by `step`.
#[derive(Debug, Default)]
pub struct StarPool {
    stars: Vec<SharedStar>,
}

impl StarPool {
    pub fn create(count: usize, w: f64, h: f64, rng: &mut fastrand::Rng) -> Self {
        let stars = (0..count)
            .map(|_| Rc::new(RefCell::new(new_star(w, h, rng))))
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[SharedStar] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

fn new_star(w: f64, h: f64, rng: &mut fastrand::Rng) -> Star {
    Star {
        x: rng.f64() * w.max(0.0),
        y: rng.f64() * h.max(0.0),
        radius: rng.f64() * STAR_MAX_RADIUS,
        opacity: rng.f64(),
        twinkle_speed: rng::in_span(rng, TWINKLE_MIN_SECS, TWINKLE_SPAN_SECS),
        vx: rng::centered(rng, STAR_MAX_DRIFT),
        vy: rng::centered(rng, STAR_MAX_DRIFT),
    }
}

/// Advance one star by its drift, wrapping each axis independently.
pub fn step(star: &mut Star, w: f64, h: f64) {
    star.x = wrap(star.x + star.vx, w);
    star.y = wrap(star.y + star.vy, h);
}

fn wrap(p: f64, extent: f64) -> f64 {
    let p = if p < 0.0 { p + extent } else { p };
    // also catches p + extent rounding up to extent for tiny negatives
    if p >= extent || p < 0.0 || p.is_nan() {
        0.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star_at(x: f64, y: f64, vx: f64, vy: f64) -> Star {
        Star { x, y, radius: 1.0, opacity: 1.0, twinkle_speed: 1.0, vx, vy }
    }

    #[test]
    fn create_fills_viewport() {
        let mut rng = rng::new_rng();
        let pool = StarPool::create(200, 800.0, 600.0, &mut rng);
        assert_eq!(pool.len(), 200);
        for s in pool.stars() {
            let s = s.borrow();
            assert!((0.0..800.0).contains(&s.x));
            assert!((0.0..600.0).contains(&s.y));
            assert!((0.0..2.0).contains(&s.radius));
            assert!((0.0..=1.0).contains(&s.opacity));
            assert!((0.5..2.5).contains(&s.twinkle_speed));
            assert!((-0.1..0.1).contains(&s.vx));
            assert!((-0.1..0.1).contains(&s.vy));
        }
    }

    #[test]
    fn create_on_zero_viewport_puts_everything_at_origin() {
        let mut rng = rng::new_rng();
        let pool = StarPool::create(5, 0.0, 0.0, &mut rng);
        assert_eq!(pool.len(), 5);
        assert!(pool.stars().iter().all(|s| s.borrow().x == 0.0 && s.borrow().y == 0.0));
    }

    #[test]
    fn step_moves_by_drift() {
        let mut s = star_at(10.0, 20.0, 0.05, -0.05);
        step(&mut s, 800.0, 600.0);
        assert!((s.x - 10.05).abs() < 1e-9);
        assert!((s.y - 19.95).abs() < 1e-9);
    }

    #[test]
    fn step_wraps_past_far_edge_to_zero() {
        let mut s = star_at(799.95, 599.95, 0.05, 0.09);
        step(&mut s, 800.0, 600.0);
        assert_eq!(s.x, 0.0);
        assert_eq!(s.y, 0.0);
    }

    #[test]
    fn step_wraps_below_zero_to_far_side() {
        let mut s = star_at(0.02, 0.0, -0.05, -0.01);
        step(&mut s, 800.0, 600.0);
        assert!(s.x > 799.0 && s.x < 800.0);
        assert!(s.y > 599.0 && s.y < 600.0);
    }

    #[test]
    fn step_keeps_any_position_inside_extent() {
        let cases = [
            (800.0, 600.0),
            (1e6, -1e6),
            (-1e-20, 0.0),
            (-0.0, 599.999_999),
            (f64::NAN, 12.0),
        ];
        for (x, y) in cases {
            let mut s = star_at(x, y, 0.0, 0.0);
            step(&mut s, 800.0, 600.0);
            assert!((0.0..800.0).contains(&s.x), "x {} -> {}", x, s.x);
            assert!((0.0..600.0).contains(&s.y), "y {} -> {}", y, s.y);
        }
    }
}
