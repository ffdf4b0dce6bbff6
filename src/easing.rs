use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    /// Slow at both ends; the twinkle curve.
    SineInOut,
}

impl Easing {
    /// Map normalized time in `[0, 1]` to eased progress in `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-12, "{:?}", e);
            assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{:?}", e);
        }
    }

    #[test]
    fn sine_in_out_is_symmetric() {
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-12);
        let a = Easing::SineInOut.apply(0.2);
        let b = Easing::SineInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(a < 0.2, "slow start expected, got {}", a);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-3.0), 0.0);
        assert_eq!(Easing::Linear.apply(7.0), 1.0);
    }

    #[test]
    fn ease_interpolates() {
        assert!((ease(0.2, 0.8, 0.5, Easing::Linear) - 0.5).abs() < 1e-12);
    }
}
