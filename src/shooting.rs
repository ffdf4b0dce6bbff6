use std::f64::consts::FRAC_PI_4;
use crate::config::StarfieldConfig;
use crate::constants::*;
use crate::rng;
use crate::state::ShootingStar;

/// Active shooting stars plus the capacity that bounds them.
#[derive(Debug, Default)]
pub struct ShootingStars {
    active: Vec<ShootingStar>,
    capacity: usize,
}

impl ShootingStars {
    pub fn new(capacity: usize) -> Self {
        Self { active: Vec::with_capacity(capacity), capacity }
    }

    /// Add a fresh streak unless the set is full. Full means dropped, not queued.
    pub fn try_spawn(&mut self, w: f64, h: f64, rng: &mut fastrand::Rng) -> bool {
        if self.active.len() >= self.capacity {
            log::trace!("shooting star skipped: {} active", self.active.len());
            return false;
        }
        self.active.push(new_shooting_star(w, h, rng));
        log::debug!("shooting star spawned ({} active)", self.active.len());
        true
    }

    pub fn push(&mut self, star: ShootingStar) {
        if self.active.len() < self.capacity {
            self.active.push(star);
        }
    }

    /// Visit every live streak exactly once; `f` returns false to drop it.
    /// Removals are applied by `retain_mut`, so the pass never skips or revisits.
    pub fn retain_mut(&mut self, f: impl FnMut(&mut ShootingStar) -> bool) {
        self.active.retain_mut(f);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShootingStar> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

pub fn new_shooting_star(w: f64, h: f64, rng: &mut fastrand::Rng) -> ShootingStar {
    ShootingStar {
        x: rng.f64() * w.max(0.0),
        y: rng.f64() * h.max(0.0) / 2.0,
        length: rng::in_span(rng, STREAK_MIN_LENGTH, STREAK_LENGTH_SPAN),
        speed: rng::in_span(rng, STREAK_MIN_SPEED, STREAK_SPEED_SPAN),
        angle: FRAC_PI_4 + rng::centered(rng, STREAK_ANGLE_SPREAD / 2.0),
        opacity: 1.0,
        active: true,
    }
}

/// Move one frame along the heading and fade.
pub fn advance(star: &mut ShootingStar, fade_step: f64) {
    star.x += star.angle.cos() * star.speed;
    star.y += star.angle.sin() * star.speed;
    star.opacity -= fade_step;
}

/// Motion is down-and-right only, so only the far edges can be crossed.
pub fn is_expired(star: &ShootingStar, w: f64, h: f64) -> bool {
    star.x > w || star.y > h || star.opacity <= 0.0
}

/// Point the streak tail trails back to.
pub fn tail(star: &ShootingStar) -> (f64, f64) {
    (
        star.x - star.angle.cos() * star.length,
        star.y - star.angle.sin() * star.length,
    )
}

/// Delay before the next spawn attempt, drawn fresh for every firing.
pub fn next_spawn_delay(config: &StarfieldConfig, rng: &mut fastrand::Rng) -> u32 {
    let (min, max) = (config.spawn_delay_min_ms, config.spawn_delay_max_ms);
    if max <= min {
        return min;
    }
    rng.u32(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streak(x: f64, y: f64, angle: f64, speed: f64, opacity: f64) -> ShootingStar {
        ShootingStar { x, y, length: 100.0, speed, angle, opacity, active: true }
    }

    #[test]
    fn spawn_respects_capacity() {
        let mut rng = rng::new_rng();
        let mut set = ShootingStars::new(3);
        for i in 0..10 {
            let spawned = set.try_spawn(800.0, 600.0, &mut rng);
            assert_eq!(spawned, i < 3);
            assert!(set.len() <= 3);
        }
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn push_is_capped_too() {
        let mut set = ShootingStars::new(1);
        set.push(streak(0.0, 0.0, FRAC_PI_4, 10.0, 1.0));
        set.push(streak(1.0, 1.0, FRAC_PI_4, 10.0, 1.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn new_star_attributes_in_range() {
        let mut rng = rng::new_rng();
        for _ in 0..500 {
            let s = new_shooting_star(800.0, 600.0, &mut rng);
            assert!((0.0..800.0).contains(&s.x));
            assert!((0.0..300.0).contains(&s.y));
            assert!((80.0..180.0).contains(&s.length));
            assert!((10.0..20.0).contains(&s.speed));
            assert!((s.angle - FRAC_PI_4).abs() <= 0.25);
            assert_eq!(s.opacity, 1.0);
            assert!(s.active);
        }
    }

    #[test]
    fn advance_moves_along_heading_and_fades() {
        let mut s = streak(100.0, 100.0, FRAC_PI_4, 10.0, 1.0);
        advance(&mut s, 0.01);
        assert!((s.x - 107.07).abs() < 0.01);
        assert!((s.y - 107.07).abs() < 0.01);
        assert_eq!(s.opacity, 1.0 - 0.01);
    }

    #[test]
    fn expiry_rules() {
        assert!(is_expired(&streak(801.0, 10.0, FRAC_PI_4, 10.0, 0.5), 800.0, 600.0));
        assert!(is_expired(&streak(10.0, 601.0, FRAC_PI_4, 10.0, 0.5), 800.0, 600.0));
        assert!(is_expired(&streak(10.0, 10.0, FRAC_PI_4, 10.0, 0.0), 800.0, 600.0));
        // negative coordinates are not an exit
        assert!(!is_expired(&streak(-50.0, -50.0, FRAC_PI_4, 10.0, 0.5), 800.0, 600.0));
        // on the edge is still inside
        assert!(!is_expired(&streak(800.0, 600.0, FRAC_PI_4, 10.0, 0.5), 800.0, 600.0));
    }

    #[test]
    fn tail_points_back_along_heading() {
        let s = streak(100.0, 100.0, 0.0, 10.0, 1.0);
        let (tx, ty) = tail(&s);
        assert!((tx - 0.0).abs() < 1e-9);
        assert!((ty - 100.0).abs() < 1e-9);
    }

    #[test]
    fn spawn_delay_in_configured_window() {
        let mut rng = rng::new_rng();
        let config = StarfieldConfig::default();
        for _ in 0..1000 {
            let d = next_spawn_delay(&config, &mut rng);
            assert!((2000..5000).contains(&d));
        }
        let fixed = StarfieldConfig { spawn_delay_min_ms: 1000, spawn_delay_max_ms: 1000, ..config };
        assert_eq!(next_spawn_delay(&fixed, &mut rng), 1000);
    }
}
