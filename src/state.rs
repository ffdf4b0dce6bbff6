use std::cell::RefCell;
use std::rc::Rc;
use crate::canvas::Surface;
use crate::config::StarfieldConfig;
use crate::parallax::ParallaxTracker;
use crate::shooting::ShootingStars;
use crate::starfield::StarPool;
use crate::theme::Theme;

/// A background star. Position and drift are advanced by the render loop;
/// `opacity` belongs to the twinkle tweens.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub opacity: f64,
    pub twinkle_speed: f64, // seconds per half-cycle
    pub vx: f64,
    pub vy: f64,
}

/// Stars are shared between the render loop and the tween engine, so each one
/// lives behind its own cell and is identified by its allocation.
pub type SharedStar = Rc<RefCell<Star>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub speed: f64,
    pub angle: f64,
    pub opacity: f64,
    pub active: bool,
}

/// Pointer position mapped to `[-1, 1]` on each axis, centre of the viewport at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParallaxOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Everything one mount draws from. Owned by the lifecycle controller; the
/// frame, timer and pointer callbacks only hold weak references to it.
pub struct Scene<S> {
    pub surface: S,
    pub theme: Theme,
    pub config: StarfieldConfig,
    pub pool: StarPool,
    pub shooting: ShootingStars,
    pub parallax: ParallaxTracker,
    pub rng: fastrand::Rng,
}

pub type SharedScene<S> = Rc<RefCell<Scene<S>>>;

impl<S: Surface> Scene<S> {
    /// Build a fresh pool sized to the surface as it is now.
    pub fn new(surface: S, theme: Theme, config: StarfieldConfig) -> Self {
        let mut rng = crate::rng::new_rng();
        let size = surface.size();
        let pool = StarPool::create(config.star_count, size.width, size.height, &mut rng);
        let shooting = ShootingStars::new(config.max_shooting_stars);
        Self {
            surface,
            theme,
            config,
            pool,
            shooting,
            parallax: ParallaxTracker::default(),
            rng,
        }
    }

    pub fn spawn_shooting_star(&mut self) -> bool {
        let size = self.surface.size();
        self.shooting.try_spawn(size.width, size.height, &mut self.rng)
    }
}
