use crate::constants::TWINKLE_STAGGER_SECS;
use crate::easing::Easing;
use crate::starfield::StarPool;
use crate::state::{SharedStar, Star};
use crate::tween::{Repeat, TweenEngine, TweenId, TweenOptions};

fn opacity(star: &mut Star) -> &mut f64 {
    &mut star.opacity
}

/// Each star paired with the tween that animates its opacity. Owned by the
/// mount that registered them and cancelled as one step.
#[derive(Default)]
pub struct Twinkles {
    entries: Vec<(SharedStar, TweenId)>,
}

impl Twinkles {
    /// Start an endless yoyo for every star towards its own random opacity,
    /// staggered by index so the pool never flashes in sync.
    pub fn register(engine: &mut TweenEngine<Star>, pool: &StarPool, rng: &mut fastrand::Rng) -> Self {
        let entries = pool
            .stars()
            .iter()
            .enumerate()
            .map(|(i, star)| {
                let duration = star.borrow().twinkle_speed;
                let options = TweenOptions::new(duration)
                    .with_easing(Easing::SineInOut)
                    .with_repeat(Repeat::Forever)
                    .with_yoyo(true)
                    .with_delay(i as f64 * TWINKLE_STAGGER_SECS);
                let id = engine.to(star, opacity, rng.f64(), options);
                (star.clone(), id)
            })
            .collect();
        Self { entries }
    }

    /// Kill every tween aimed at a registered star, by star identity, and
    /// forget the stars. Returns the number of tweens removed.
    pub fn cancel(&mut self, engine: &mut TweenEngine<Star>) -> usize {
        let killed = self.entries.iter().map(|(star, _)| engine.kill_tweens_of(star)).sum();
        self.entries.clear();
        killed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TweenId> + '_ {
        self.entries.iter().map(|(_, id)| *id)
    }
}
