use serde::Deserialize;
use crate::constants::*;

/// Tunables for the background. Every field falls back to its default, so a
/// partial JSON override is enough.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub star_count: usize,
    pub max_shooting_stars: usize,
    pub spawn_delay_min_ms: u32,
    pub spawn_delay_max_ms: u32,
    pub parallax_factor: f64,
    pub fade_step: f64,
    pub trail_alpha: f64,
    pub log_level: String,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: STAR_COUNT,
            max_shooting_stars: MAX_SHOOTING_STARS,
            spawn_delay_min_ms: SPAWN_DELAY_MIN_MS,
            spawn_delay_max_ms: SPAWN_DELAY_MAX_MS,
            parallax_factor: PARALLAX_FACTOR,
            fade_step: STREAK_FADE_STEP,
            trail_alpha: TRAIL_ALPHA,
            log_level: "info".to_string(),
        }
    }
}

impl StarfieldConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(raw).map(Self::validated)
    }

    pub fn validated(mut self) -> Self {
        if self.spawn_delay_min_ms > self.spawn_delay_max_ms {
            std::mem::swap(&mut self.spawn_delay_min_ms, &mut self.spawn_delay_max_ms);
        }
        self.parallax_factor = self.parallax_factor.max(0.0);
        // streaks must fade out eventually
        if self.fade_step.is_nan() || self.fade_step <= 0.0 {
            self.fade_step = STREAK_FADE_STEP;
        }
        self.trail_alpha = self.trail_alpha.clamp(0.0, 1.0);
        self
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Read overrides from `localStorage`. Missing key or no storage gives the defaults.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(CONFIG_STORAGE_KEY).ok().flatten());
        match raw {
            Some(raw) => Self::from_json(&raw).unwrap_or_else(|e| {
                log::warn!("ignoring malformed {}: {}", CONFIG_STORAGE_KEY, e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
