// Star pool
pub const STAR_COUNT: usize = 200;
pub const STAR_MAX_RADIUS: f64 = 2.0;
pub const STAR_MAX_DRIFT: f64 = 0.1; // px per frame, each axis
pub const TWINKLE_MIN_SECS: f64 = 0.5;
pub const TWINKLE_SPAN_SECS: f64 = 2.0;
pub const TWINKLE_STAGGER_SECS: f64 = 0.01;

// Shooting stars
pub const MAX_SHOOTING_STARS: usize = 3;
pub const SPAWN_DELAY_MIN_MS: u32 = 2000;
pub const SPAWN_DELAY_MAX_MS: u32 = 5000;
pub const STREAK_MIN_LENGTH: f64 = 80.0;
pub const STREAK_LENGTH_SPAN: f64 = 100.0;
pub const STREAK_MIN_SPEED: f64 = 10.0;
pub const STREAK_SPEED_SPAN: f64 = 10.0;
pub const STREAK_ANGLE_SPREAD: f64 = 0.5; // radians, centred on PI/4
pub const STREAK_FADE_STEP: f64 = 0.01;
pub const STREAK_WIDTH: f64 = 2.0;

// Rendering
pub const PARALLAX_FACTOR: f64 = 0.5;
pub const TRAIL_ALPHA: f64 = 0.05;

// Storage keys
pub const THEME_STORAGE_KEY: &str = "theme";
pub const CONFIG_STORAGE_KEY: &str = "starfield_config";
