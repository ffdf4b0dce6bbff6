mod app;
mod canvas;
mod config;
mod constants;
mod easing;
mod frame_loop;
mod host;
mod lifecycle;
mod parallax;
mod renderer;
mod rng;
mod shooting;
mod starfield;
mod state;
mod theme;
mod tween;
mod twinkle;

use leptos::prelude::*;
use app::App;

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = config::StarfieldConfig::load();
    log::set_max_level(config.log_level().to_level_filter());
    log::info!("starfield-client: starting ({} stars)", config.star_count);

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
