use crate::canvas::Surface;
use crate::constants::STREAK_WIDTH;
use crate::state::{Scene, Viewport};
use crate::{parallax, shooting, starfield};

/// One frame: fade wash, stars (drawn, then stepped), then streaks (drawn,
/// advanced, dropped when spent). A zero-sized surface draws and moves nothing.
pub fn render_frame<S: Surface>(scene: &mut Scene<S>) {
    let Viewport { width: w, height: h } = scene.surface.size();
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let palette = scene.theme.palette();

    scene
        .surface
        .fill_rect(0.0, 0.0, w, h, &palette.trail.with_alpha(scene.config.trail_alpha));

    let offset = scene.parallax.offset();
    let factor = scene.config.parallax_factor;
    for star in scene.pool.stars() {
        let mut s = star.borrow_mut();
        let (dx, dy) = parallax::draw_shift(offset, s.radius, factor);
        let color = palette.star.with_alpha(s.opacity * palette.star_alpha);
        scene.surface.fill_circle(s.x + dx, s.y + dy, s.radius, &color);
        starfield::step(&mut s, w, h);
    }

    let fade = scene.config.fade_step;
    let tail_color = palette.streak.with_alpha(0.0);
    let surface = &mut scene.surface;
    scene.shooting.retain_mut(|streak| {
        if !streak.active {
            return true;
        }
        let head_color = palette.streak.with_alpha(streak.opacity * palette.streak_alpha);
        surface.stroke_streak(
            (streak.x, streak.y),
            shooting::tail(streak),
            &head_color,
            &tail_color,
            STREAK_WIDTH,
        );
        shooting::advance(streak, fade);
        !shooting::is_expired(streak, w, h)
    });
}
