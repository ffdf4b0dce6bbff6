use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use crate::canvas::Surface;
use crate::config::StarfieldConfig;
use crate::frame_loop::{self, CancelToken, FrameTask};
use crate::host::{Host, ListenerId, TimerId};
use crate::renderer;
use crate::shooting;
use crate::state::{Scene, SharedScene, Star};
use crate::theme::Theme;
use crate::tween::SharedTweens;
use crate::twinkle::Twinkles;

type TimerSlot = Rc<Cell<Option<TimerId>>>;

// Everything acquired by one mount. Released together by `Starfield::teardown`.
struct Mounted<H: Host + 'static, S> {
    scene: SharedScene<S>,
    token: CancelToken,
    frame: FrameTask<H>,
    spawn_timer: TimerSlot,
    listeners: [ListenerId; 2],
    twinkles: Twinkles,
}

/// Owns one live background: scene, render loop, spawn timer, listeners and
/// twinkle tweens. Teardown releases all of them in one pass; dropping the
/// controller tears down too.
pub struct Starfield<H: Host + 'static, S: Surface + 'static> {
    host: Rc<H>,
    tweens: SharedTweens<Star>,
    mounted: Option<Mounted<H, S>>,
}

impl<H: Host + 'static, S: Surface + 'static> Starfield<H, S> {
    pub fn mount(
        host: Rc<H>,
        tweens: SharedTweens<Star>,
        mut surface: S,
        theme: Theme,
        config: StarfieldConfig,
    ) -> Self {
        let viewport = host.viewport();
        surface.resize(viewport);

        let scene = Rc::new(RefCell::new(Scene::new(surface, theme, config)));
        let token = CancelToken::new();

        let twinkles = {
            let mut sc = scene.borrow_mut();
            let sc = &mut *sc;
            Twinkles::register(&mut tweens.borrow_mut(), &sc.pool, &mut sc.rng)
        };

        let weak = Rc::downgrade(&scene);
        let resize = {
            let (weak, token) = (weak.clone(), token.clone());
            host.on_resize(Box::new(move |vp| {
                if token.is_cancelled() {
                    return;
                }
                if let Some(sc) = weak.upgrade() {
                    sc.borrow_mut().surface.resize(vp);
                    log::debug!("starfield resized to {}x{}", vp.width, vp.height);
                }
            }))
        };
        let pointer = {
            let (weak, token) = (weak.clone(), token.clone());
            host.on_pointer_move(Box::new(move |ev| {
                if token.is_cancelled() {
                    return;
                }
                if let Some(sc) = weak.upgrade() {
                    sc.borrow_mut().parallax.track(&ev);
                }
            }))
        };

        let spawn_timer: TimerSlot = Rc::new(Cell::new(None));
        arm_spawn_timer(&host, &weak, &token, &spawn_timer);

        let frame = {
            let weak = weak.clone();
            frame_loop::start(&host, token.clone(), move |_timestamp| {
                if let Some(sc) = weak.upgrade() {
                    if let Ok(mut sc) = sc.try_borrow_mut() {
                        renderer::render_frame(&mut sc);
                    }
                }
            })
        };

        log::info!(
            "starfield mounted: {}x{}, {:?}, {} stars",
            viewport.width,
            viewport.height,
            theme,
            twinkles.len()
        );

        Self {
            host,
            tweens,
            mounted: Some(Mounted {
                scene,
                token,
                frame,
                spawn_timer,
                listeners: [resize, pointer],
                twinkles,
            }),
        }
    }

    /// Stop the loop, clear the spawn timer, drop both listeners, kill the
    /// twinkles of this pool and discard the shooting stars. Safe to repeat.
    pub fn teardown(&mut self) {
        let Some(mut m) = self.mounted.take() else { return };

        m.token.cancel();
        m.frame.cancel();
        if let Some(id) = m.spawn_timer.take() {
            self.host.clear_timeout(id);
        }
        for id in m.listeners {
            self.host.remove_listener(id);
        }
        let killed = match self.tweens.try_borrow_mut() {
            Ok(mut engine) => m.twinkles.cancel(&mut engine),
            Err(_) => {
                // the tweens hold the stars weakly, so they die with the scene anyway
                log::warn!("tween engine busy during teardown");
                0
            }
        };
        if let Ok(mut sc) = m.scene.try_borrow_mut() {
            sc.shooting.clear();
        }
        log::info!("starfield torn down, {} twinkles cancelled", killed);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn scene(&self) -> Option<SharedScene<S>> {
        self.mounted.as_ref().map(|m| m.scene.clone())
    }
}

impl<H: Host + 'static, S: Surface + 'static> Drop for Starfield<H, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One-shot timer that spawns (if there is room) and re-arms itself with a
/// fresh random delay, until the token is cancelled.
fn arm_spawn_timer<H: Host + 'static, S: Surface + 'static>(
    host: &Rc<H>,
    scene: &Weak<RefCell<Scene<S>>>,
    token: &CancelToken,
    slot: &TimerSlot,
) {
    if token.is_cancelled() {
        return;
    }
    let Some(sc) = scene.upgrade() else { return };
    let delay = {
        let mut sc = sc.borrow_mut();
        let sc = &mut *sc;
        shooting::next_spawn_delay(&sc.config, &mut sc.rng)
    };

    let (next_host, next_scene, next_token, next_slot) =
        (Rc::downgrade(host), scene.clone(), token.clone(), slot.clone());
    let id = host.set_timeout(delay, Box::new(move || {
        next_slot.set(None);
        if next_token.is_cancelled() {
            return;
        }
        let Some(sc) = next_scene.upgrade() else { return };
        sc.borrow_mut().spawn_shooting_star();
        drop(sc);
        if let Some(host) = next_host.upgrade() {
            arm_spawn_timer(&host, &next_scene, &next_token, &next_slot);
        }
    }));
    slot.set(Some(id));
}
