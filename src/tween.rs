// Tween engine: animates one f64 field of shared objects over time.
//
// Targets are held weakly and matched by allocation, so callers can cancel
// everything aimed at an object without tracking handles:
//
//   let id = tweens.to(&star, |s| &mut s.opacity, 0.3, TweenOptions::new(1.5));
//   tweens.tick(dt);
//   tweens.kill_tweens_of(&star);

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use crate::easing::{ease, Easing};
use crate::frame_loop::{self, CancelToken, FrameTask};
use crate::host::Host;

/// Selects the animated field on the target.
pub type Field<T> = fn(&mut T) -> &mut f64;

pub type SharedTweens<T> = Rc<RefCell<TweenEngine<T>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Extra cycles after the first one.
    Count(u32),
    Forever,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenOptions {
    /// Seconds per cycle.
    pub duration: f64,
    pub easing: Easing,
    pub repeat: Repeat,
    /// Play every other cycle backwards.
    pub yoyo: bool,
    /// Seconds before the first cycle starts. The start value is read when it ends.
    pub delay: f64,
}

impl TweenOptions {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
            repeat: Repeat::Count(0),
            yoyo: false,
            delay: 0.0,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

struct Tween<T> {
    target: Weak<RefCell<T>>,
    field: Field<T>,
    from: Option<f64>,
    to: f64,
    options: TweenOptions,
    elapsed: f64,
}

impl<T> Tween<T> {
    /// Eased progress for the current time, and whether the last cycle is done.
    fn progress(&self, active: f64) -> (f64, bool) {
        let o = &self.options;
        let total = match o.repeat {
            Repeat::Count(n) => Some(n as f64 + 1.0),
            Repeat::Forever => None,
        };
        if o.duration <= 0.0 {
            return (1.0, total.is_some());
        }
        let raw = active / o.duration;
        let (cycle, t, finished) = match total {
            Some(total) if raw >= total => (total - 1.0, 1.0, true),
            _ => (raw.floor(), raw - raw.floor(), false),
        };
        let reversed = o.yoyo && (cycle as u64) % 2 == 1;
        (if reversed { 1.0 - t } else { t }, finished)
    }
}

pub struct TweenEngine<T> {
    tweens: HashMap<TweenId, Tween<T>>,
    next_id: u32,
}

impl<T> Default for TweenEngine<T> {
    fn default() -> Self {
        Self { tweens: HashMap::new(), next_id: 0 }
    }
}

impl<T> TweenEngine<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedTweens<T> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Animate `field` of `target` towards `value`.
    pub fn to(&mut self, target: &Rc<RefCell<T>>, field: Field<T>, value: f64, options: TweenOptions) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tweens.insert(id, Tween {
            target: Rc::downgrade(target),
            field,
            from: None,
            to: value,
            options,
            elapsed: 0.0,
        });
        id
    }

    pub fn kill(&mut self, id: TweenId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    /// Remove every tween aimed at `target`, matched by allocation. Returns how many went.
    pub fn kill_tweens_of(&mut self, target: &Rc<RefCell<T>>) -> usize {
        let before = self.tweens.len();
        let ptr = Rc::as_ptr(target);
        self.tweens.retain(|_, tw| tw.target.as_ptr() != ptr);
        before - self.tweens.len()
    }

    pub fn tweens_of(&self, target: &Rc<RefCell<T>>) -> usize {
        let ptr = Rc::as_ptr(target);
        self.tweens.values().filter(|tw| tw.target.as_ptr() == ptr).count()
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.tweens.contains_key(&id)
    }

    /// Advance every tween by `dt` seconds and write the new values.
    /// Finished tweens and tweens whose target is gone are dropped.
    /// Returns the number of tweens that finished.
    pub fn tick(&mut self, dt: f64) -> usize {
        let mut finished = Vec::new();
        let mut orphaned = Vec::new();

        for (&id, tween) in self.tweens.iter_mut() {
            tween.elapsed += dt;
            let active = tween.elapsed - tween.options.delay;
            if active < 0.0 {
                continue;
            }
            let Some(cell) = tween.target.upgrade() else {
                orphaned.push(id);
                continue;
            };
            let Ok(mut target) = cell.try_borrow_mut() else {
                continue;
            };
            let field = (tween.field)(&mut target);
            let from = *tween.from.get_or_insert(*field);
            let (t, done) = tween.progress(active);
            *field = ease(from, tween.to, t, tween.options.easing);
            if done {
                finished.push(id);
            }
        }

        for id in orphaned.iter().chain(finished.iter()) {
            self.tweens.remove(id);
        }
        finished.len()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

/// Drive `engine` from its own frame loop, independent of any renderer.
pub fn start_ticker<T: 'static, H: Host + 'static>(host: &Rc<H>, engine: SharedTweens<T>) -> FrameTask<H> {
    let mut last: Option<f64> = None;
    frame_loop::start(host, CancelToken::new(), move |timestamp| {
        // clamp long gaps (background tabs) so tweens resume instead of jumping
        let dt = last.map_or(0.0, |l| ((timestamp - l) / 1000.0).clamp(0.0, 0.1));
        last = Some(timestamp);
        if let Ok(mut e) = engine.try_borrow_mut() {
            e.tick(dt);
        }
    })
}
