use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use crate::state::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMove {
    pub client_x: f64,
    pub client_y: f64,
    pub viewport: Viewport,
}

/// Everything the background needs from the page: a frame clock, one-shot
/// timers and window listeners. Removal is always symmetric with registration
/// and safe to repeat.
pub trait Host {
    fn viewport(&self) -> Viewport;

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameId;
    fn cancel_frame(&self, id: FrameId);

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;
    fn clear_timeout(&self, id: TimerId);

    fn on_resize(&self, callback: Box<dyn FnMut(Viewport)>) -> ListenerId;
    fn on_pointer_move(&self, callback: Box<dyn FnMut(PointerMove)>) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

// A registered one-shot callback. `fired` flips after the callback returns, so
// an entry is never dropped from inside its own invocation.
struct Pending<T> {
    handle: T,
    fired: Rc<Cell<bool>>,
}

struct PendingFrame {
    raf_id: i32,
    _closure: Closure<dyn FnMut(f64)>,
}

struct Listener {
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// Browser implementation on top of `window`.
pub struct WebHost {
    window: web_sys::Window,
    next_id: Cell<u32>,
    frames: RefCell<HashMap<FrameId, Pending<PendingFrame>>>,
    timers: RefCell<HashMap<TimerId, Pending<gloo_timers::callback::Timeout>>>,
    listeners: RefCell<HashMap<ListenerId, Listener>>,
}

fn viewport_of(window: &web_sys::Window) -> Viewport {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(w, h)
}

impl WebHost {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        Some(Self {
            window,
            next_id: Cell::new(0),
            frames: RefCell::new(HashMap::new()),
            timers: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
        })
    }

    fn next(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }

    fn listen(&self, event: &'static str, closure: Closure<dyn FnMut(web_sys::Event)>) -> ListenerId {
        let id = ListenerId(self.next());
        let _ = self.window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        self.listeners.borrow_mut().insert(id, Listener { event, closure });
        id
    }
}

impl Host for WebHost {
    fn viewport(&self) -> Viewport {
        viewport_of(&self.window)
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameId {
        self.frames.borrow_mut().retain(|_, p| !p.fired.get());

        let id = FrameId(self.next());
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            if let Some(callback) = callback.take() {
                callback(timestamp);
            }
            flag.set(true);
        }) as Box<dyn FnMut(f64)>);
        match self.window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(raf_id) => {
                self.frames.borrow_mut().insert(id, Pending {
                    handle: PendingFrame { raf_id, _closure: closure },
                    fired,
                });
            }
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        if let Some(p) = self.frames.borrow_mut().remove(&id) {
            if !p.fired.get() {
                let _ = self.window.cancel_animation_frame(p.handle.raf_id);
            }
        }
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        self.timers.borrow_mut().retain(|_, p| !p.fired.get());

        let id = TimerId(self.next());
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let timeout = gloo_timers::callback::Timeout::new(delay_ms, move || {
            callback();
            flag.set(true);
        });
        self.timers.borrow_mut().insert(id, Pending { handle: timeout, fired });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        // dropping a gloo Timeout clears it
        self.timers.borrow_mut().remove(&id);
    }

    fn on_resize(&self, mut callback: Box<dyn FnMut(Viewport)>) -> ListenerId {
        let window = self.window.clone();
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            callback(viewport_of(&window));
        }) as Box<dyn FnMut(web_sys::Event)>);
        self.listen("resize", closure)
    }

    fn on_pointer_move(&self, mut callback: Box<dyn FnMut(PointerMove)>) -> ListenerId {
        let window = self.window.clone();
        let closure = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Some(e) = e.dyn_ref::<web_sys::MouseEvent>() {
                callback(PointerMove {
                    client_x: e.client_x() as f64,
                    client_y: e.client_y() as f64,
                    viewport: viewport_of(&window),
                });
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        self.listen("mousemove", closure)
    }

    fn remove_listener(&self, id: ListenerId) {
        if let Some(l) = self.listeners.borrow_mut().remove(&id) {
            let _ = self
                .window
                .remove_event_listener_with_callback(l.event, l.closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        for (_, p) in self.frames.borrow_mut().drain() {
            if !p.fired.get() {
                let _ = self.window.cancel_animation_frame(p.handle.raf_id);
            }
        }
        self.timers.borrow_mut().clear();
        for (_, l) in self.listeners.borrow_mut().drain() {
            let _ = self
                .window
                .remove_event_listener_with_callback(l.event, l.closure.as_ref().unchecked_ref());
        }
    }
}
