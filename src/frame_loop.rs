use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use crate::host::{FrameId, Host};

/// Shared stop flag. Every callback that can outlive its owner checks it first.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

struct Task {
    token: CancelToken,
    pending: Cell<Option<FrameId>>,
    on_frame: RefCell<Box<dyn FnMut(f64)>>,
}

/// A callback re-armed once per frame until cancelled. Each frame schedules
/// the next one only after checking the token, so cancellation never races a
/// reschedule. Dropping the handle cancels.
pub struct FrameTask<H: Host + 'static> {
    host: Weak<H>,
    task: Rc<Task>,
}

pub fn start<H: Host + 'static>(
    host: &Rc<H>,
    token: CancelToken,
    on_frame: impl FnMut(f64) + 'static,
) -> FrameTask<H> {
    let task = Rc::new(Task {
        token,
        pending: Cell::new(None),
        on_frame: RefCell::new(Box::new(on_frame)),
    });
    let host = Rc::downgrade(host);
    schedule(&host, &task);
    FrameTask { host, task }
}

fn schedule<H: Host + 'static>(host: &Weak<H>, task: &Rc<Task>) {
    if task.token.is_cancelled() {
        return;
    }
    let Some(h) = host.upgrade() else { return };
    let next_host = host.clone();
    let next_task = task.clone();
    let id = h.request_frame(Box::new(move |timestamp| {
        next_task.pending.set(None);
        if next_task.token.is_cancelled() {
            return;
        }
        if let Ok(mut f) = next_task.on_frame.try_borrow_mut() {
            f(timestamp);
        }
        schedule(&next_host, &next_task);
    }));
    task.pending.set(Some(id));
}

impl<H: Host + 'static> FrameTask<H> {
    pub fn cancel(&self) {
        self.task.token.cancel();
        if let Some(id) = self.task.pending.take() {
            if let Some(h) = self.host.upgrade() {
                h.cancel_frame(id);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.token.is_cancelled()
    }
}

impl<H: Host + 'static> Drop for FrameTask<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeHost;

    #[test]
    fn reschedules_every_frame() {
        let host = Rc::new(FakeHost::new(10.0, 10.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _task = start(&host, CancelToken::new(), move |ts| s.borrow_mut().push(ts));

        for ts in [16.0, 32.0, 48.0] {
            assert_eq!(host.pending_frames(), 1);
            host.run_frame(ts);
        }
        assert_eq!(*seen.borrow(), vec![16.0, 32.0, 48.0]);
    }

    #[test]
    fn cancel_stops_and_is_idempotent() {
        let host = Rc::new(FakeHost::new(10.0, 10.0));
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let task = start(&host, CancelToken::new(), move |_| c.set(c.get() + 1));

        host.run_frame(0.0);
        task.cancel();
        task.cancel();
        assert!(!task.is_running());
        assert_eq!(host.pending_frames(), 0);
        host.run_frame(16.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn external_token_stops_before_reschedule() {
        let host = Rc::new(FakeHost::new(10.0, 10.0));
        let token = CancelToken::new();
        let inner = token.clone();
        let _task = start(&host, token, move |_| inner.cancel());

        host.run_frame(0.0);
        assert_eq!(host.pending_frames(), 0);
    }
}
