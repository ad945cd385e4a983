// reactor/tokio_reactor.rs
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use log::trace;
use tokio::task::JoinHandle;

use super::{Reactor, TimerCallback, TimerId};

/// Reactor backed by the tokio runtime. Each timer is a local task sleeping
/// until its deadline; cancelling aborts the task.
///
/// Timers are spawned with `spawn_local`, so the reactor must be used from
/// inside a `tokio::task::LocalSet`.
pub struct TokioReactor {
    next_id: Cell<u64>,
    tasks: Rc<RefCell<HashMap<TimerId, JoinHandle<()>>>>,
}

impl TokioReactor {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            tasks: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Default for TokioReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reactor for TokioReactor {
    fn add_timer(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId::from_raw(self.next_id.get());
        self.next_id.set(id.raw() + 1);

        let tasks = Rc::downgrade(&self.tasks);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if let Some(tasks) = tasks.upgrade() {
                tasks.borrow_mut().remove(&id);
            }
            trace!("Tokio reactor firing timer {}", id.raw());
            callback();
        });

        // The task cannot run before this insert, spawn_local only queues it.
        self.tasks.borrow_mut().insert(id, handle);
        id
    }

    fn cancel_timer(&self, id: TimerId) {
        if let Some(handle) = self.tasks.borrow_mut().remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioReactor {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.borrow_mut().drain() {
            handle.abort();
        }
    }
}
