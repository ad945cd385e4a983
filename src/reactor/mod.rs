//! The event loop the logger borrows its flush timer from.
//!
//! A reactor only has to arm one-shot timers and cancel them again. Callbacks
//! must run from the reactor's own dispatch, never from inside
//! `add_timer`/`cancel_timer`.

pub mod manual;
pub mod tokio_reactor;

use std::time::Duration;

pub use self::manual::ManualReactor;
pub use self::tokio_reactor::TokioReactor;

/// Handle for an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn from_raw(raw: u64) -> Self {
        TimerId(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

pub type TimerCallback = Box<dyn FnOnce()>;

pub trait Reactor {
    /// Arm a one-shot timer that runs `callback` after `delay`.
    fn add_timer(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Disarm a timer. Cancelling a timer that already fired is a no-op.
    fn cancel_timer(&self, id: TimerId);
}
