// reactor/manual.rs
use std::cell::{Cell, RefCell};
use std::time::Duration;
use log::trace;

use super::{Reactor, TimerCallback, TimerId};

struct ManualTimer {
    id: TimerId,
    deadline: Duration,
    callback: TimerCallback,
}

/// Reactor driven by hand on a virtual clock. Nothing fires until
/// `advance` moves the clock past a timer's deadline.
pub struct ManualReactor {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    timers: RefCell<Vec<ManualTimer>>,
}

impl ManualReactor {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            next_id: Cell::new(1),
            timers: RefCell::new(Vec::new()),
        }
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move the clock forward by `by`, firing every timer that comes due in
    /// deadline order. Returns how many fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut fired = 0;

        while let Some(timer) = self.pop_due(target) {
            self.now.set(timer.deadline);
            trace!("Manual reactor firing timer {} at {:?}", timer.id.raw(), timer.deadline);
            // The timer list is not borrowed here, so the callback may arm
            // or cancel timers.
            (timer.callback)();
            fired += 1;
        }

        self.now.set(target);
        fired
    }

    /// Fire everything that is armed, advancing the clock as far as needed.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        loop {
            let next = self.timers.borrow().iter().map(|t| t.deadline).min();
            match next {
                Some(deadline) => {
                    fired += self.advance(deadline.saturating_sub(self.now.get()));
                }
                None => return fired,
            }
        }
    }

    fn pop_due(&self, target: Duration) -> Option<ManualTimer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= target)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;
        Some(timers.remove(index))
    }
}

impl Default for ManualReactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Reactor for ManualReactor {
    fn add_timer(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = TimerId::from_raw(self.next_id.get());
        self.next_id.set(id.raw() + 1);
        self.timers.borrow_mut().push(ManualTimer {
            id,
            deadline: self.now.get() + delay,
            callback,
        });
        id
    }

    fn cancel_timer(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |name: &'static str| -> TimerCallback {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn fires_only_when_due() {
        let reactor = ManualReactor::new();
        let (fired, cb) = recorder();
        reactor.add_timer(Duration::from_secs(1), cb("flush"));

        assert_eq!(reactor.advance(Duration::from_millis(999)), 0);
        assert!(fired.borrow().is_empty());

        assert_eq!(reactor.advance(Duration::from_millis(1)), 1);
        assert_eq!(*fired.borrow(), vec!["flush"]);
        assert_eq!(reactor.pending(), 0);
    }

    #[test]
    fn fires_in_deadline_order() {
        let reactor = ManualReactor::new();
        let (fired, cb) = recorder();
        reactor.add_timer(Duration::from_secs(3), cb("late"));
        reactor.add_timer(Duration::from_secs(1), cb("early"));

        assert_eq!(reactor.advance(Duration::from_secs(5)), 2);
        assert_eq!(*fired.borrow(), vec!["early", "late"]);
        assert_eq!(reactor.now(), Duration::from_secs(5));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let reactor = ManualReactor::new();
        let (fired, cb) = recorder();
        let id = reactor.add_timer(Duration::from_secs(1), cb("cancelled"));
        reactor.cancel_timer(id);

        assert_eq!(reactor.advance(Duration::from_secs(10)), 0);
        assert!(fired.borrow().is_empty());
    }

    #[test]
    fn callback_can_rearm() {
        let reactor = Rc::new(ManualReactor::new());
        let count = Rc::new(Cell::new(0));

        let inner = Rc::clone(&reactor);
        let counter = Rc::clone(&count);
        reactor.add_timer(Duration::from_secs(1), Box::new(move || {
            counter.set(counter.get() + 1);
            let counter = Rc::clone(&counter);
            inner.add_timer(Duration::from_secs(1), Box::new(move || counter.set(counter.get() + 1)));
        }));

        assert_eq!(reactor.run_until_idle(), 2);
        assert_eq!(count.get(), 2);
        assert_eq!(reactor.now(), Duration::from_secs(2));
    }
}
