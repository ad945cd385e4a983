//! The logger: level filter, line builder and flush scheduler.
//!
//! In direct mode every line is appended to the sink inside the call that
//! produced it. Once a reactor is attached the logger switches to buffered
//! mode: lines accumulate in memory and a one-shot timer drains them in a
//! single append. Detaching cancels the timer and flushes what is pending
//! before returning.
//!
//! Sink failures are swallowed. They show up in [`LogStats`] and as a
//! `log::warn!` diagnostic, never as an error from `emit`.

pub mod builder;
pub mod filter;

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::time::Duration;
use chrono::Local;
use log::{debug, trace, warn};

use crate::config::{BufferingConfig, LoggerConfig};
use crate::reactor::{Reactor, TimerId};
use crate::sink::{FileSink, LogSink};
use crate::types::{Level, LogStats, Mode};
use crate::utils::buffer::ScratchBuffer;

pub use builder::MessageBuilder;
pub use filter::should_log;

/// Delay between the first buffered line and the flush that drains it.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// The armed flush timer. `serial` tells a late callback from the current one.
#[derive(Debug, Clone, Copy)]
struct PendingFlush {
    id: TimerId,
    serial: u64,
}

struct LoggerState {
    sink: Option<Box<dyn LogSink>>,
    filename: Option<PathBuf>,
    level: Level,
    reactor: Option<Rc<dyn Reactor>>,
    pending_timer: Option<PendingFlush>,
    timer_serial: u64,
    flush_interval: Duration,
    out: ScratchBuffer,
    // Lent out to `emit` while arguments are formatted.
    builder: Option<MessageBuilder>,
    stats: LogStats,
}

/// Append `bytes` to the sink, recording the outcome. Errors stop here.
fn write_through(sink: &mut Option<Box<dyn LogSink>>, stats: &mut LogStats, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let Some(sink) = sink.as_mut() else {
        stats.dropped_bytes += bytes.len() as u64;
        return;
    };

    match sink.append(bytes) {
        Ok(()) => {
            stats.writes += 1;
            stats.bytes_written += bytes.len() as u64;
        }
        Err(e) => {
            stats.write_failures += 1;
            stats.dropped_bytes += bytes.len() as u64;
            warn!("Dropped {} bytes of log output for {}: {}", bytes.len(), sink.describe(), e);
        }
    }
}

impl LoggerState {
    fn mode(&self) -> Mode {
        if self.reactor.is_some() {
            Mode::Buffered
        } else {
            Mode::Direct
        }
    }

    /// Drain the whole accumulation buffer in one append.
    fn flush_out(&mut self) {
        if self.out.is_empty() {
            return;
        }
        trace!("Flushing {} buffered bytes", self.out.len());
        write_through(&mut self.sink, &mut self.stats, self.out.as_bytes());
        self.out.clear();
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending_timer.take() {
            if let Some(reactor) = self.reactor.as_ref() {
                reactor.cancel_timer(pending.id);
                trace!("Cancelled flush timer {}", pending.id.raw());
            }
        }
    }

    fn on_timer(&mut self, serial: u64) {
        match self.pending_timer {
            Some(pending) if pending.serial == serial => self.pending_timer = None,
            _ => {
                // Fired after being cancelled; the reactor should have prevented it.
                debug!("Ignoring stale flush timer {}", serial);
                return;
            }
        }
        debug_assert!(!self.out.is_empty(), "flush timer armed with nothing buffered");
        self.flush_out();
    }
}

impl Drop for LoggerState {
    fn drop(&mut self) {
        if self.reactor.is_some() {
            debug!("Logger dropped while buffered, flushing {} bytes", self.out.len());
            self.cancel_pending();
            self.reactor = None;
        }
        self.flush_out();
    }
}

/// Handle to a logger. Clones share the same state; the handle is `!Send`,
/// the logger belongs to the thread that drives its reactor.
#[derive(Clone)]
pub struct Logger {
    state: Rc<RefCell<LoggerState>>,
}

impl Logger {
    /// Create a direct-mode logger writing to `filename`. With no filename
    /// every call is a no-op.
    pub fn new<P: AsRef<Path>>(filename: Option<P>, level: Level) -> Self {
        let filename = filename.map(|p| p.as_ref().to_path_buf());
        let sink = filename.as_ref().map(|p| Box::new(FileSink::new(p)) as Box<dyn LogSink>);
        Self::build(sink, filename, level, &BufferingConfig::default())
    }

    /// Create a logger around an arbitrary sink.
    pub fn with_sink(sink: Option<Box<dyn LogSink>>, level: Level) -> Self {
        Self::build(sink, None, level, &BufferingConfig::default())
    }

    pub fn from_config(config: &LoggerConfig) -> Self {
        let filename = config.output.filename.clone();
        let sink = filename.as_ref().map(|p| Box::new(FileSink::new(p)) as Box<dyn LogSink>);
        Self::build(sink, filename, config.output.level, &config.buffering)
    }

    fn build(
        sink: Option<Box<dyn LogSink>>,
        filename: Option<PathBuf>,
        level: Level,
        buffering: &BufferingConfig,
    ) -> Self {
        debug!(
            "Logger initialised: destination={}, level={}",
            sink.as_ref().map(|s| s.describe()).unwrap_or_else(|| "none".to_string()),
            level
        );
        let state = LoggerState {
            sink,
            filename,
            level,
            reactor: None,
            pending_timer: None,
            timer_serial: 0,
            flush_interval: buffering.flush_interval(),
            out: ScratchBuffer::with_capacity(buffering.out_capacity),
            builder: Some(MessageBuilder::new(buffering.format_capacity, buffering.build_capacity)),
            stats: LogStats::default(),
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Release the logger's buffers. Panics if a reactor is still attached;
    /// call [`Logger::detach`] first.
    pub fn teardown(self) {
        let mut state = self.state.borrow_mut();
        assert!(
            state.reactor.is_none() && state.pending_timer.is_none(),
            "logger torn down while still in buffered mode"
        );
        state.flush_out();
        state.out.release();
        if let Some(builder) = state.builder.as_mut() {
            builder.release();
        }
        debug!("Logger torn down");
    }

    /// Switch to buffered mode, borrowing `reactor` for the flush timer.
    /// Panics if a reactor is already attached.
    pub fn attach(&self, reactor: Rc<dyn Reactor>) {
        let mut state = self.state.borrow_mut();
        assert!(state.reactor.is_none(), "logger already attached to a reactor");
        debug_assert!(state.pending_timer.is_none());

        // Anything left from direct mode goes out before buffering starts.
        state.flush_out();
        state.reactor = Some(reactor);
        debug!("Logger switched to buffered mode, flush interval {:?}", state.flush_interval);
    }

    /// Switch back to direct mode. A pending timer is cancelled and buffered
    /// lines are written before this returns. Panics if not attached.
    pub fn detach(&self) {
        let mut state = self.state.borrow_mut();
        assert!(state.reactor.is_some(), "logger is not attached to a reactor");

        state.cancel_pending();
        state.reactor = None;
        state.flush_out();
        debug!("Logger switched to direct mode");
    }

    /// Write out anything buffered now rather than waiting for the timer.
    pub fn flush(&self) {
        let mut state = self.state.borrow_mut();
        state.cancel_pending();
        state.flush_out();
    }

    pub fn set_level(&self, level: Level) {
        self.state.borrow_mut().level = level;
    }

    pub fn inc_level(&self) {
        let mut state = self.state.borrow_mut();
        state.level = state.level.saturating_add(1);
    }

    /// Lower the threshold by one. At zero this does nothing.
    pub fn dec_level(&self) {
        let mut state = self.state.borrow_mut();
        state.level = state.level.saturating_sub(1);
    }

    pub fn level(&self) -> Level {
        self.state.borrow().level
    }

    /// Change the delay used for timers armed from now on.
    pub fn set_flush_interval(&self, interval: Duration) {
        self.state.borrow_mut().flush_interval = interval;
    }

    pub fn flush_interval(&self) -> Duration {
        self.state.borrow().flush_interval
    }

    /// Whether a call at `level` would currently be written. Useful to skip
    /// computing expensive arguments.
    pub fn enabled(&self, level: Level) -> bool {
        let state = self.state.borrow();
        should_log(level, state.level, state.sink.is_some())
    }

    pub fn mode(&self) -> Mode {
        self.state.borrow().mode()
    }

    pub fn is_buffered(&self) -> bool {
        self.mode() == Mode::Buffered
    }

    /// True while a flush timer is armed.
    pub fn has_pending_flush(&self) -> bool {
        self.state.borrow().pending_timer.is_some()
    }

    /// Bytes waiting in the accumulation buffer.
    pub fn pending_bytes(&self) -> usize {
        self.state.borrow().out.len()
    }

    pub fn filename(&self) -> Option<PathBuf> {
        self.state.borrow().filename.clone()
    }

    pub fn stats(&self) -> LogStats {
        self.state.borrow().stats
    }

    /// Emit one line at `level`. Prefer the [`log_at!`](crate::log_at) macro.
    ///
    /// The level check happens before `args` is formatted. Formatting runs
    /// without the logger borrowed, so a `Display` impl may itself use the
    /// logger; a nested line is written before the outer one.
    pub fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let (mut builder, lent) = {
            let mut state = self.state.borrow_mut();
            if !should_log(level, state.level, state.sink.is_some()) {
                state.stats.suppressed += 1;
                return;
            }
            match state.builder.take() {
                Some(builder) => (builder, true),
                // A nested call while the outer one is formatting.
                None => (MessageBuilder::default(), false),
            }
        };

        let now = Local::now();
        let built = builder.build_line(&now, args).is_some();

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        if built {
            state.stats.emitted += 1;
            let line = builder.line();
            match state.reactor.as_ref() {
                None => {
                    debug_assert!(state.out.is_empty(), "buffered lines left behind in direct mode");
                    write_through(&mut state.sink, &mut state.stats, line);
                }
                Some(reactor) => {
                    state.out.add(line);
                    if state.pending_timer.is_none() {
                        state.timer_serial += 1;
                        let serial = state.timer_serial;
                        let weak = Rc::downgrade(&self.state);
                        let id = reactor.add_timer(state.flush_interval, flush_callback(weak, serial));
                        trace!("Armed flush timer {} for {:?}", id.raw(), state.flush_interval);
                        state.pending_timer = Some(PendingFlush { id, serial });
                    }
                }
            }
        } else {
            state.stats.empty_messages += 1;
            warn!("Dropped a log call at level {} whose message was empty", level);
        }

        builder.reset();
        if lent {
            state.builder = Some(builder);
        }
        drop(guard);
        debug_assert!(built, "log message formatted to an empty string");
    }

    /// Count a call rejected before its arguments were evaluated.
    #[doc(hidden)]
    pub fn note_suppressed(&self) {
        self.state.borrow_mut().stats.suppressed += 1;
    }
}

fn flush_callback(state: Weak<RefCell<LoggerState>>, serial: u64) -> Box<dyn FnOnce()> {
    Box::new(move || {
        if let Some(state) = state.upgrade() {
            state.borrow_mut().on_timer(serial);
        }
    })
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Logger")
            .field("filename", &state.filename)
            .field("level", &state.level)
            .field("mode", &state.mode())
            .field("pending_bytes", &state.out.len())
            .field("pending_timer", &state.pending_timer.map(|p| p.id))
            .finish()
    }
}
