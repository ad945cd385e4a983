//! evlog is a small file logger for daemons that run on an event loop.
//! Lines are filtered by severity, stamped with a microsecond timestamp and
//! either appended to the log file immediately or batched in memory and
//! flushed on a short timer borrowed from the host's reactor.

// Module declarations
#[macro_use]
pub mod macros;
pub mod error;
pub mod config;
pub mod logger;
pub mod reactor;
pub mod sink;
pub mod types;
pub mod utils;

// Re-exports
pub use error::{Error, Result};
pub use config::LoggerConfig;
pub use logger::{Logger, DEFAULT_FLUSH_INTERVAL};
pub use reactor::{ManualReactor, Reactor, TimerId, TokioReactor};
pub use sink::{FileSink, LogSink};
pub use types::{Level, LogStats, Mode};
