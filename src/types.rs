use serde::{Serialize, Deserialize};
use std::fmt;

/// Severity of a log call. Lower values are more important.
pub type Level = u16;

pub const LEVEL_ERROR: Level = 0;
pub const LEVEL_WARN: Level = 1;
pub const LEVEL_INFO: Level = 2;
pub const LEVEL_DEBUG: Level = 3;
pub const LEVEL_TRACE: Level = 4;

/// Where finished lines go once they are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Every line is appended to the file inside the call that produced it.
    Direct,
    /// Lines accumulate in memory until the flush timer fires.
    Buffered,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Direct => write!(f, "direct"),
            Mode::Buffered => write!(f, "buffered"),
        }
    }
}

/// Counters kept alongside the logger. Write failures never reach the
/// caller of `emit`, this is the only place they show up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStats {
    /// Lines that passed the level filter and were built.
    pub emitted: u64,
    /// Calls rejected by the level filter or by a missing destination.
    pub suppressed: u64,
    /// Successful appends to the sink.
    pub writes: u64,
    pub write_failures: u64,
    pub bytes_written: u64,
    /// Bytes lost to failed appends.
    pub dropped_bytes: u64,
    /// Calls whose formatted message came out empty.
    pub empty_messages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display() {
        assert_eq!(Mode::Direct.to_string(), "direct");
        assert_eq!(Mode::Buffered.to_string(), "buffered");
    }

    #[test]
    fn stats_serialize_to_json() {
        let stats = LogStats { emitted: 3, writes: 1, bytes_written: 96, ..Default::default() };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"emitted\":3"));
        assert!(json.contains("\"write_failures\":0"));
    }
}
