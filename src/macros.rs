/// Emit a line at an explicit level.
///
/// ```
/// let logger = evlog::Logger::new(None::<&std::path::Path>, 2);
/// evlog::log_at!(logger, 1, "accepted connection from {}", "10.0.0.7");
/// ```
///
/// The arguments are only evaluated and formatted if the level passes the
/// filter.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let __logger = &$logger;
        let __level: $crate::types::Level = $level;
        if __logger.enabled(__level) {
            __logger.emit(__level, ::std::format_args!($($arg)+));
        } else {
            __logger.note_suppressed();
        }
    }};
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::types::LEVEL_ERROR, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::types::LEVEL_WARN, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::types::LEVEL_INFO, $($arg)+) };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::types::LEVEL_DEBUG, $($arg)+) };
}

#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::types::LEVEL_TRACE, $($arg)+) };
}

#[cfg(test)]
mod tests {
    use crate::Logger;
    use std::fs;

    #[test]
    fn level_macros_respect_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macros.log");
        let logger = Logger::new(Some(&path), crate::types::LEVEL_INFO);

        log_error!(logger, "disk {} full", "/var");
        log_warn!(logger, "retrying");
        log_info!(logger, "{} peers", 4);
        log_debug!(logger, "not written");
        log_trace!(logger, "not written either");

        let content = fs::read_to_string(&path).unwrap();
        let messages: Vec<_> = content.lines().map(|l| &l[27..]).collect();
        assert_eq!(messages, vec!["disk /var full", "retrying", "4 peers"]);
    }

    #[test]
    fn suppressed_call_does_not_evaluate_arguments() {
        use std::cell::Cell;

        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new(Some(dir.path().join("lazy.log")), 0);
        let calls = Cell::new(0);
        let expensive = || {
            calls.set(calls.get() + 1);
            "peer table dump"
        };

        log_at!(logger, 9, "{}", expensive());
        assert_eq!(calls.get(), 0);
        assert_eq!(logger.stats().suppressed, 1);

        log_at!(logger, 0, "{}", expensive());
        assert_eq!(calls.get(), 1);
        assert_eq!(logger.stats().emitted, 1);
    }
}
