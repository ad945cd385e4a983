// utils/timestamp.rs
use chrono::{DateTime, Local};
use std::io::Write;

/// Length of `YYYY-MM-DD HH:MM:SS.ffffff ` including the trailing space.
pub const TIMESTAMP_LEN: usize = 27;

/// Render `now` as the line prefix, microsecond precision, local time.
pub fn write_timestamp(out: &mut Vec<u8>, now: &DateTime<Local>) {
    // Writing into a Vec cannot fail.
    let _ = write!(out, "{} ", now.format("%Y-%m-%d %H:%M:%S%.6f"));
}
