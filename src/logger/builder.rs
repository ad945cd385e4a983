// logger/builder.rs
use std::fmt::{self, Write as _};
use chrono::{DateTime, Local};

use crate::utils::buffer::ScratchBuffer;
use crate::utils::timestamp::write_timestamp;

/// Initial size of the message scratch area.
pub const DEFAULT_FORMAT_CAPACITY: usize = 32;
/// Initial size of the line assembly area.
pub const DEFAULT_BUILD_CAPACITY: usize = 64;

/// `fmt::Write` adapter that never writes past `limit` bytes but keeps
/// counting how many the full message needs.
struct BoundedWriter<'a> {
    out: &'a mut Vec<u8>,
    limit: usize,
    required: usize,
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit.saturating_sub(self.out.len());
        let take = room.min(s.len());
        self.out.extend_from_slice(&s.as_bytes()[..take]);
        self.required += s.len();
        Ok(())
    }
}

/// Assembles `"<timestamp> <message>\n"` in two stages: the message into the
/// format scratch, then timestamp + message + newline into the build scratch.
#[derive(Debug)]
pub struct MessageBuilder {
    format: ScratchBuffer,
    build: ScratchBuffer,
}

impl MessageBuilder {
    pub fn new(format_capacity: usize, build_capacity: usize) -> Self {
        assert!(format_capacity > 0, "format scratch needs a non-zero capacity");
        assert!(build_capacity > 0, "build scratch needs a non-zero capacity");
        Self {
            format: ScratchBuffer::with_capacity(format_capacity),
            build: ScratchBuffer::with_capacity(build_capacity),
        }
    }

    pub fn format_capacity(&self) -> usize {
        self.format.capacity()
    }

    pub fn build_capacity(&self) -> usize {
        self.build.capacity()
    }

    /// Format `args` into the message scratch and return its length.
    ///
    /// The first pass writes up to the current capacity. If the message
    /// needed more, the scratch grows to `required + 1` and the message is
    /// formatted once more, which then fits.
    pub fn format_message(&mut self, args: fmt::Arguments<'_>) -> usize {
        let required = self.format_pass(args);
        if required > self.format.capacity() {
            self.format.ensure_capacity(required + 1);
            let second = self.format_pass(args);
            debug_assert_eq!(second, required, "message changed length between passes");
        }
        self.format.len()
    }

    fn format_pass(&mut self, args: fmt::Arguments<'_>) -> usize {
        self.format.clear();
        let limit = self.format.capacity();
        let mut writer = BoundedWriter {
            out: self.format.vec_mut(),
            limit,
            required: 0,
        };
        // The adapter itself never errors, a Display impl might.
        let _ = writer.write_fmt(args);
        writer.required
    }

    /// Produce the finished line for `args` stamped with `now`.
    ///
    /// Returns `None` when the formatted message is empty; the scratch
    /// areas are left clean in that case.
    pub fn build_line(&mut self, now: &DateTime<Local>, args: fmt::Arguments<'_>) -> Option<&[u8]> {
        debug_assert!(self.build.is_empty(), "build scratch carried state across calls");

        if self.format_message(args) == 0 {
            self.reset();
            return None;
        }

        write_timestamp(self.build.vec_mut(), now);
        self.build.add(self.format.as_bytes());
        self.build.add(b"\n");
        self.format.clear();

        Some(self.build.as_bytes())
    }

    /// The line produced by the last `build_line`, until `reset`.
    pub fn line(&self) -> &[u8] {
        self.build.as_bytes()
    }

    /// Clear both scratch areas. Capacity is kept for reuse.
    pub fn reset(&mut self) {
        self.format.clear();
        self.build.clear();
    }

    pub fn is_clean(&self) -> bool {
        self.format.is_empty() && self.build.is_empty()
    }

    pub fn release(&mut self) {
        self.format.release();
        self.build.release();
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT_CAPACITY, DEFAULT_BUILD_CAPACITY)
    }
}
