// src/config/buffering.rs

use serde::{Serialize, Deserialize};
use std::time::Duration;
use crate::error::{Error, Result};
use crate::logger::builder::{DEFAULT_BUILD_CAPACITY, DEFAULT_FORMAT_CAPACITY};
use super::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferingConfig {
    // Whether the host should attach an event loop after startup
    pub enabled: bool,

    // Delay between the first buffered line and the flush
    pub flush_interval_ms: u64,

    // Initial scratch sizes
    pub format_capacity: usize,
    pub build_capacity: usize,
    pub out_capacity: usize,
}

impl Default for BufferingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            flush_interval_ms: 1000,
            format_capacity: DEFAULT_FORMAT_CAPACITY,
            build_capacity: DEFAULT_BUILD_CAPACITY,
            out_capacity: 0,
        }
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.parse() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::config(format!("Invalid {} (must be > 0): {}", key, value))),
    }
}

impl FromIni for BufferingConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "buffering" {
            return None;
        }

        match key {
            "enabled" => {
                match value.parse() {
                    Ok(flag) => {
                        self.enabled = flag;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::config(format!("Invalid enabled value (must be true/false): {}", value)))),
                }
            },
            "flush_interval_ms" => {
                match value.parse() {
                    Ok(ms) if ms > 0 => {
                        self.flush_interval_ms = ms;
                        Some(Ok(()))
                    },
                    _ => Some(Err(Error::config(format!("Invalid flush_interval_ms (must be > 0): {}", value)))),
                }
            },
            "format_capacity" => Some(parse_positive(key, value).map(|n| self.format_capacity = n)),
            "build_capacity" => Some(parse_positive(key, value).map(|n| self.build_capacity = n)),
            "out_capacity" => {
                match value.parse() {
                    Ok(n) => {
                        self.out_capacity = n;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::config(format!("Invalid out_capacity: {}", value)))),
                }
            },
            _ => None,
        }
    }
}

impl BufferingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.flush_interval_ms == 0 {
            return Err(Error::config("flush_interval_ms must be greater than 0"));
        }
        if self.format_capacity == 0 || self.build_capacity == 0 {
            return Err(Error::config("format_capacity and build_capacity must be greater than 0"));
        }
        Ok(())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}
