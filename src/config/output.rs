// src/config/output.rs

use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::error::{Error, Result};
use crate::types::Level;
use super::FromIni;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    // Destination file. None disables logging entirely.
    pub filename: Option<PathBuf>,

    // Threshold: calls at or below this level are written
    pub level: Level,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: None,
            level: crate::types::LEVEL_INFO,
        }
    }
}

impl FromIni for OutputConfig {
    fn from_ini_section(&mut self, section_name: &str, key: &str, value: &str) -> Option<Result<()>> {
        if section_name != "output" {
            return None;
        }

        match key {
            "filename" | "file" => {
                let value = value.trim_matches('"');
                self.filename = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Some(Ok(()))
            },
            "level" => {
                match value.parse() {
                    Ok(level) => {
                        self.level = level;
                        Some(Ok(()))
                    },
                    Err(_) => Some(Err(Error::config(format!("Invalid level (must be a non-negative integer): {}", value)))),
                }
            },
            _ => None,
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref filename) = self.filename {
            if filename.as_os_str().is_empty() {
                return Err(Error::config("filename must not be empty"));
            }
        }
        Ok(())
    }
}
