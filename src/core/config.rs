//! Worker configuration values
//!
//! Both structs are plain serde values so they can be filled from whatever
//! flag or file parser the application uses.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::message::TRUNCATION_MARKER;
use super::queue::{validate_capacity, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default limit on message text, in bytes
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Queue capacity; must be a power of two
    pub capacity: usize,
    /// Keep an exact element count next to the queue indices
    pub exact_count: bool,
    pub min_level: LogLevel,
    /// Longer text is cut and marked; `None` disables the limit
    pub max_message_size: Option<usize>,
    pub thread_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            exact_count: false,
            min_level: LogLevel::Info,
            max_message_size: Some(DEFAULT_MAX_MESSAGE_SIZE),
            thread_name: "log-worker".to_string(),
        }
    }
}

impl WorkerConfig {
    pub fn validate(&self) -> Result<()> {
        validate_capacity(self.capacity)?;

        if let Some(max) = self.max_message_size {
            if max <= TRUNCATION_MARKER.len() {
                return Err(LoggerError::config(
                    "WorkerConfig",
                    format!(
                        "max_message_size {} must exceed the {}-byte truncation marker",
                        max,
                        TRUNCATION_MARKER.len()
                    ),
                ));
            }
        }

        if self.thread_name.is_empty() {
            return Err(LoggerError::config("WorkerConfig", "thread_name is empty"));
        }
        Ok(())
    }
}

/// Which default sinks to install, in the manner of glog-style flags.
///
/// * `log_to_stderr` - console only
/// * `also_log_to_stderr` - console and file
/// * neither - file only, at `<log_dir>/<prefix>.log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkSetup {
    pub log_to_stderr: bool,
    pub also_log_to_stderr: bool,
    pub log_dir: PathBuf,
    pub prefix: String,
}

impl Default for SinkSetup {
    fn default() -> Self {
        Self {
            log_to_stderr: false,
            also_log_to_stderr: false,
            log_dir: std::env::temp_dir(),
            prefix: "app".to_string(),
        }
    }
}

impl SinkSetup {
    pub fn wants_console(&self) -> bool {
        self.log_to_stderr || self.also_log_to_stderr
    }

    pub fn wants_file(&self) -> bool {
        !self.log_to_stderr
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.prefix))
    }
}
