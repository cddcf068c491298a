//! Log message value handed from producers to sinks
//!
//! A [`Message`] is assembled on the calling thread, then moved into a queue
//! slot, out again by the worker, and lent read-only to every sink. Nothing
//! mutates it once it has been submitted.

use super::fatal::FatalCause;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Marker appended to text cut by the message size limit
pub const TRUNCATION_MARKER: &str = "[...truncated...]";

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn current_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    level: LogLevel,
    text: String,
    file: String,
    line: u32,
    function: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    fatal: Option<FatalCause>,
    sequence: u64,
    timestamp: DateTime<Utc>,
    thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    thread_name: Option<String>,
}

impl Message {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            file: String::new(),
            line: 0,
            function: String::new(),
            fatal: None,
            sequence: 0,
            timestamp: Utc::now(),
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, file: &str, line: u32, function: &str) -> Self {
        self.file = file.to_string();
        self.line = line;
        self.function = function.to_string();
        self
    }

    /// Tag the message as fatal. Fatal messages trigger the escalation protocol.
    #[must_use]
    pub fn with_fatal(mut self, cause: FatalCause) -> Self {
        self.fatal = Some(cause);
        self
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Cut the text to at most `max_len` bytes, marker included, on a char boundary.
    pub(crate) fn truncated(mut self, max_len: usize) -> Self {
        if self.text.len() <= max_len {
            return self;
        }
        let mut cut = max_len.saturating_sub(TRUNCATION_MARKER.len());
        while cut > 0 && !self.text.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text.truncate(cut);
        self.text.push_str(TRUNCATION_MARKER);
        self
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn fatal_cause(&self) -> Option<&FatalCause> {
        self.fatal.as_ref()
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    /// Diagnostic sequence number assigned at submission. Not an ordering key.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }

    /// File name without its directories
    pub fn short_file(&self) -> &str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fields() {
        let msg = Message::new(LogLevel::Warn, "disk almost full")
            .with_location("src/storage/disk.rs", 42, "storage::disk::check")
            .with_sequence(7);

        assert_eq!(msg.level(), LogLevel::Warn);
        assert_eq!(msg.text(), "disk almost full");
        assert_eq!(msg.short_file(), "disk.rs");
        assert_eq!(msg.line(), 42);
        assert_eq!(msg.function(), "storage::disk::check");
        assert_eq!(msg.sequence(), 7);
        assert!(!msg.is_fatal());
    }

    #[test]
    fn test_truncation_respects_limit_and_char_boundary() {
        let text = "é".repeat(40);
        let msg = Message::new(LogLevel::Info, text).truncated(32);
        assert!(msg.text().len() <= 32);
        assert!(msg.text().ends_with(TRUNCATION_MARKER));

        let short = Message::new(LogLevel::Info, "short").truncated(32);
        assert_eq!(short.text(), "short");
    }

    #[test]
    fn test_fatal_tag() {
        let msg = Message::new(LogLevel::Fatal, "boom").with_fatal(FatalCause::FatalLog);
        assert!(msg.is_fatal());
        assert_eq!(msg.fatal_cause(), Some(&FatalCause::FatalLog));
    }

    #[test]
    fn test_json_shape() {
        let msg = Message::new(LogLevel::Error, "failed").with_location("a.rs", 1, "f");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["level"], "Error");
        assert_eq!(json["text"], "failed");
        assert!(json.get("fatal").is_none());
    }
}
