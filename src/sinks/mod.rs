//! Sink implementations

pub mod channel;
pub mod json;

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;

pub use channel::ChannelSink;
pub use json::JsonSink;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::FileSink;

pub use crate::core::{CallbackSink, FnSink, Sink};

use crate::core::Message;

/// Plain-text line shared by the console and file sinks:
/// `LEVEL timestamp file->function:line] text`
pub(crate) fn format_line(message: &Message, level: &str) -> String {
    format!(
        "{} {} {}->{}:{}] {}",
        level,
        message.timestamp().format("%Y/%m/%d %H:%M:%S%.6f"),
        message.short_file(),
        message.function(),
        message.line(),
        message.text()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_format_line_layout() {
        let message = Message::new(LogLevel::Warn, "disk almost full")
            .with_location("src/storage/disk.rs", 88, "check_space");
        let line = format_line(&message, message.level().to_str());

        assert!(line.starts_with("WARN "));
        assert!(line.ends_with(" disk.rs->check_space:88] disk almost full"));
    }
}
