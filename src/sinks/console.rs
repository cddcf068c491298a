//! Colored stderr sink

use super::format_line;
use crate::core::{Message, Result, Sink};
use colored::Colorize;
use std::io::Write;

pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn render(&self, message: &Message) -> String {
        let level = format!("{:5}", message.level().to_str());
        if self.use_colors {
            format_line(message, &level.color(message.level().color_code()).to_string())
        } else {
            format_line(message, &level)
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn receive(&mut self, message: &Message) -> Result<()> {
        let line = self.render(message);
        writeln!(std::io::stderr().lock(), "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_plain_rendering() {
        let sink = ConsoleSink::with_colors(false);
        let message = Message::new(LogLevel::Info, "ready").with_location("main.rs", 3, "main");
        let line = sink.render(&message);

        assert!(line.starts_with("INFO  "));
        assert!(line.ends_with("main.rs->main:3] ready"));
    }

    #[test]
    fn test_receive_writes() {
        let mut sink = ConsoleSink::new();
        assert!(sink.receive(&Message::new(LogLevel::Error, "to stderr")).is_ok());
        assert!(sink.flush().is_ok());
    }
}
