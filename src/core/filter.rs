//! Level gate consulted on the producer thread before a message is built

use super::log_level::LogLevel;
use std::sync::atomic::{AtomicU8, Ordering};

/// Shared minimum level.
///
/// Reads are relaxed: a call racing with `set_min_level` may see either the
/// old or the new threshold, which lets at most a message or two slip through
/// or get dropped around the change.
#[derive(Debug)]
pub struct LevelFilter {
    threshold: AtomicU8,
}

impl LevelFilter {
    pub const fn new(min_level: LogLevel) -> Self {
        Self {
            threshold: AtomicU8::new(min_level as u8),
        }
    }

    #[inline]
    pub fn level_enabled(&self, level: LogLevel) -> bool {
        level.as_u8() >= self.threshold.load(Ordering::Relaxed)
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.threshold.store(level.as_u8(), Ordering::Relaxed);
    }

    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_u8(self.threshold.load(Ordering::Relaxed))
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_gates_lower_levels() {
        let filter = LevelFilter::new(LogLevel::Warn);
        assert!(!filter.level_enabled(LogLevel::Info));
        assert!(filter.level_enabled(LogLevel::Warn));
        assert!(filter.level_enabled(LogLevel::Fatal));

        filter.set_min_level(LogLevel::Trace);
        assert!(filter.level_enabled(LogLevel::Trace));
        assert_eq!(filter.min_level(), LogLevel::Trace);
    }

    #[test]
    fn test_fatal_always_passes() {
        let filter = LevelFilter::new(LogLevel::Fatal);
        for level in LogLevel::ALL {
            assert_eq!(filter.level_enabled(level), level == LogLevel::Fatal);
        }
    }
}
