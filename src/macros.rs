//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They record the
//! call site and skip formatting entirely when the level is disabled.
//!
//! # Examples
//!
//! ```
//! use rust_logworker::prelude::*;
//! use rust_logworker::info;
//!
//! let worker = LogWorker::builder().build().unwrap();
//!
//! // Basic logging
//! info!(worker, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(worker, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// A `Fatal` level escalates like [`LogWorker::fatal`](crate::LogWorker::fatal).
///
/// # Examples
///
/// ```
/// # use rust_logworker::prelude::*;
/// # let worker = LogWorker::builder().build().unwrap();
/// use rust_logworker::log;
/// log!(worker, LogLevel::Info, "Simple message");
/// log!(worker, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let level: $crate::LogLevel = $level;
        if $logger.level_enabled(level) {
            let fatal = if level == $crate::LogLevel::Fatal {
                Some($crate::FatalCause::FatalLog)
            } else {
                None
            };
            let _ = $logger.submit_with(
                level,
                file!(),
                line!(),
                module_path!(),
                format!($($arg)+),
                fatal,
            );
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_logworker::prelude::*;
/// # let worker = LogWorker::builder().build().unwrap();
/// use rust_logworker::info;
/// info!(worker, "Application started");
/// info!(worker, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message and escalate.
///
/// With the default exit handler this does not return.
///
/// # Examples
///
/// ```
/// # use rust_logworker::prelude::*;
/// # use std::sync::Arc;
/// let worker = LogWorker::builder()
///     .fatal_exit_handler(Arc::new(|m: &Message| eprintln!("would exit: {}", m.text())))
///     .build()
///     .unwrap();
/// use rust_logworker::fatal;
/// fatal!(worker, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Log only when `condition` holds. The condition is always evaluated.
#[macro_export]
macro_rules! log_if {
    ($logger:expr, $level:expr, $condition:expr, $($arg:tt)+) => {
        if $condition {
            $crate::log!($logger, $level, $($arg)+)
        }
    };
}

/// Log the first occurrence and every `n`th one after it, per call site.
///
/// ```
/// # use rust_logworker::prelude::*;
/// # let worker = LogWorker::builder().build().unwrap();
/// use rust_logworker::log_every_n;
/// for i in 0..100 {
///     // logs i = 0, 10, 20, ...
///     log_every_n!(worker, LogLevel::Info, 10, "processed {} records", i);
/// }
/// ```
#[macro_export]
macro_rules! log_every_n {
    ($logger:expr, $level:expr, $n:expr, $($arg:tt)+) => {{
        static OCCURRENCES: ::std::sync::atomic::AtomicUsize =
            ::std::sync::atomic::AtomicUsize::new(0);
        let n: usize = $n;
        let seen = OCCURRENCES.fetch_add(1, ::std::sync::atomic::Ordering::Relaxed);
        if n > 0 && seen % n == 0 {
            $crate::log!($logger, $level, $($arg)+)
        }
    }};
}

/// Escalate a contract violation when `condition` is false.
///
/// ```
/// # use rust_logworker::prelude::*;
/// # let worker = LogWorker::builder().build().unwrap();
/// use rust_logworker::check;
/// let connections = 3;
/// check!(worker, connections < 10, "too many connections: {}", connections);
/// ```
#[macro_export]
macro_rules! check {
    ($logger:expr, $condition:expr) => {
        $crate::check!($logger, $condition, "")
    };
    ($logger:expr, $condition:expr, $($arg:tt)+) => {
        if !($condition) {
            let _ = $logger.submit_with(
                $crate::LogLevel::Fatal,
                file!(),
                line!(),
                module_path!(),
                format!($($arg)+),
                Some($crate::FatalCause::ContractViolation {
                    expression: stringify!($condition).to_string(),
                }),
            );
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_op {
    ($logger:expr, $left:expr, $right:expr, $op:tt) => {
        match (&$left, &$right) {
            (left, right) => {
                if !(*left $op *right) {
                    let _ = $logger.submit_with(
                        $crate::LogLevel::Fatal,
                        file!(),
                        line!(),
                        module_path!(),
                        format!("({:?} {} {:?})", left, stringify!($op), right),
                        Some($crate::FatalCause::ContractViolation {
                            expression: concat!(
                                stringify!($left),
                                " ",
                                stringify!($op),
                                " ",
                                stringify!($right)
                            )
                            .to_string(),
                        }),
                    );
                }
            }
        }
    };
}

/// `check!` for `left == right`, printing both values on failure.
#[macro_export]
macro_rules! check_eq {
    ($logger:expr, $left:expr, $right:expr) => {
        $crate::__check_op!($logger, $left, $right, ==)
    };
}

#[macro_export]
macro_rules! check_ne {
    ($logger:expr, $left:expr, $right:expr) => {
        $crate::__check_op!($logger, $left, $right, !=)
    };
}

#[macro_export]
macro_rules! check_lt {
    ($logger:expr, $left:expr, $right:expr) => {
        $crate::__check_op!($logger, $left, $right, <)
    };
}

#[macro_export]
macro_rules! check_le {
    ($logger:expr, $left:expr, $right:expr) => {
        $crate::__check_op!($logger, $left, $right, <=)
    };
}

#[macro_export]
macro_rules! check_gt {
    ($logger:expr, $left:expr, $right:expr) => {
        $crate::__check_op!($logger, $left, $right, >)
    };
}

#[macro_export]
macro_rules! check_ge {
    ($logger:expr, $left:expr, $right:expr) => {
        $crate::__check_op!($logger, $left, $right, >=)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{FatalCause, LogLevel, LogWorker, Message};
    use crate::sinks::ChannelSink;
    use crossbeam_channel::Receiver;
    use std::sync::Arc;

    fn tapped_worker() -> (LogWorker, Receiver<Message>) {
        let worker = LogWorker::builder()
            .capacity(256)
            .min_level(LogLevel::Debug)
            .fatal_exit_handler(Arc::new(|_: &Message| {}))
            .build()
            .unwrap();
        let (sink, rx) = ChannelSink::unbounded("tap");
        worker.add_sink(sink).unwrap();
        (worker, rx)
    }

    fn drain(worker: LogWorker, rx: Receiver<Message>) -> Vec<Message> {
        worker.shutdown();
        rx.try_iter().collect()
    }

    #[test]
    fn test_level_macros_record_call_site() {
        let (worker, rx) = tapped_worker();
        trace!(worker, "hidden");
        debug!(worker, "Count: {}", 5);
        info!(worker, "Items: {}", 100);
        warn!(worker, "Retry {} of {}", 1, 3);
        error!(worker, "Code: {}", 500);

        let messages = drain(worker, rx);
        let texts: Vec<&str> = messages.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["Count: 5", "Items: 100", "Retry 1 of 3", "Code: 500"]);
        assert!(messages.iter().all(|m| m.short_file() == "macros.rs"));
        assert!(messages.iter().all(|m| m.function().ends_with("macros::tests")));
        assert!(messages.iter().all(|m| m.line() > 0));
    }

    #[test]
    fn test_disabled_level_skips_formatting() {
        let (worker, rx) = tapped_worker();
        let mut formatted = false;
        let mut expensive = || {
            formatted = true;
            "value"
        };
        trace!(worker, "{}", expensive());
        assert!(!formatted);
        assert!(drain(worker, rx).is_empty());
    }

    #[test]
    fn test_fatal_macro_tags_cause() {
        let (worker, rx) = tapped_worker();
        fatal!(worker, "Critical failure: {}", "system");

        let messages = drain(worker, rx);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].fatal_cause(), Some(&FatalCause::FatalLog));
    }

    #[test]
    fn test_log_if_and_every_n() {
        let (worker, rx) = tapped_worker();
        log_if!(worker, LogLevel::Info, 1 > 2, "never");
        log_if!(worker, LogLevel::Info, 2 > 1, "always");
        for i in 0..7 {
            log_every_n!(worker, LogLevel::Info, 3, "tick {}", i);
        }

        let texts: Vec<String> = drain(worker, rx)
            .iter()
            .map(|m| m.text().to_string())
            .collect();
        assert_eq!(texts, vec!["always", "tick 0", "tick 3", "tick 6"]);
    }

    #[test]
    fn test_check_macros() {
        let (worker, rx) = tapped_worker();
        let limit = 10;
        check!(worker, limit > 5);
        check_eq!(worker, limit, 10);
        check_le!(worker, limit, 10);
        check_lt!(worker, limit, 3);

        let messages = drain(worker, rx);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "(10 < 3)");
        assert_eq!(
            messages[0].fatal_cause(),
            Some(&FatalCause::ContractViolation {
                expression: "limit < 3".to_string()
            })
        );
    }

    #[test]
    fn test_check_with_message() {
        let (worker, rx) = tapped_worker();
        let queue_depth = 42;
        check!(worker, queue_depth == 0, "queue not drained: {}", queue_depth);
        check_ne!(worker, queue_depth, 0);
        check_gt!(worker, queue_depth, 0);
        check_ge!(worker, queue_depth, 42);

        let messages = drain(worker, rx);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text(), "queue not drained: 42");
    }
}
