//! Property-based tests for rust_logworker using proptest

use proptest::prelude::*;
use rust_logworker::prelude::*;
use std::collections::VecDeque;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let text = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(text.parse::<LogLevel>().unwrap(), level);
    }

    #[test]
    fn test_log_level_ordering_matches_numeric(a in any_level(), b in any_level()) {
        prop_assert_eq!(a < b, a.as_u8() < b.as_u8());
        prop_assert_eq!(LogLevel::from_u8(a.as_u8()), a);
    }
}

// ============================================================================
// Queue Tests
// ============================================================================

#[derive(Debug, Clone)]
enum QueueOp {
    Push(u32),
    Pop,
}

fn queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![any::<u32>().prop_map(QueueOp::Push), Just(QueueOp::Pop)]
}

proptest! {
    /// A single-threaded sequence of operations behaves like a bounded VecDeque
    #[test]
    fn test_queue_matches_bounded_model(
        capacity_log2 in 0u32..6,
        ops in prop::collection::vec(queue_op(), 0..300),
    ) {
        let capacity = 1usize << capacity_log2;
        let queue = BoundedQueue::with_exact_count(capacity).unwrap();
        let mut model = VecDeque::new();

        for op in ops {
            match op {
                QueueOp::Push(value) => {
                    let result = queue.push(value);
                    if model.len() < capacity {
                        prop_assert!(result.is_ok());
                        model.push_back(value);
                    } else {
                        prop_assert_eq!(result, Err(value));
                    }
                }
                QueueOp::Pop => {
                    prop_assert_eq!(queue.try_pop(), model.pop_front());
                }
            }
            prop_assert_eq!(queue.size(), model.len());
            prop_assert_eq!(queue.is_empty(), model.is_empty());
            prop_assert_eq!(queue.is_full(), model.len() == capacity);
        }
    }

    #[test]
    fn test_non_power_of_two_capacity_rejected(capacity in 1usize..10_000) {
        let result = BoundedQueue::<u8>::with_capacity(capacity);
        prop_assert_eq!(result.is_ok(), capacity.is_power_of_two());
    }
}

// ============================================================================
// Message Tests
// ============================================================================

proptest! {
    #[test]
    fn test_message_with_location(
        text in ".*",
        line in 1u32..10_000,
        dir in "[a-z]{1,8}",
        name in "[a-z_]{1,12}",
    ) {
        let file = format!("{}/{}.rs", dir, name);
        let message = Message::new(LogLevel::Info, text.clone())
            .with_location(&file, line, "handler");

        prop_assert_eq!(message.text(), text.as_str());
        prop_assert_eq!(message.line(), line);
        prop_assert_eq!(message.short_file(), format!("{}.rs", name));
        prop_assert!(!message.is_fatal());
    }

    #[test]
    fn test_message_json_roundtrip(text in ".*", level in any_level()) {
        let message = Message::new(level, text).with_location("src/lib.rs", 7, "run");
        let json = serde_json::to_string(&message).unwrap();
        let decoded: Message = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(decoded, message);
    }
}

// ============================================================================
// Worker Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Everything at or above the threshold is delivered, in submission order
    #[test]
    fn test_worker_filters_and_orders(
        threshold in any_level(),
        levels in prop::collection::vec(
            prop_oneof![
                Just(LogLevel::Trace),
                Just(LogLevel::Debug),
                Just(LogLevel::Info),
                Just(LogLevel::Warn),
                Just(LogLevel::Error),
            ],
            0..64,
        ),
    ) {
        let (sink, rx) = ChannelSink::unbounded("tap");
        let worker = LogWorker::builder()
            .capacity(128)
            .min_level(threshold)
            .sink(sink)
            .build()
            .unwrap();

        for (i, level) in levels.iter().enumerate() {
            worker.log(*level, format!("{}", i));
        }
        worker.shutdown();

        let expected: Vec<String> = levels
            .iter()
            .enumerate()
            .filter(|(_, level)| **level >= threshold)
            .map(|(i, _)| format!("{}", i))
            .collect();
        let delivered: Vec<String> = rx.try_iter().map(|m| m.text().to_string()).collect();
        prop_assert_eq!(delivered, expected);
    }

    #[test]
    fn test_truncation_respects_limit(len in 0usize..600, limit in 32usize..256) {
        let (sink, rx) = ChannelSink::unbounded("tap");
        let worker = LogWorker::builder()
            .capacity(8)
            .max_message_size(Some(limit))
            .sink(sink)
            .build()
            .unwrap();

        worker.info("é".repeat(len));
        worker.shutdown();

        let message = rx.recv().unwrap();
        prop_assert!(message.text().len() <= limit);
        if len * 2 > limit {
            prop_assert!(message.text().ends_with(rust_logworker::core::TRUNCATION_MARKER));
        } else {
            prop_assert_eq!(message.text().len(), len * 2);
        }
    }
}
