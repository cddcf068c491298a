//! Ordered, append-only collection of sinks

use super::{message::Message, metrics::LoggerMetrics, sink::Sink};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Identity of a registered sink. Cannot be used to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkHandle {
    id: u64,
}

impl SinkHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

struct SinkEntry {
    handle: SinkHandle,
    sink: Box<dyn Sink>,
}

#[derive(Default)]
pub struct SinkRegistry {
    entries: Vec<SinkEntry>,
    next_id: u64,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: Box<dyn Sink>) -> SinkHandle {
        let handle = SinkHandle { id: self.next_id };
        self.next_id += 1;
        self.entries.push(SinkEntry { handle, sink });
        handle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn handles(&self) -> Vec<SinkHandle> {
        self.entries.iter().map(|entry| entry.handle).collect()
    }

    /// Hand `message` to every sink in registration order.
    ///
    /// Each sink call is isolated: an error or panic is reported and counted,
    /// and the remaining sinks still run. Returns the number of failed sinks.
    pub fn dispatch(&mut self, message: &Message, metrics: &LoggerMetrics) -> usize {
        let mut failures = 0;

        for entry in self.entries.iter_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| entry.sink.receive(message)));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Sink '{}' failed: {}",
                        entry.sink.name(),
                        e
                    );
                    metrics.record_sink_failure();
                    failures += 1;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                         Other sinks continue to function.",
                        entry.sink.name(),
                        panic_message(&*panic_info)
                    );
                    metrics.record_sink_failure();
                    failures += 1;
                }
            }
        }

        failures
    }

    /// Flush every sink with the same isolation as [`dispatch`](Self::dispatch).
    pub fn flush_all(&mut self) {
        for entry in self.entries.iter_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| entry.sink.flush()));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Sink '{}' flush failed: {}",
                        entry.sink.name(),
                        e
                    );
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked during flush: {}",
                        entry.sink.name(),
                        panic_message(&*panic_info)
                    );
                }
            }
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
