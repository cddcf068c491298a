//! # Rust LogWorker
//!
//! Asynchronous logging core: producers hand messages to a lock-free bounded
//! queue, and a single background worker delivers them to every registered
//! sink in order.
//!
//! ## Features
//!
//! - **Lock-free queue**: bounded MPMC ring with reserve/commit/read indices
//! - **Ordered fan-out**: each message reaches all sinks before the next one
//! - **Fatal escalation**: a fatal event is delivered after everything queued
//!   before it, then the exit handler runs
//! - **Isolated sinks**: a failing or panicking sink never stops the worker
//!
//! ```
//! use rust_logworker::prelude::*;
//! use rust_logworker::info;
//!
//! let worker = LogWorker::builder().capacity(1024).build().unwrap();
//! let (sink, rx) = ChannelSink::unbounded("tap");
//! worker.add_sink(sink).unwrap();
//!
//! info!(worker, "listening on port {}", 8080);
//! worker.shutdown();
//! assert_eq!(rx.recv().unwrap().text(), "listening on port 8080");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::sinks::{ChannelSink, JsonSink};
    pub use crate::core::{
        BoundedQueue, CallbackSink, FatalCause, FatalExitHandler, FatalSignal, FnSink, LogLevel,
        LogWorker, LogWorkerBuilder, LoggerError, LoggerMetrics, Message, OverflowCallback,
        OverflowPolicy, PreFatalHook, Result, Sink, SinkHandle, SinkSetup, WorkerConfig,
        WorkerState, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::FileSink;
pub use sinks::{ChannelSink, JsonSink};
pub use core::{
    default_fatal_exit, BoundedQueue, CallbackSink, FatalCause, FatalExitHandler, FatalHooks,
    FatalSignal, FnSink, LevelFilter, LogLevel, LogWorker, LogWorkerBuilder, LoggerError,
    LoggerMetrics, Message, OverflowCallback, OverflowPolicy, PreFatalHook, Result, Sink,
    SinkHandle, SinkSetup, WorkerConfig, WorkerState, DEFAULT_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
