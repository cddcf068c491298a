//! Core worker types and traits

pub mod config;
pub mod error;
pub mod fatal;
pub mod filter;
pub mod log_level;
pub mod message;
pub mod metrics;
pub mod overflow_policy;
pub mod queue;
pub mod registry;
pub mod sink;
pub mod worker;

pub use config::{SinkSetup, WorkerConfig, DEFAULT_MAX_MESSAGE_SIZE};
pub use error::{LoggerError, Result};
pub use fatal::{
    default_fatal_exit, FatalCause, FatalExitHandler, FatalHooks, FatalSignal, PreFatalHook,
};
pub use filter::LevelFilter;
pub use log_level::LogLevel;
pub use message::{Message, TRUNCATION_MARKER};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use queue::{BoundedQueue, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use registry::{SinkHandle, SinkRegistry};
pub use sink::{CallbackSink, FnSink, Sink};
pub use worker::{LogWorker, LogWorkerBuilder, WorkerState, DEFAULT_SHUTDOWN_TIMEOUT};
