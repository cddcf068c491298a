//! Background dispatch worker
//!
//! Producers push messages into a [`BoundedQueue`]; a single background thread
//! pops them in commit order and hands each one to every registered sink
//! before moving to the next. Fatal messages take the same queue and, once
//! delivered, hand control to the fatal exit handler.

use super::{
    config::{SinkSetup, WorkerConfig},
    error::{LoggerError, Result},
    fatal::{FatalCause, FatalExitHandler, FatalHooks, FatalLatch, FatalSignal, PreFatalHook},
    filter::LevelFilter,
    log_level::LogLevel,
    message::Message,
    metrics::LoggerMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    queue::BoundedQueue,
    registry::{SinkHandle, SinkRegistry},
    sink::{CallbackSink, Sink},
};
use crossbeam_utils::Backoff;
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// Default shutdown timeout used when the worker is dropped (5 seconds)
///
/// For custom timeout control, use [`LogWorker::shutdown_timeout`] instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How long the worker waits on an empty queue before re-checking for shutdown
const IDLE_WAIT: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Stopped = 0,
    Running = 1,
    Draining = 2,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => WorkerState::Running,
            2 => WorkerState::Draining,
            _ => WorkerState::Stopped,
        }
    }
}

/// Queue item: the message plus whether it carries the escalating fatal.
struct Envelope {
    message: Message,
    escalate: bool,
}

/// State shared between the handle and the background thread.
struct Shared {
    queue: BoundedQueue<Envelope>,
    sinks: Mutex<SinkRegistry>,
    filter: LevelFilter,
    hooks: RwLock<FatalHooks>,
    fatal: FatalLatch,
    metrics: LoggerMetrics,
    state: AtomicU8,
    /// Cleared once at shutdown; submissions after that are discarded
    accepting: AtomicBool,
    /// Producers currently between the `accepting` check and their push
    in_flight: AtomicUsize,
    drain_requested: AtomicBool,
    sequence: AtomicU64,
    worker_thread: OnceLock<ThreadId>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    max_message_size: Option<usize>,
}

/// Decrements the in-flight producer count on drop.
struct ProducerGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl Drop for ProducerGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Shared {
    fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn is_worker_thread(&self) -> bool {
        self.worker_thread.get() == Some(&thread::current().id())
    }

    /// Register as an active producer, unless shutdown already began.
    fn enter(&self) -> Option<ProducerGuard<'_>> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = ProducerGuard {
            in_flight: &self.in_flight,
        };
        if self.accepting.load(Ordering::SeqCst) {
            Some(guard)
        } else {
            None
        }
    }

    fn prepare(&self, message: Message) -> Message {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let message = message.with_sequence(sequence);
        match self.max_message_size {
            Some(max) => message.truncated(max),
            None => message,
        }
    }

    fn queue_full_error(&self) -> LoggerError {
        LoggerError::queue_full(self.queue.size(), self.queue.capacity())
    }

    /// Push with the configured overflow policy.
    fn enqueue(&self, envelope: Envelope) -> Result<()> {
        let envelope = match self.queue.push(envelope) {
            Ok(()) => {
                self.metrics.record_submitted();
                return Ok(());
            }
            Err(envelope) => envelope,
        };

        self.metrics.record_queue_full();

        // The worker is the only consumer: waiting on it from its own thread
        // would never end.
        if self.is_worker_thread() {
            self.alert_and_drop();
            return Err(self.queue_full_error());
        }

        match &self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
                Err(self.queue_full_error())
            }
            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                Err(self.queue_full_error())
            }
            OverflowPolicy::Block => {
                self.metrics.record_block();
                self.push_until(envelope, None)
                    .map_err(|_| self.queue_full_error())
            }
            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match self.push_until(envelope, Some(Instant::now() + *timeout)) {
                    Ok(()) => Ok(()),
                    Err(_) => {
                        self.alert_and_drop();
                        Err(self.queue_full_error())
                    }
                }
            }
        }
    }

    /// Retry a push until it lands or `deadline` passes.
    fn push_until(
        &self,
        mut envelope: Envelope,
        deadline: Option<Instant>,
    ) -> std::result::Result<(), Envelope> {
        let backoff = Backoff::new();
        loop {
            match self.queue.push(envelope) {
                Ok(()) => {
                    self.metrics.record_submitted();
                    return Ok(());
                }
                Err(back) => envelope = back,
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(envelope);
            }
            if backoff.is_completed() {
                thread::sleep(Duration::from_micros(50));
            } else {
                backoff.snooze();
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped();

        // Alert on first drop and periodically thereafter
        let should_alert = dropped_count == 0 || (dropped_count + 1) % 1000 == 0;

        if should_alert {
            eprintln!(
                "[LOGGER WARNING] Queue full, {} messages dropped. \
                 Consider increasing capacity or using a different overflow policy.",
                dropped_count + 1
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }

    /// Deliver one message to every sink; escalate if it is the winning fatal.
    fn dispatch(&self, envelope: Envelope) {
        let Envelope { message, escalate } = envelope;

        self.sinks.lock().dispatch(&message, &self.metrics);
        self.metrics.record_dispatched();

        if escalate {
            self.sinks.lock().flush_all();
            self.run_exit_handler(&message);
            self.fatal.complete();
        }
    }

    fn run_exit_handler(&self, message: &Message) {
        let handler: FatalExitHandler = Arc::clone(self.hooks.read().exit_handler());
        if catch_unwind(AssertUnwindSafe(|| handler(message))).is_err() {
            eprintln!("[LOGGER CRITICAL] Fatal exit handler panicked");
        }
    }

    fn run_pre_fatal_hook(&self) {
        let hook: Option<PreFatalHook> = self.hooks.read().pre_fatal_hook().cloned();
        if let Some(hook) = hook {
            if catch_unwind(AssertUnwindSafe(|| hook())).is_err() {
                eprintln!("[LOGGER CRITICAL] Pre-fatal hook panicked; continuing escalation");
            }
        }
    }
}

/// Body of the background thread.
fn run(shared: Arc<Shared>) {
    let _ = shared.worker_thread.set(thread::current().id());
    let mut unflushed = false;

    loop {
        match shared.queue.wait_pop_timeout(IDLE_WAIT) {
            Some(envelope) => {
                shared.dispatch(envelope);
                unflushed = true;
            }
            None => {
                if unflushed {
                    shared.sinks.lock().flush_all();
                    unflushed = false;
                }
                // Admitted producers push before leaving `in_flight`, so once it
                // reads zero an empty queue means everything has been delivered.
                if shared.drain_requested.load(Ordering::SeqCst)
                    && shared.in_flight.load(Ordering::SeqCst) == 0
                    && shared.queue.is_empty()
                {
                    break;
                }
            }
        }
    }

    shared.sinks.lock().flush_all();
    shared.set_state(WorkerState::Stopped);
}

/// Owns the queue, the sink registry and the background thread.
///
/// All methods take `&self`; share the worker between threads with an `Arc`.
///
/// # Example
///
/// ```
/// use rust_logworker::prelude::*;
///
/// let worker = LogWorker::builder()
///     .capacity(1024)
///     .min_level(LogLevel::Debug)
///     .build()
///     .unwrap();
///
/// worker.add_sink(FnSink::new("stdout", |m: &Message| println!("{}", m.text()))).unwrap();
/// worker.info("service started");
/// worker.shutdown();
/// ```
pub struct LogWorker {
    shared: Arc<Shared>,
    handle: Mutex<Option<JoinHandle<()>>>,
    thread_name: String,
}

impl LogWorker {
    pub fn new(config: WorkerConfig) -> Result<Self> {
        Self::with_parts(config, OverflowPolicy::default(), None, FatalHooks::new())
    }

    fn with_parts(
        config: WorkerConfig,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
        hooks: FatalHooks,
    ) -> Result<Self> {
        config.validate()?;

        let shared = Shared {
            queue: BoundedQueue::build(config.capacity, config.exact_count)?,
            sinks: Mutex::new(SinkRegistry::new()),
            filter: LevelFilter::new(config.min_level),
            hooks: RwLock::new(hooks),
            fatal: FatalLatch::new(),
            metrics: LoggerMetrics::new(),
            state: AtomicU8::new(WorkerState::Stopped as u8),
            accepting: AtomicBool::new(true),
            in_flight: AtomicUsize::new(0),
            drain_requested: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
            worker_thread: OnceLock::new(),
            overflow_policy,
            on_overflow,
            max_message_size: config.max_message_size,
        };

        Ok(Self {
            shared: Arc::new(shared),
            handle: Mutex::new(None),
            thread_name: config.thread_name,
        })
    }

    /// Create a builder for LogWorker
    #[must_use]
    pub fn builder() -> LogWorkerBuilder {
        LogWorkerBuilder::new()
    }

    /// Spawn the background thread. No-op if it is already running.
    pub fn start(&self) -> Result<()> {
        let mut handle = self.handle.lock();
        if !self.shared.accepting.load(Ordering::SeqCst) {
            return Err(LoggerError::LoggerStopped);
        }
        self.spawn_locked(&mut handle)
    }

    fn spawn_locked(&self, handle: &mut Option<JoinHandle<()>>) -> Result<()> {
        if handle.is_some() {
            return Ok(());
        }

        self.shared.set_state(WorkerState::Running);
        let shared = Arc::clone(&self.shared);
        match thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || run(shared))
        {
            Ok(join) => {
                *handle = Some(join);
                Ok(())
            }
            Err(e) => {
                self.shared.set_state(WorkerState::Stopped);
                Err(LoggerError::WorkerSpawn(e))
            }
        }
    }

    pub fn state(&self) -> WorkerState {
        self.shared.state()
    }

    /// True once a fatal event has claimed escalation.
    pub fn fatal_raised(&self) -> bool {
        self.shared.fatal.is_claimed()
    }

    pub fn is_running(&self) -> bool {
        self.shared.state() == WorkerState::Running
    }

    /// Register a sink. The first registration starts the worker.
    pub fn add_sink<S: Sink + 'static>(&self, sink: S) -> Result<SinkHandle> {
        self.add_boxed_sink(Box::new(sink))
    }

    pub fn add_boxed_sink(&self, sink: Box<dyn Sink>) -> Result<SinkHandle> {
        if !self.shared.accepting.load(Ordering::SeqCst) {
            return Err(LoggerError::LoggerStopped);
        }
        let sink_handle = self.shared.sinks.lock().register(sink);
        self.start()?;
        Ok(sink_handle)
    }

    /// Register a handler object together with the method that consumes messages.
    pub fn add_callback_sink<T: Send + 'static>(
        &self,
        name: impl Into<String>,
        handler: T,
        callback: fn(&mut T, &Message),
    ) -> Result<SinkHandle> {
        self.add_sink(CallbackSink::new(name, handler, callback))
    }

    /// Install the console and/or file sinks selected by `setup`.
    pub fn install_sinks(&self, setup: &SinkSetup) -> Result<Vec<SinkHandle>> {
        let mut handles = Vec::new();

        #[cfg(feature = "console")]
        if setup.wants_console() {
            handles.push(self.add_sink(crate::sinks::ConsoleSink::new())?);
        }

        #[cfg(feature = "file")]
        if setup.wants_file() {
            std::fs::create_dir_all(&setup.log_dir).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    setup.log_dir.display().to_string(),
                    e,
                )
            })?;
            handles.push(self.add_sink(crate::sinks::FileSink::new(setup.log_file_path())?)?);
        }

        Ok(handles)
    }

    pub fn sink_count(&self) -> usize {
        self.shared.sinks.lock().len()
    }

    #[inline]
    pub fn level_enabled(&self, level: LogLevel) -> bool {
        self.shared.filter.level_enabled(level)
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.shared.filter.set_min_level(level);
    }

    pub fn min_level(&self) -> LogLevel {
        self.shared.filter.min_level()
    }

    /// Replace the hook run on the calling thread before a fatal message is queued.
    pub fn set_pre_fatal_hook(&self, hook: PreFatalHook) {
        self.shared.hooks.write().set_pre_fatal_hook(hook);
    }

    /// Replace the handler run after a fatal message reached every sink.
    ///
    /// The handler is expected to terminate the process. If it returns, the
    /// worker carries on delivering messages.
    pub fn set_fatal_exit_handler(&self, handler: FatalExitHandler) {
        self.shared.hooks.write().set_exit_handler(handler);
    }

    pub fn reset_fatal_hooks(&self) {
        self.shared.hooks.write().reset();
    }

    /// Queue a message for delivery.
    ///
    /// Messages below the level threshold are ignored. Fatal messages follow
    /// the escalation protocol and, unless the exit handler returns, do not
    /// come back. After shutdown, non-fatal messages are discarded with
    /// [`LoggerError::LoggerStopped`].
    pub fn submit(&self, message: Message) -> Result<()> {
        if message.is_fatal() {
            return self.submit_fatal(message);
        }
        if !self.level_enabled(message.level()) {
            return Ok(());
        }

        let Some(_guard) = self.shared.enter() else {
            return Err(LoggerError::LoggerStopped);
        };
        let message = self.shared.prepare(message);
        self.shared.enqueue(Envelope {
            message,
            escalate: false,
        })
    }

    /// Build and queue a message from call-site parts.
    pub fn submit_with(
        &self,
        level: LogLevel,
        file: &str,
        line: u32,
        function: &str,
        text: impl Into<String>,
        fatal: Option<FatalCause>,
    ) -> Result<()> {
        if fatal.is_none() && !self.level_enabled(level) {
            return Ok(());
        }
        let mut message = Message::new(level, text).with_location(file, line, function);
        if let Some(cause) = fatal {
            message = message.with_fatal(cause);
        }
        self.submit(message)
    }

    fn submit_fatal(&self, message: Message) -> Result<()> {
        let shared = &self.shared;

        let Some(guard) = shared.enter() else {
            return self.fatal_after_shutdown(message);
        };

        // First fatal wins; later ones are delivered without escalating.
        if !shared.fatal.claim() {
            let envelope = Envelope {
                message: shared.prepare(message),
                escalate: false,
            };
            if shared.is_worker_thread() {
                return shared.enqueue(envelope);
            }
            let _ = shared.push_until(envelope, None);
            return Ok(());
        }

        shared.run_pre_fatal_hook();
        let envelope = Envelope {
            message: shared.prepare(message),
            escalate: true,
        };

        if shared.is_worker_thread() {
            // A sink raised it: queue it behind the current message if there
            // is room, never wait for ourselves.
            match shared.queue.push(envelope) {
                Ok(()) => {
                    shared.metrics.record_submitted();
                }
                Err(envelope) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Queue full while a sink raised a fatal event: {}",
                        envelope.message.text()
                    );
                    shared.run_exit_handler(&envelope.message);
                    shared.fatal.complete();
                }
            }
            return Ok(());
        }

        let spawned = {
            let mut handle = self.handle.lock();
            self.spawn_locked(&mut handle)
        };
        if let Err(e) = spawned {
            // No consumer will ever deliver it: hand it to the exit handler here.
            eprintln!(
                "[LOGGER CRITICAL] {}; delivering fatal event directly: {}",
                e,
                envelope.message.text()
            );
            shared.run_exit_handler(&envelope.message);
            shared.fatal.complete();
            return Err(e);
        }

        // No deadline: returns once the envelope is queued.
        let _ = shared.push_until(envelope, None);
        drop(guard);

        shared
            .fatal
            .wait_completed(|| shared.state() == WorkerState::Stopped);
        Ok(())
    }

    /// The queue is closed: surface the event directly instead of absorbing it.
    fn fatal_after_shutdown(&self, message: Message) -> Result<()> {
        eprintln!(
            "[LOGGER CRITICAL] Fatal event after logging shut down ({}): {}",
            message
                .fatal_cause()
                .map(ToString::to_string)
                .unwrap_or_default(),
            message.text()
        );
        if self.shared.fatal.claim() {
            self.shared.run_pre_fatal_hook();
            self.shared.run_exit_handler(&message);
        }
        Ok(())
    }

    pub fn log(&self, level: LogLevel, text: impl Into<String>) {
        if !self.level_enabled(level) {
            return;
        }
        let mut message = Message::new(level, text);
        if level == LogLevel::Fatal {
            message = message.with_fatal(FatalCause::FatalLog);
        }
        let _ = self.submit(message);
    }

    #[inline]
    pub fn trace(&self, text: impl Into<String>) {
        self.log(LogLevel::Trace, text);
    }

    #[inline]
    pub fn debug(&self, text: impl Into<String>) {
        self.log(LogLevel::Debug, text);
    }

    #[inline]
    pub fn info(&self, text: impl Into<String>) {
        self.log(LogLevel::Info, text);
    }

    #[inline]
    pub fn warn(&self, text: impl Into<String>) {
        self.log(LogLevel::Warn, text);
    }

    #[inline]
    pub fn error(&self, text: impl Into<String>) {
        self.log(LogLevel::Error, text);
    }

    /// Log a fatal event and escalate.
    #[inline]
    pub fn fatal(&self, text: impl Into<String>) {
        self.log(LogLevel::Fatal, text);
    }

    /// Escalate a broken contract when `condition` does not hold.
    pub fn check(&self, condition: bool, expression: &str, text: impl Into<String>) {
        if condition {
            return;
        }
        let message = Message::new(LogLevel::Fatal, text).with_fatal(FatalCause::ContractViolation {
            expression: expression.to_string(),
        });
        let _ = self.submit(message);
    }

    /// Entry point for external crash handlers that trapped an OS signal.
    pub fn report_fatal_signal(&self, signal: FatalSignal, text: impl Into<String>) {
        let message =
            Message::new(LogLevel::Fatal, text).with_fatal(FatalCause::Signal(signal));
        let _ = self.submit(message);
    }

    /// Approximate number of queued messages (exact if configured).
    pub fn queue_size(&self) -> usize {
        self.shared.queue.size()
    }

    pub fn capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    pub fn dropped_count(&self) -> u64 {
        self.shared.metrics.dropped_count()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Flush every sink from the calling thread.
    pub fn flush(&self) {
        self.shared.sinks.lock().flush_all();
    }

    /// Stop accepting messages, deliver everything queued, and join the thread.
    ///
    /// Idempotent. A sink that never returns stalls this call.
    pub fn shutdown(&self) {
        self.shutdown_inner(None);
    }

    /// Like [`shutdown`](Self::shutdown) but stops waiting after `timeout`.
    ///
    /// The timeout covers both waiting for admitted producers and joining the
    /// thread. Returns `true` if the worker stopped in time. On timeout the
    /// thread keeps draining; a later shutdown call joins it. Called from a
    /// sink, it only requests the drain and returns `false`.
    pub fn shutdown_timeout(&self, timeout: Duration) -> bool {
        self.shutdown_inner(Some(timeout))
    }

    /// Refuse new producers and wait for the ones already admitted.
    ///
    /// A producer blocked on a full queue needs a consumer, so the thread is
    /// started if none exists. The handle lock is only held for that check:
    /// an admitted fatal producer may need it too.
    fn stop_accepting(&self, deadline: Option<Instant>) -> bool {
        let shared = &self.shared;
        shared.accepting.store(false, Ordering::SeqCst);

        let backoff = Backoff::new();
        while shared.in_flight.load(Ordering::SeqCst) != 0 {
            if !shared.queue.is_empty() {
                let mut handle = self.handle.lock();
                if handle.is_none() {
                    if let Err(e) = self.spawn_locked(&mut handle) {
                        eprintln!("[LOGGER ERROR] Could not start worker for final drain: {}", e);
                    }
                }
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return false;
            }
            if backoff.is_completed() {
                thread::sleep(Duration::from_micros(100));
            } else {
                backoff.snooze();
            }
        }
        true
    }

    fn shutdown_inner(&self, timeout: Option<Duration>) -> bool {
        if self.shared.is_worker_thread() {
            // Joining ourselves would deadlock; ask the loop to finish instead.
            self.shared.accepting.store(false, Ordering::SeqCst);
            self.shared.drain_requested.store(true, Ordering::SeqCst);
            return false;
        }

        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        if !self.stop_accepting(deadline) {
            eprintln!(
                "[LOGGER WARNING] Producers still pushing after {:?}. Shutdown abandoned.",
                timeout.unwrap_or_default()
            );
            return false;
        }

        let mut handle = self.handle.lock();

        // Messages queued before any sink was added still need a consumer.
        if handle.is_none() && !self.shared.queue.is_empty() {
            if let Err(e) = self.spawn_locked(&mut handle) {
                eprintln!("[LOGGER ERROR] Could not start worker for final drain: {}", e);
            }
        }

        let Some(join) = handle.take() else {
            return true;
        };

        let _ = self.shared.state.compare_exchange(
            WorkerState::Running as u8,
            WorkerState::Draining as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        self.shared.drain_requested.store(true, Ordering::SeqCst);

        if let (Some(timeout), Some(deadline)) = (timeout, deadline) {
            while !join.is_finished() {
                if Instant::now() >= deadline {
                    eprintln!(
                        "[LOGGER WARNING] Log worker did not finish within {:?}. \
                         Messages may still be draining.",
                        timeout
                    );
                    *handle = Some(join);
                    return false;
                }
                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = join.join() {
            eprintln!("[LOGGER ERROR] Log worker thread panicked during shutdown: {:?}", e);
            self.shared.set_state(WorkerState::Stopped);
            return false;
        }

        let dropped = self.shared.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Log worker shut down with {} dropped messages (drop rate: {:.2}%)",
                dropped,
                self.shared.metrics.drop_rate()
            );
        }
        true
    }
}

impl Drop for LogWorker {
    fn drop(&mut self) {
        self.shutdown_inner(Some(DEFAULT_SHUTDOWN_TIMEOUT));
    }
}

/// Builder for constructing a [`LogWorker`] with a fluent API
///
/// # Example
/// ```
/// use rust_logworker::prelude::*;
/// use std::sync::Arc;
///
/// let worker = LogWorker::builder()
///     .capacity(4096)
///     .min_level(LogLevel::Debug)
///     .overflow_policy(OverflowPolicy::AlertAndDrop)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} messages dropped", count);
///     }))
///     .build()
///     .unwrap();
/// ```
pub struct LogWorkerBuilder {
    config: WorkerConfig,
    sinks: Vec<Box<dyn Sink>>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    hooks: FatalHooks,
}

impl LogWorkerBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
            sinks: Vec::new(),
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
            hooks: FatalHooks::new(),
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Queue capacity; must be a power of two
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exact_count(mut self, exact: bool) -> Self {
        self.config.exact_count = exact;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_message_size(mut self, max: Option<usize>) -> Self {
        self.config.max_message_size = max;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Set the overflow policy for non-fatal messages
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set a callback for overflow notifications
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Add a sink; sinks receive messages in the order they were added
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pre_fatal_hook(mut self, hook: PreFatalHook) -> Self {
        self.hooks.set_pre_fatal_hook(hook);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fatal_exit_handler(mut self, handler: FatalExitHandler) -> Self {
        self.hooks.set_exit_handler(handler);
        self
    }

    /// Build the worker; it starts if any sink was added
    pub fn build(self) -> Result<LogWorker> {
        let worker = LogWorker::with_parts(
            self.config,
            self.overflow_policy,
            self.on_overflow,
            self.hooks,
        )?;
        for sink in self.sinks {
            worker.add_boxed_sink(sink)?;
        }
        Ok(worker)
    }
}

impl Default for LogWorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
