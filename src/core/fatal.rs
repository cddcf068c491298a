//! Fatal escalation: causes, hooks and the first-fatal-wins latch
//!
//! A fatal message runs the pre-fatal hook on the submitting thread, travels
//! through the ordinary queue behind everything logged before it, is delivered
//! to every sink, and finally reaches the fatal exit handler on the worker
//! thread. The exit handler is what terminates the process.

use super::message::Message;
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Hook run on the calling thread right before a fatal message is queued
pub type PreFatalHook = Arc<dyn Fn() + Send + Sync>;

/// Handler run on the worker thread after a fatal message reached every sink
pub type FatalExitHandler = Arc<dyn Fn(&Message) + Send + Sync>;

/// Platform-independent code for an OS-level terminating signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FatalSignal {
    Abort,
    Segv,
    Fpe,
    Ill,
    Term,
    Other(i32),
}

impl FatalSignal {
    /// Raw signal number on this platform
    pub fn raw(self) -> i32 {
        match self {
            FatalSignal::Abort => libc::SIGABRT,
            FatalSignal::Segv => libc::SIGSEGV,
            FatalSignal::Fpe => libc::SIGFPE,
            FatalSignal::Ill => libc::SIGILL,
            FatalSignal::Term => libc::SIGTERM,
            FatalSignal::Other(raw) => raw,
        }
    }

    pub fn from_raw(raw: i32) -> Self {
        match raw {
            libc::SIGABRT => FatalSignal::Abort,
            libc::SIGSEGV => FatalSignal::Segv,
            libc::SIGFPE => FatalSignal::Fpe,
            libc::SIGILL => FatalSignal::Ill,
            libc::SIGTERM => FatalSignal::Term,
            other => FatalSignal::Other(other),
        }
    }

    pub fn name(self) -> String {
        match self {
            FatalSignal::Abort => "SIGABRT".to_string(),
            FatalSignal::Segv => "SIGSEGV".to_string(),
            FatalSignal::Fpe => "SIGFPE".to_string(),
            FatalSignal::Ill => "SIGILL".to_string(),
            FatalSignal::Term => "SIGTERM".to_string(),
            FatalSignal::Other(raw) => format!("signal {}", raw),
        }
    }
}

/// Why a message is fatal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatalCause {
    /// Explicit fatal-level log call
    FatalLog,
    /// A checked condition did not hold
    ContractViolation { expression: String },
    /// An OS signal trapped by an external crash handler
    Signal(FatalSignal),
}

impl FatalCause {
    /// Signal the default exit handler terminates with
    pub fn exit_signal(&self) -> FatalSignal {
        match self {
            FatalCause::Signal(signal) => *signal,
            FatalCause::FatalLog | FatalCause::ContractViolation { .. } => FatalSignal::Abort,
        }
    }
}

impl fmt::Display for FatalCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalCause::FatalLog => write!(f, "fatal log"),
            FatalCause::ContractViolation { expression } => {
                write!(f, "contract violation: CHECK({}) failed", expression)
            }
            FatalCause::Signal(signal) => write!(f, "fatal signal {}", signal.name()),
        }
    }
}

/// Terminate the process the way the fatal event asked for.
///
/// Signals are re-raised with their default disposition so the process dies
/// with the original cause; everything else, or a signal that returns, aborts.
pub fn default_fatal_exit(message: &Message) {
    let signal = message
        .fatal_cause()
        .map(FatalCause::exit_signal)
        .unwrap_or(FatalSignal::Abort);

    if signal != FatalSignal::Abort {
        // SAFETY: resetting a disposition and raising are async-signal-safe
        // libc calls with no memory-safety preconditions.
        unsafe {
            libc::signal(signal.raw(), libc::SIG_DFL);
            libc::raise(signal.raw());
        }
    }
    std::process::abort();
}

/// Hook pair consulted by the fatal path.
///
/// Owned by the worker; replaced through its setters and restored to defaults
/// with [`FatalHooks::reset`].
#[derive(Clone)]
pub struct FatalHooks {
    pre_fatal: Option<PreFatalHook>,
    exit_handler: FatalExitHandler,
}

impl FatalHooks {
    pub fn new() -> Self {
        Self {
            pre_fatal: None,
            exit_handler: Arc::new(default_fatal_exit),
        }
    }

    pub fn set_pre_fatal_hook(&mut self, hook: PreFatalHook) {
        self.pre_fatal = Some(hook);
    }

    pub fn set_exit_handler(&mut self, handler: FatalExitHandler) {
        self.exit_handler = handler;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn pre_fatal_hook(&self) -> Option<&PreFatalHook> {
        self.pre_fatal.as_ref()
    }

    pub fn exit_handler(&self) -> &FatalExitHandler {
        &self.exit_handler
    }
}

impl Default for FatalHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FatalHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FatalHooks")
            .field("pre_fatal", &self.pre_fatal.is_some())
            .finish_non_exhaustive()
    }
}

/// First-fatal-wins latch plus the rendezvous the fatal submitter waits on.
pub(crate) struct FatalLatch {
    claimed: AtomicBool,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
}

impl FatalLatch {
    pub(crate) fn new() -> Self {
        let (done_tx, done_rx) = bounded(1);
        Self {
            claimed: AtomicBool::new(false),
            done_tx,
            done_rx,
        }
    }

    /// True for exactly one caller over the latch's lifetime.
    pub(crate) fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Called by the worker once the exit handler returned.
    pub(crate) fn complete(&self) {
        let _ = self.done_tx.try_send(());
    }

    /// Wait for the worker to finish the escalation, checking `gave_up`
    /// between waits so a stopped worker cannot strand the caller.
    pub(crate) fn wait_completed(&self, gave_up: impl Fn() -> bool) -> bool {
        loop {
            match self.done_rx.recv_timeout(Duration::from_millis(50)) {
                Ok(()) => return true,
                Err(_) if gave_up() => return false,
                Err(_) => {}
            }
        }
    }
}
