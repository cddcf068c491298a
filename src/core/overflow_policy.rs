//! What a producer does when the queue is full
//!
//! The queue itself never blocks a producer; these policies are the caller's
//! choice layered on top of a failed push. Fatal messages ignore the policy
//! and always retry until they are queued.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling queue overflow
///
/// # Example
///
/// ```
/// use rust_logworker::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the new message and count it
    DropNewest,

    /// Retry until space is available
    ///
    /// Backpressures the producer behind the slowest sink.
    Block,

    /// Retry until space is available or the timeout expires, then drop
    BlockWithTimeout(Duration),

    /// Drop, count, and alert on stderr and through the overflow callback
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when messages are dropped due to queue overflow.
/// The parameter is the total count of dropped messages so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
