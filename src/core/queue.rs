//! Bounded lock-free ring buffer shared by producers and the dispatch worker
//!
//! Three free-running `u32` counters describe the queue:
//!
//! ```text
//!   read_index  <=  commit_index  <=  write_index  <=  read_index + capacity
//!       |                |                 |
//!       |                |                 +-- next slot offered to a producer
//!       |                +-- every slot below this has been written
//!       +-- next slot the consumer takes
//! ```
//!
//! A producer reserves a slot with a CAS on `write_index`, moves its value in,
//! then commits by advancing `commit_index` from its own index to index + 1.
//! A producer whose predecessor has not committed yet spins until it has, so
//! the consumer observes slots strictly in reservation order with no gaps.
//!
//! Capacity must be a power of two so that the counters can wrap around
//! `u32::MAX` without disturbing the slot mapping.

use super::error::{LoggerError, Result};
use crossbeam_utils::{Backoff, CachePadded};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Default queue capacity (2^14 messages)
pub const DEFAULT_CAPACITY: usize = 1 << 14;

/// Largest accepted capacity; keeps `write - read` unambiguous in `u32`
pub const MAX_CAPACITY: usize = 1 << 31;

struct Slot<T> {
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

pub struct BoundedQueue<T> {
    slots: Box<[Slot<T>]>,
    mask: u32,
    write_index: CachePadded<AtomicU32>,
    commit_index: CachePadded<AtomicU32>,
    read_index: CachePadded<AtomicU32>,
    /// Held while a consumer is between reading a slot and releasing it
    consumer: CachePadded<AtomicBool>,
    /// Exact element count, maintained only when requested
    count: Option<CachePadded<AtomicU32>>,
}

// SAFETY: values move between threads through the slots; access to each slot
// is handed over by the index protocol (a producer owns a slot between reserve
// and commit, the consumer owns it between observing the commit and advancing
// `read_index`), so `T: Send` is all that is required.
unsafe impl<T: Send> Send for BoundedQueue<T> {}
unsafe impl<T: Send> Sync for BoundedQueue<T> {}

impl<T> BoundedQueue<T> {
    /// Create a queue holding up to `capacity` values, with an approximate `size()`.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::build(capacity, false)
    }

    /// Create a queue that keeps an exact element count alongside the indices.
    pub fn with_exact_count(capacity: usize) -> Result<Self> {
        Self::build(capacity, true)
    }

    pub(crate) fn build(capacity: usize, exact_count: bool) -> Result<Self> {
        validate_capacity(capacity)?;

        let slots = (0..capacity).map(|_| Slot::empty()).collect();
        Ok(Self {
            slots,
            mask: (capacity - 1) as u32,
            write_index: CachePadded::new(AtomicU32::new(0)),
            commit_index: CachePadded::new(AtomicU32::new(0)),
            read_index: CachePadded::new(AtomicU32::new(0)),
            consumer: CachePadded::new(AtomicBool::new(false)),
            count: exact_count.then(|| CachePadded::new(AtomicU32::new(0))),
        })
    }

    #[inline]
    fn slot(&self, index: u32) -> &Slot<T> {
        &self.slots[(index & self.mask) as usize]
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Append `value`, or hand it back if the queue is full.
    ///
    /// Never blocks on the consumer. The only wait is the short spin while an
    /// earlier producer finishes committing its slot.
    pub fn push(&self, value: T) -> std::result::Result<(), T> {
        let capacity = self.capacity() as u32;
        let backoff = Backoff::new();

        let reserved = loop {
            let read = self.read_index.load(Ordering::Acquire);
            let write = self.write_index.load(Ordering::Relaxed);
            if write.wrapping_sub(read) >= capacity {
                return Err(value);
            }
            match self.write_index.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break write,
                Err(_) => backoff.spin(),
            }
        };

        // SAFETY: `reserved` was handed to this producer alone, and the
        // Acquire load of `read_index` above saw the consumer release it.
        unsafe {
            (*self.slot(reserved).value.get()).write(value);
        }

        // Counted before the commit so a consumer can never decrement first.
        if let Some(count) = &self.count {
            count.fetch_add(1, Ordering::Relaxed);
        }

        let backoff = Backoff::new();
        while self
            .commit_index
            .compare_exchange_weak(
                reserved,
                reserved.wrapping_add(1),
                Ordering::Release,
                Ordering::Relaxed,
            )
            .is_err()
        {
            backoff.snooze();
        }
        Ok(())
    }

    /// Take the oldest committed value, if any. Returns `None` when the queue
    /// is empty, when the next slot is reserved but not yet committed, or when
    /// another consumer is mid-pop.
    pub fn try_pop(&self) -> Option<T> {
        if self
            .consumer
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return None;
        }
        let value = self.pop_exclusive();
        self.consumer.store(false, Ordering::Release);
        value
    }

    /// Caller must hold the consumer flag.
    fn pop_exclusive(&self) -> Option<T> {
        let read = self.read_index.load(Ordering::Relaxed);
        let committed = self.commit_index.load(Ordering::Acquire);
        if read == committed {
            return None;
        }

        // SAFETY: `read` is below `commit_index`, so the slot holds an
        // initialized value whose write happened-before our Acquire load, and
        // producers cannot reuse the slot until `read_index` moves past it.
        let value = unsafe { (*self.slot(read).value.get()).assume_init_read() };

        // The consumer flag makes this uncontended; kept as a CAS so a broken
        // invariant shows up instead of silently skipping a slot.
        let advanced = self.read_index.compare_exchange(
            read,
            read.wrapping_add(1),
            Ordering::Release,
            Ordering::Relaxed,
        );
        debug_assert!(advanced.is_ok(), "read index moved under exclusive consumer");

        if let Some(count) = &self.count {
            count.fetch_sub(1, Ordering::Relaxed);
        }
        Some(value)
    }

    /// Spin, then yield, until a value is available. Never returns empty-handed.
    pub fn wait_pop(&self) -> T {
        let backoff = Backoff::new();
        loop {
            if let Some(value) = self.try_pop() {
                return value;
            }
            backoff.snooze();
        }
    }

    /// Like [`wait_pop`](Self::wait_pop) but gives up after `timeout`.
    pub fn wait_pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let backoff = Backoff::new();
        loop {
            if let Some(value) = self.try_pop() {
                return Some(value);
            }
            if Instant::now() >= deadline {
                return None;
            }
            if backoff.is_completed() {
                std::thread::sleep(Duration::from_micros(50));
            } else {
                backoff.snooze();
            }
        }
    }

    /// Number of queued values.
    ///
    /// Without exact counting this is a snapshot of two independently read
    /// indices: under concurrent pushes and pops it may be stale or briefly
    /// include reserved but uncommitted slots. Use it for diagnostics only.
    pub fn size(&self) -> usize {
        if let Some(count) = &self.count {
            return (count.load(Ordering::Relaxed) as usize).min(self.capacity());
        }
        let read = self.read_index.load(Ordering::Relaxed);
        let write = self.write_index.load(Ordering::Relaxed);
        (write.wrapping_sub(read) as usize).min(self.capacity())
    }

    /// True when exact counting was enabled at construction
    pub fn is_exact_count(&self) -> bool {
        self.count.is_some()
    }

    /// Nothing committed and waiting. Same staleness caveat as `size()`.
    pub fn is_empty(&self) -> bool {
        self.read_index.load(Ordering::Relaxed) == self.commit_index.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }
}

impl<T> Drop for BoundedQueue<T> {
    fn drop(&mut self) {
        let mut read = *self.read_index.get_mut();
        let committed = *self.commit_index.get_mut();
        while read != committed {
            // SAFETY: exclusive access; slots in [read, commit) are initialized.
            unsafe {
                (*self.slot(read).value.get()).assume_init_drop();
            }
            read = read.wrapping_add(1);
        }
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity())
            .field("write_index", &self.write_index.load(Ordering::Relaxed))
            .field("commit_index", &self.commit_index.load(Ordering::Relaxed))
            .field("read_index", &self.read_index.load(Ordering::Relaxed))
            .finish()
    }
}

pub(crate) fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(LoggerError::config("BoundedQueue", "capacity must be non-zero"));
    }
    if !capacity.is_power_of_two() {
        return Err(LoggerError::config(
            "BoundedQueue",
            format!("capacity {} is not a power of two", capacity),
        ));
    }
    if capacity > MAX_CAPACITY {
        return Err(LoggerError::config(
            "BoundedQueue",
            format!("capacity {} exceeds maximum {}", capacity, MAX_CAPACITY),
        ));
    }
    Ok(())
}
