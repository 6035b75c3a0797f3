//! Process-wide ID generation.
//!
//! Provides a single shared generator so that every caller in the process
//! mints from one monotonic stream. The generator is lock-free and reads a
//! monotonic clock, so IDs never repeat and never go backward within the
//! process.
//!
//! In rare cases where the generator saturates within the same millisecond
//! (sequence overflow), callers wait using the configured backoff strategy
//! (e.g., spin, yield, sleep). These overflows typically resolve within ~1ms.
//!
//! # Example
//! ```rust
//! use rimeid::{Backoff, rime_mono};
//!
//! let id = rime_mono(Backoff::Yield);
//! println!("ID: {}", id);
//! ```

use std::sync::LazyLock;

use crate::{AtomicRimeGenerator, IdGenStatus, MonotonicClock, RimeId};

/// The system clock used by the process-wide generator.
pub type Clock = MonotonicClock;

/// The generator type backing [`process_generator`].
pub type ProcessGenerator = AtomicRimeGenerator<Clock>;

/// A process-wide generator anchored to a monotonic clock at first use.
///
/// Starts with worker ID 0 until reassigned.
static PROCESS_GENERATOR: LazyLock<ProcessGenerator> =
    LazyLock::new(|| ProcessGenerator::new(0, Clock::default()));

/// Returns the process-wide generator.
///
/// Every call returns the same instance. The generator starts with worker ID
/// 0; deployments running more than one process should assign a distinct
/// worker ID once at startup:
///
/// ```rust
/// use rimeid::process_generator;
///
/// process_generator().set_worker_id(42).expect("worker id out of range");
/// ```
pub fn process_generator() -> &'static ProcessGenerator {
    &PROCESS_GENERATOR
}

/// Backoff strategies for waiting out a saturated generator.
///
/// If the sequence for the current millisecond is exhausted, or the clock has
/// been observed moving backward, [`rime_mono`] invokes one of these
/// strategies to wait before retrying.
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Busy-waits in a tight loop.
    ///
    /// Offers maximum throughput at the cost of high CPU usage.
    Spin,

    /// Yields to the OS scheduler to allow other threads to run.
    ///
    /// More CPU-friendly than spinning, but may still busy-wait if no other
    /// threads are ready.
    Yield,

    /// Sleeps for the requested retry delay in milliseconds.
    ///
    /// Lowest CPU usage, but may oversleep depending on platform-specific
    /// scheduler resolution.
    Sleep,
}

/// Generates an ID from the process-wide generator using the specified
/// [`Backoff`] strategy.
///
/// This is a convenient wrapper around [`rime_mono_with_backoff`] with
/// built-in strategies.
///
/// # Example
/// ```rust
/// use rimeid::{Backoff, rime_mono};
///
/// let id = rime_mono(Backoff::Yield);
/// ```
pub fn rime_mono(strategy: Backoff) -> RimeId {
    rime_mono_with_backoff(|yield_for| match strategy {
        Backoff::Spin => core::hint::spin_loop(),
        Backoff::Yield => std::thread::yield_now(),
        Backoff::Sleep => {
            std::thread::sleep(core::time::Duration::from_millis(yield_for));
        }
    })
}

/// Generates an ID from the process-wide generator using a custom backoff
/// strategy.
///
/// The provided function is called when the generator must wait before
/// retrying. The `yield_for` argument indicates the recommended wait time in
/// milliseconds; zero means the attempt lost a race and can be retried
/// immediately.
///
/// # Example
/// ```rust
/// use rimeid::rime_mono_with_backoff;
///
/// let id = rime_mono_with_backoff(|yield_for| {
///     std::thread::sleep(std::time::Duration::from_millis(yield_for * 2));
/// });
/// ```
pub fn rime_mono_with_backoff(f: impl Fn(u64)) -> RimeId {
    let generator = process_generator();
    loop {
        match generator.next_id() {
            IdGenStatus::Ready { id } => break id,
            IdGenStatus::Pending { yield_for } => f(yield_for),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread::scope;

    #[test]
    fn accessor_returns_the_same_instance() {
        assert!(std::ptr::eq(process_generator(), process_generator()));
    }

    #[test]
    fn sequential_ids_are_strictly_increasing() {
        let mut last = rime_mono(Backoff::Yield);
        for _ in 0..10_000 {
            let id = rime_mono(Backoff::Yield);
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn concurrent_ids_are_unique() {
        const THREADS: usize = 8;
        const IDS_PER_THREAD: usize = 125;

        let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD)));

        scope(|s| {
            for _ in 0..THREADS {
                let seen_ids = Arc::clone(&seen_ids);
                s.spawn(move || {
                    for _ in 0..IDS_PER_THREAD {
                        let id = rime_mono(Backoff::Yield);
                        assert!(seen_ids.lock().unwrap().insert(id));
                    }
                });
            }
        });

        let final_count = seen_ids.lock().unwrap().len();
        assert_eq!(final_count, THREADS * IDS_PER_THREAD);
    }
}
