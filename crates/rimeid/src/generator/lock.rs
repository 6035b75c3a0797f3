use core::cmp::Ordering;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, IdGenStatus, Result, RimeGenerator, RimeId, generator::mutex::Mutex, time::TimeSource,
};

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// This generator wraps the packed ID state in an [`Arc<Mutex<_>>`], so every
/// attempt reads the clock and updates the state inside one critical section.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access under contention
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support atomics.
///
/// ## See Also
/// - [`AtomicRimeGenerator`]
///
/// [`AtomicRimeGenerator`]: crate::AtomicRimeGenerator
pub struct LockRimeGenerator<T: TimeSource> {
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<RimeId>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<RimeId>>,
    time: T,
}

impl<T: TimeSource> LockRimeGenerator<T> {
    /// Creates a new [`LockRimeGenerator`] for the given worker ID.
    ///
    /// The initial timestamp and sequence are zero; the provided `time`
    /// source is read on every generation attempt.
    ///
    /// Worker IDs wider than 10 bits are truncated to fit the field (and
    /// panic in debug builds). Use [`Self::set_worker_id`] for a validated
    /// assignment.
    ///
    /// # Example
    /// ```
    /// use rimeid::{IdGenStatus, LockRimeGenerator, MonotonicClock, RimeId};
    ///
    /// let generator = LockRimeGenerator::new(0, MonotonicClock::default());
    ///
    /// let id: RimeId = loop {
    ///     match generator.try_next_id() {
    ///         Ok(IdGenStatus::Ready { id }) => break id,
    ///         Ok(IdGenStatus::Pending { .. }) => std::thread::yield_now(),
    ///         Err(e) => panic!("generator error: {e}"),
    ///     }
    /// };
    /// ```
    pub fn new(worker_id: u64, time: T) -> Self {
        Self::from_components(0, worker_id, 0, time)
    }

    /// Creates a new ID generator from explicit component values.
    ///
    /// This constructor is primarily useful for advanced use cases such as
    /// restoring state from persistent storage or controlling the starting
    /// point of the generator manually. In typical use, prefer [`Self::new`]
    /// and let the generator initialize itself from the current time.
    pub fn from_components(timestamp: u64, worker_id: u64, sequence: u64, time: T) -> Self {
        let id = RimeId::from_components(timestamp, worker_id, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(id))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(id)),
            time,
        }
    }

    /// Reassigns the worker ID encoded into subsequent IDs.
    ///
    /// The timestamp and sequence state are left untouched, so IDs minted
    /// after the change continue the same monotonic stream under the new
    /// worker ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if `worker_id` exceeds
    /// [`RimeId::MAX_WORKER_ID`]. The generator state is not modified on
    /// error.
    pub fn set_worker_id(&self, worker_id: u64) -> Result<()> {
        if worker_id > RimeId::MAX_WORKER_ID {
            return Err(Error::InvalidWorkerId(worker_id));
        }

        let mut id = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        *id = id.with_worker_id(worker_id);
        Ok(())
    }

    /// Forces the last-observed timestamp to `timestamp`.
    ///
    /// The worker ID and sequence are preserved. This is a state seam for
    /// tests and recovery tooling: setting a timestamp ahead of the time
    /// source makes subsequent attempts report [`IdGenStatus::Pending`]
    /// until the clock catches up, which is how a backward clock step
    /// behaves.
    pub fn set_last_timestamp(&self, timestamp: u64) -> Result<()> {
        let mut id = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        *id = id.with_timestamp(timestamp);
        Ok(())
    }

    /// Attempts to generate the next available ID.
    ///
    /// The clock read, state comparison, and state update all happen while
    /// the lock is held, so IDs from concurrent callers never collide.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   milliseconds) before trying again
    ///
    /// # Errors
    /// - Returns an error if the underlying lock has been poisoned.
    ///
    /// # Example
    /// ```
    /// use rimeid::{LockRimeGenerator, MonotonicClock, RimeGenerator, RimeId};
    ///
    /// let generator = LockRimeGenerator::new(0, MonotonicClock::default());
    ///
    /// let id: RimeId = generator.try_next_id_blocking().expect("lock poisoned");
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<IdGenStatus> {
        let now = self.time.current_millis();

        let mut id = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let current_ts = id.timestamp();
        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                    Ok(IdGenStatus::Ready { id: *id })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(now);
                Ok(IdGenStatus::Ready { id: *id })
            }
            Ordering::Less => Ok(Self::cold_clock_behind(now, current_ts)),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, current_ts: u64) -> IdGenStatus {
        IdGenStatus::Pending {
            yield_for: current_ts - now,
        }
    }
}

impl<T: TimeSource> RimeGenerator for LockRimeGenerator<T> {
    type Err = Error;

    fn try_next_id(&self) -> Result<IdGenStatus, Self::Err> {
        self.try_next_id()
    }
}
