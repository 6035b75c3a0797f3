use core::cmp;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdGenStatus, Result, RimeGenerator, RimeId, time::TimeSource};

/// A lock-free ID generator suitable for multi-threaded environments.
///
/// This generator stores the packed ID state in an [`AtomicU64`] and
/// publishes updates with a compare-and-swap, so contended attempts never
/// block. An attempt that loses the race reports [`IdGenStatus::Pending`]
/// with a zero wait and can be retried immediately.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair access under contention
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`LockRimeGenerator`]
///
/// [`LockRimeGenerator`]: crate::LockRimeGenerator
pub struct AtomicRimeGenerator<T: TimeSource> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    time: T,
}

impl<T: TimeSource> AtomicRimeGenerator<T> {
    /// Creates a new [`AtomicRimeGenerator`] for the given worker ID.
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
    /// use rimeid::{AtomicRimeGenerator, IdGenStatus, MonotonicClock, RimeId};
    ///
    /// let generator = AtomicRimeGenerator::new(0, MonotonicClock::default());
    ///
    /// let id: RimeId = loop {
    ///     match generator.next_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => core::hint::spin_loop(),
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
        let initial = RimeId::from_components(timestamp, worker_id, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial.to_raw())),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial.to_raw()),
            time,
        }
    }

    /// Reassigns the worker ID encoded into subsequent IDs.
    ///
    /// The timestamp and sequence state are carried over unchanged. The
    /// update retries its compare-and-swap until it lands, so concurrent
    /// generation attempts are never lost.
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

        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = RimeId::from_raw(current).with_worker_id(worker_id).to_raw();
            match self
                .state
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// Forces the last-observed timestamp to `timestamp`.
    ///
    /// The worker ID and sequence are preserved. This is a state seam for
    /// tests and recovery tooling: setting a timestamp ahead of the time
    /// source makes subsequent attempts report [`IdGenStatus::Pending`]
    /// until the clock catches up, which is how a backward clock step
    /// behaves.
    pub fn set_last_timestamp(&self, timestamp: u64) {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = RimeId::from_raw(current).with_timestamp(timestamp).to_raw();
            match self
                .state
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Attempts to generate the next available ID.
    ///
    /// This is the infallible counterpart to [`Self::try_next_id`].
    ///
    /// # Example
    /// ```
    /// use rimeid::{AtomicRimeGenerator, IdGenStatus, MonotonicClock, RimeId};
    ///
    /// let generator = AtomicRimeGenerator::new(0, MonotonicClock::default());
    ///
    /// let id: RimeId = loop {
    ///     match generator.next_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// ```
    pub fn next_id(&self) -> IdGenStatus {
        match self.try_next_id() {
            Ok(id) => id,
            Err(e) =>
            {
                #[allow(unreachable_code)]
                match e {}
            }
        }
    }

    /// A fallible version of [`Self::next_id`] that returns a [`Result`].
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   milliseconds) before trying again
    ///
    /// # Errors
    /// - This method never returns an error. It is fallible so that both
    ///   generators share one calling convention.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<IdGenStatus, core::convert::Infallible> {
        let now = self.time.current_millis();

        let current_raw = self.state.load(Ordering::Relaxed);
        let current_id = RimeId::from_raw(current_raw);
        let current_ts = current_id.timestamp();

        let next_id = match now.cmp(&current_ts) {
            cmp::Ordering::Equal => {
                if current_id.has_sequence_room() {
                    current_id.increment_sequence()
                } else {
                    return Ok(IdGenStatus::Pending { yield_for: 1 });
                }
            }
            cmp::Ordering::Greater => current_id.rollover_to_timestamp(now),
            cmp::Ordering::Less => {
                return Ok(Self::cold_clock_behind(now, current_ts));
            }
        };

        let next_raw = next_id.to_raw();

        if self
            .state
            .compare_exchange(current_raw, next_raw, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            Ok(IdGenStatus::Ready { id: next_id })
        } else {
            // CAS failed - another thread won the race. Yield 0 to retry
            // immediately.
            Ok(IdGenStatus::Pending { yield_for: 0 })
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

impl<T: TimeSource> RimeGenerator for AtomicRimeGenerator<T> {
    type Err = core::convert::Infallible;

    fn try_next_id(&self) -> Result<IdGenStatus, Self::Err> {
        self.try_next_id()
    }
}
