use core::fmt;

use crate::{IdGenStatus, Result, RimeId};

/// A minimal interface for generating [`RimeId`]s.
///
/// Implementations expose a single non-blocking [`try_next_id`] attempt; the
/// provided methods layer infallible and blocking conveniences on top of it.
///
/// [`try_next_id`]: RimeGenerator::try_next_id
pub trait RimeGenerator {
    /// The error type returned by [`RimeGenerator::try_next_id`].
    type Err: fmt::Debug;

    /// Attempts to generate the next available ID without blocking.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   milliseconds) before trying again
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    fn try_next_id(&self) -> Result<IdGenStatus, Self::Err>;

    /// Attempts to generate the next available ID without blocking.
    ///
    /// This is the infallible counterpart to [`RimeGenerator::try_next_id`],
    /// available when the implementation cannot fail.
    fn next_id(&self) -> IdGenStatus
    where
        Self::Err: Into<core::convert::Infallible>,
    {
        match self.try_next_id() {
            Ok(status) => status,
            Err(e) => {
                #[allow(unreachable_code)]
                // `into()` satisfies the trait bound at compile time.
                match e.into() {}
            }
        }
    }

    /// Generates the next available ID, waiting out any pending state.
    ///
    /// Retries [`RimeGenerator::try_next_id`] until an ID is ready. Lost
    /// races are retried with a spin hint; sequence exhaustion and a
    /// backward-observed clock are waited out by yielding to the OS scheduler
    /// until the time source catches up. The wait is bounded by how far the
    /// clock is behind, so this stalls rather than fails when time moves
    /// backward.
    ///
    /// # Errors
    ///
    /// May return an error if the underlying implementation uses a lock and it
    /// is poisoned.
    fn try_next_id_blocking(&self) -> Result<RimeId, Self::Err> {
        loop {
            match self.try_next_id()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_for: 0 } => core::hint::spin_loop(),
                IdGenStatus::Pending { .. } => std::thread::yield_now(),
            }
        }
    }

    /// Generates the next available ID, waiting out any pending state.
    ///
    /// This is the infallible counterpart to
    /// [`RimeGenerator::try_next_id_blocking`].
    fn next_id_blocking(&self) -> RimeId
    where
        Self::Err: Into<core::convert::Infallible>,
    {
        loop {
            match self.next_id() {
                IdGenStatus::Ready { id } => return id,
                IdGenStatus::Pending { yield_for: 0 } => core::hint::spin_loop(),
                IdGenStatus::Pending { .. } => std::thread::yield_now(),
            }
        }
    }
}
