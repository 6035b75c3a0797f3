use crate::RimeId;

/// A result type that defaults to the crate's [`Error`].
///
/// Generator implementations substitute their own error type: the atomic
/// generator uses [`core::convert::Infallible`] because it has no failure
/// path at runtime.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `rimeid` can emit.
///
/// ID generation itself never fails: sequence exhaustion and backward clock
/// movement are reported as [`IdGenStatus::Pending`] and absorbed by waiting.
/// Errors are limited to argument validation and, when the lock-based
/// generator is built against the std mutex, lock poisoning.
///
/// [`IdGenStatus::Pending`]: crate::IdGenStatus::Pending
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The requested worker id does not fit the 10-bit worker field.
    #[error("worker id {0} exceeds maximum {max}", max = RimeId::MAX_WORKER_ID)]
    InvalidWorkerId(u64),

    /// The operation failed because the generator lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
impl<T> From<std::sync::PoisonError<std::sync::MutexGuard<'_, T>>> for Error {
    fn from(_: std::sync::PoisonError<std::sync::MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
