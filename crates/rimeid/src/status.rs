use crate::RimeId;

/// Outcome of a single, non-blocking ID generation attempt.
///
/// Generators never spin internally. When the clock has not advanced past an
/// exhausted sequence, or the clock has moved backward, they report
/// [`IdGenStatus::Pending`] and let the caller decide how to wait: spin,
/// sleep, or yield to an async runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A new ID was produced.
    Ready {
        /// The generated ID.
        id: RimeId,
    },
    /// The generator cannot mint an ID yet.
    Pending {
        /// Milliseconds until the generator expects to make progress.
        ///
        /// A value of `0` means the attempt lost a race with another caller
        /// and can be retried immediately.
        yield_for: u64,
    },
}
