use core::time::Duration;

use super::SleepProvider;
use crate::{IdGenStatus, Result, RimeGenerator, RimeId};

/// Extension trait for asynchronously generating IDs.
///
/// This trait enables [`RimeGenerator`] types to yield IDs in a
/// `Future`-based context by awaiting until the generator is ready to produce
/// a new ID.
///
/// The default implementation retries with the specified [`SleepProvider`]
/// whenever the generator reports a pending state, sleeping for the duration
/// the generator suggests.
pub trait RimeGeneratorAsyncExt {
    type Err;

    /// Returns a future that resolves to the next available ID.
    ///
    /// If the generator is not ready to issue a new ID immediately, the
    /// future will sleep for the amount of time indicated by the generator
    /// and retry.
    ///
    /// # Errors
    ///
    /// This future may return an error if the generator encounters one.
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<RimeId, Self::Err>>
    where
        S: SleepProvider;
}

impl<G> RimeGeneratorAsyncExt for G
where
    G: RimeGenerator + Sync,
{
    type Err = G::Err;

    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<RimeId, Self::Err>>
    where
        S: SleepProvider,
    {
        async {
            loop {
                let dur = match self.try_next_id()? {
                    IdGenStatus::Ready { id } => return Ok(id),
                    IdGenStatus::Pending { yield_for } => Duration::from_millis(yield_for),
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
