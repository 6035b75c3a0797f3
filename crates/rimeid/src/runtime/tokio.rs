use crate::{Result, RimeGenerator, RimeId, SleepProvider};
use core::pin::Pin;

/// Extension trait for asynchronously generating IDs using the
/// [`tokio`](https://docs.rs/tokio) async runtime.
///
/// This trait provides a convenience method for using a [`SleepProvider`]
/// backed by the `tokio` runtime, allowing you to call `.try_next_id_async()`
/// without specifying the sleep strategy manually.
pub trait RimeGeneratorAsyncTokioExt {
    type Err;

    /// Returns a future that resolves to the next available ID using the
    /// [`TokioSleep`] provider.
    ///
    /// Internally delegates to
    /// [`RimeGeneratorAsyncExt::try_next_id_async`] with [`TokioSleep`] as
    /// the sleep strategy.
    ///
    /// # Errors
    ///
    /// This future may return an error if the underlying generator does.
    ///
    /// [`RimeGeneratorAsyncExt::try_next_id_async`]:
    ///     crate::RimeGeneratorAsyncExt::try_next_id_async
    fn try_next_id_async(&self) -> impl Future<Output = Result<RimeId, Self::Err>>;
}

impl<G> RimeGeneratorAsyncTokioExt for G
where
    G: RimeGenerator + Sync,
{
    type Err = G::Err;

    fn try_next_id_async(&self) -> impl Future<Output = Result<RimeId, Self::Err>> {
        <Self as crate::RimeGeneratorAsyncExt>::try_next_id_async::<TokioSleep>(self)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    type Sleep = tokio::time::Sleep;

    fn sleep_for(dur: core::time::Duration) -> Self::Sleep {
        tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`TokioSleep`]) is often
/// more efficient due to reduced scheduler churn.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    /// Tokio's `yield_now()` returns a private future type, so we must use a
    /// boxed `dyn Future` to abstract over it.
    type Sleep = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn sleep_for(_dur: core::time::Duration) -> Self::Sleep {
        Box::pin(tokio::task::yield_now())
    }
}
