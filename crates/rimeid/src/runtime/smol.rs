use crate::{Result, RimeGenerator, RimeId, SleepProvider};
use pin_project_lite::pin_project;
use smol::Timer;
use std::{
    pin::Pin,
    task::{Context, Poll},
};

/// Extension trait for asynchronously generating IDs using the
/// [`smol`](https://docs.rs/smol) async runtime.
///
/// This trait provides a convenience method for using a [`SleepProvider`]
/// backed by the `smol` runtime, allowing you to call `.try_next_id_async()`
/// without needing to specify the sleep strategy manually.
pub trait RimeGeneratorAsyncSmolExt {
    type Err;

    /// Returns a future that resolves to the next available ID using the
    /// [`SmolSleep`] provider.
    ///
    /// Internally delegates to
    /// [`RimeGeneratorAsyncExt::try_next_id_async`] with [`SmolSleep`] as
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

impl<G> RimeGeneratorAsyncSmolExt for G
where
    G: RimeGenerator + Sync,
{
    type Err = G::Err;

    fn try_next_id_async(&self) -> impl Future<Output = Result<RimeId, Self::Err>> {
        <Self as crate::RimeGeneratorAsyncExt>::try_next_id_async::<SmolSleep>(self)
    }
}

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    type Sleep = SmolSleepFuture;

    fn sleep_for(dur: std::time::Duration) -> Self::Sleep {
        SmolSleepFuture {
            timer: Timer::after(dur),
        }
    }
}

pin_project! {
    /// Internal future returned by [`SmolSleep::sleep_for`].
    ///
    /// This type wraps a [`smol::Timer`] and implements [`Future`] with `Output
    /// = ()`, discarding the timer's `Instant` result.
    ///
    /// You should not construct or use this type directly. It is only used
    /// internally by the [`SleepProvider`] implementation for the Smol runtime.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct SmolSleepFuture {
        #[pin]
        timer: Timer,
    }
}

impl Future for SmolSleepFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.project().timer.poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}
