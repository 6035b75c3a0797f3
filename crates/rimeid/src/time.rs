use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Default epoch: Jan 1, 2023 00:00:00 UTC (in ms since `UNIX_EPOCH`).
///
/// Timestamps are stored as an offset from this epoch, which keeps the
/// 42-bit field usable for roughly 139 years.
pub const RIME_EPOCH: Duration = Duration::from_millis(1_672_531_200_000);

/// A source of monotonically meaningful time in milliseconds.
///
/// Generators call this once per attempt. Implementations should be cheap;
/// the value is interpreted as milliseconds since an epoch chosen by the
/// implementation.
pub trait TimeSource {
    /// Returns the current time in milliseconds since the source's epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// A [`TimeSource`] that reads the system wall clock on every call.
///
/// Readings are saturating: a system clock before the epoch yields `0`
/// rather than panicking. Because the wall clock can be stepped backward by
/// NTP or an operator, generators built on this source may observe time
/// moving backward and will stall until the clock catches up.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    epoch: Duration,
}

impl WallClock {
    /// Creates a wall clock source with a custom epoch (offset from
    /// `UNIX_EPOCH`).
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::with_epoch(RIME_EPOCH)
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .saturating_sub(self.epoch)
            .as_millis() as u64
    }
}

/// A [`TimeSource`] that never moves backward.
///
/// The wall clock is sampled once at construction to anchor the offset from
/// the epoch; after that, readings advance with [`Instant`], which the OS
/// guarantees to be monotonic. Wall-clock steps after construction do not
/// affect it, so generators built on this source never observe a backward
/// clock. The trade-off is that readings slowly drift from wall time if the
/// system clock is later corrected.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    base_millis: u64,
    anchor: Instant,
}

impl MonotonicClock {
    /// Creates a monotonic source anchored to the current wall time,
    /// expressed relative to `epoch` (offset from `UNIX_EPOCH`).
    pub fn with_epoch(epoch: Duration) -> Self {
        let base_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .saturating_sub(epoch)
            .as_millis() as u64;
        Self {
            base_millis,
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::with_epoch(RIME_EPOCH)
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.base_millis + self.anchor.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_2023_01_01() {
        assert_eq!(RIME_EPOCH.as_millis(), 1_672_531_200_000);
    }

    #[test]
    fn wall_clock_is_past_epoch() {
        let clock = WallClock::default();
        assert!(clock.current_millis() > 0);
    }

    #[test]
    fn wall_clock_saturates_future_epoch() {
        // An epoch far in the future would make "now" negative; readings
        // clamp to zero instead.
        let clock = WallClock::with_epoch(Duration::from_millis(u64::MAX));
        assert_eq!(clock.current_millis(), 0);
    }

    #[test]
    fn monotonic_clock_never_regresses() {
        let clock = MonotonicClock::default();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn monotonic_tracks_wall_at_construction() {
        let wall = WallClock::default();
        let mono = MonotonicClock::default();
        let delta = mono.current_millis().abs_diff(wall.current_millis());
        // Construction and the two reads happen within a few ms of each
        // other.
        assert!(delta < 1_000, "unexpected anchor drift: {delta}ms");
    }
}
