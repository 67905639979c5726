//! Fake clock implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::pal::abstractions::Platform;

/// Internal state for the fake clock that can be shared between clones.
#[derive(Debug)]
#[cfg(test)]
struct FakePlatformState {
    base_monotonic: Instant,
    monotonic_offset: Duration,
    wall_offset: Duration,
}

/// Fake implementation of the clock abstraction for testing.
///
/// This implementation allows tests to control the passage of time instead
/// of relying on the operating system clocks. Multiple clones of the same
/// `FakePlatform` share the same underlying time state, allowing tests to
/// advance time after the platform has been handed to a counter.
///
/// The wall clock starts at the Unix epoch, so wall-clock milliseconds in
/// snapshots equal the accumulated wall offset.
#[derive(Clone, Debug)]
#[cfg(test)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

#[cfg(test)]
impl FakePlatform {
    /// Creates a new fake clock positioned at the Unix epoch with zero
    /// monotonic offset.
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                base_monotonic: Instant::now(),
                monotonic_offset: Duration::ZERO,
                wall_offset: Duration::ZERO,
            })),
        }
    }

    /// Advances both the monotonic and the wall clock by the given amount.
    ///
    /// This affects all clones of this platform, allowing tests to simulate
    /// time progression during a measurement.
    pub(crate) fn advance(&self, delta: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state.monotonic_offset = state
            .monotonic_offset
            .checked_add(delta)
            .expect("advancing fake monotonic clock overflows Duration");
        state.wall_offset = state
            .wall_offset
            .checked_add(delta)
            .expect("advancing fake wall clock overflows Duration");
    }

    /// Advances only the wall clock, leaving the monotonic clock in place.
    ///
    /// Use this to simulate the two clock sources disagreeing, e.g. a wall
    /// clock adjustment applied by the operating system mid-measurement.
    pub(crate) fn advance_wall(&self, delta: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state.wall_offset = state
            .wall_offset
            .checked_add(delta)
            .expect("advancing fake wall clock overflows Duration");
    }
}

#[cfg(test)]
impl Platform for FakePlatform {
    fn monotonic(&self) -> Instant {
        let state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state
            .base_monotonic
            .checked_add(state.monotonic_offset)
            .expect("fake monotonic offset exceeds Instant range")
    }

    fn wall_clock(&self) -> SystemTime {
        let state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        UNIX_EPOCH
            .checked_add(state.wall_offset)
            .expect("fake wall offset exceeds SystemTime range")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn starts_at_epoch() {
        let platform = FakePlatform::new();
        assert_eq!(platform.wall_clock(), UNIX_EPOCH);
    }

    #[test]
    fn advance_moves_both_clocks() {
        let platform = FakePlatform::new();
        let monotonic_before = platform.monotonic();

        platform.advance(Duration::from_millis(150));

        assert_eq!(
            platform.monotonic().duration_since(monotonic_before),
            Duration::from_millis(150)
        );
        assert_eq!(
            platform.wall_clock(),
            UNIX_EPOCH + Duration::from_millis(150)
        );
    }

    #[test]
    fn advance_wall_leaves_monotonic_in_place() {
        let platform = FakePlatform::new();
        let monotonic_before = platform.monotonic();

        platform.advance_wall(Duration::from_millis(250));

        assert_eq!(platform.monotonic(), monotonic_before);
        assert_eq!(
            platform.wall_clock(),
            UNIX_EPOCH + Duration::from_millis(250)
        );
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();

        // Advancing one clone affects the other.
        platform1.advance(Duration::from_millis(100));
        assert_eq!(
            platform2.wall_clock(),
            UNIX_EPOCH + Duration::from_millis(100)
        );
    }
}
