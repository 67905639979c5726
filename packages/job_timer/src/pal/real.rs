//! Real clock implementation backed by the standard library.

use std::time::{Instant, SystemTime};

use crate::pal::abstractions::Platform;

/// Real implementation of the clock abstraction, reading the operating
/// system clocks through the standard library.
#[derive(Clone, Debug)]
pub(crate) struct RealPlatform;

impl Platform for RealPlatform {
    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn wall_clock(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[cfg(test)]
#[cfg(not(miri))] // Miri cannot talk to the real platform.
mod tests {
    use super::*;

    #[test]
    fn monotonic_is_approximately_now() {
        let platform = RealPlatform;
        let before = Instant::now();
        let captured = platform.monotonic();
        let after = Instant::now();

        assert!(captured >= before);
        assert!(captured <= after);
    }

    #[test]
    fn wall_clock_is_approximately_now() {
        let platform = RealPlatform;
        let captured = platform.wall_clock();

        let delta = match SystemTime::now().duration_since(captured) {
            Ok(elapsed) => elapsed,
            Err(error) => error.duration(),
        };

        assert!(delta.as_millis() < 100);
    }
}
