//! Facade over the real and fake clock implementations.

use std::time::{Instant, SystemTime};

use crate::pal::abstractions::Platform;
#[cfg(test)]
use crate::pal::fake::FakePlatform;
use crate::pal::real::RealPlatform;

/// Dispatches clock calls to the real implementation or, in tests, to a
/// fake with controllable time.
#[derive(Clone, Debug)]
pub(crate) enum PlatformFacade {
    /// The operating system clocks.
    Real(RealPlatform),

    /// A test double with controllable time.
    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    /// Creates a facade over the real operating system clocks.
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform)
    }

    /// Creates a facade over a fake clock for testing.
    #[cfg(test)]
    pub(crate) fn fake(fake: FakePlatform) -> Self {
        Self::Fake(fake)
    }
}

impl Platform for PlatformFacade {
    fn monotonic(&self) -> Instant {
        match self {
            Self::Real(platform) => platform.monotonic(),
            #[cfg(test)]
            Self::Fake(platform) => platform.monotonic(),
        }
    }

    fn wall_clock(&self) -> SystemTime {
        match self {
            Self::Real(platform) => platform.wall_clock(),
            #[cfg(test)]
            Self::Fake(platform) => platform.wall_clock(),
        }
    }
}
