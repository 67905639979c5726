//! Clock abstraction trait definitions.

use std::fmt::Debug;
use std::time::{Instant, SystemTime};

/// Provides the timestamps used for job timing.
///
/// This trait abstracts the underlying clock sources, allowing for both a
/// real implementation (reading the operating system clocks) and a fake
/// implementation (for testing). Durations are always derived from the
/// monotonic source; the wall clock feeds only the display timestamps.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Gets the current monotonic timestamp.
    ///
    /// `total`, `missed` and parallel-group averages are computed from this
    /// source so that wall clock adjustments cannot corrupt durations.
    fn monotonic(&self) -> Instant;

    /// Gets the current wall-clock timestamp.
    ///
    /// Only the `start`/`end` display fields of timing records are derived
    /// from this source.
    fn wall_clock(&self) -> SystemTime;
}
