//! Wall-clock timing of nested and parallel jobs.
//!
//! This package measures how long the individual jobs inside a request or
//! batch operation take, without an external tracing backend. Measurements
//! form a tree that mirrors the nesting of the instrumented code, and the
//! result carries derived statistics: the duration of every job, the
//! "missed" time a job spent outside its measured children, and merged
//! statistics for same-named jobs that ran as logically-parallel branches.
//!
//! The core functionality includes:
//! - [`Counter`] - handle addressing one job; drives start/stop calls and
//!   spawns parallel branch counters
//! - [`Snapshot`] - immutable copy of a stopped job's subtree
//! - [`ParallelGroup`] - merged statistics for repeated parallel branches
//! - [`Meta`] - string-keyed meta information attached to jobs
//! - [`Error`] - failures signaling misordered instrumentation calls
//!
//! This package is a diagnostics tool: durations come from the monotonic
//! clock, wall-clock timestamps are attached for display, and results are
//! plain values that can be printed, serialized or shipped to whatever
//! backend the host application prefers.
//!
//! # Simple usage
//!
//! ```
//! use std::thread::sleep;
//! use std::time::Duration;
//!
//! let profile = job_timer::start("Total");
//!
//! sleep(Duration::from_millis(10));
//! let job = profile.start("Job1")?;
//! sleep(Duration::from_millis(10));
//! job.stop();
//!
//! profile.stop();
//!
//! let result = profile.result().expect("stopped counters always have a result");
//! assert!(result.total() >= 20.0);
//! assert!(result.missed().expect("jobs with children have missed time") >= 10.0);
//! result.print_to_stdout();
//! # Ok::<(), job_timer::Error>(())
//! ```
//!
//! # Addressing jobs by path
//!
//! Nested jobs can be driven entirely from the root counter with
//! slash-separated paths; intermediate jobs are created as needed and
//! stopping a path that was never created is a harmless no-op:
//!
//! ```
//! let profile = job_timer::start("Total");
//!
//! profile.start("Job2/Subjob")?;
//! profile.stop_path("Job2/Subjob");
//! profile.stop_path("Job2");
//! profile.stop_path("OnlySometimesCreated"); // silently ignored
//! profile.stop();
//! # Ok::<(), job_timer::Error>(())
//! ```
//!
//! # Parallel branches
//!
//! Logically-parallel work - several outstanding callbacks interleaved on
//! one thread - is measured through detached branch counters. Same-named
//! jobs across branches merge into one [`ParallelGroup`] when the parent
//! stops:
//!
//! ```
//! let profile = job_timer::start("Total");
//!
//! let branches: Vec<_> = (0..10)
//!     .map(|_| {
//!         let branch = profile.parallel()?;
//!         branch.start("Job1")?;
//!         Ok(branch)
//!     })
//!     .collect::<Result<_, job_timer::Error>>()?;
//!
//! // ... the branches make progress interleaved on this thread ...
//!
//! for branch in &branches {
//!     branch.stop_path("Job1");
//! }
//! profile.stop();
//!
//! let result = profile.result().expect("stopped counters always have a result");
//! // Ten same-named branch jobs merge into a single group.
//! assert_eq!(result.children().len(), 1);
//! # Ok::<(), job_timer::Error>(())
//! ```
//!
//! # Attaching meta information
//!
//! ```
//! use job_timer::Meta;
//! use serde_json::json;
//!
//! let mut meta = Meta::new();
//! meta.insert("files".to_string(), json!(3));
//!
//! let profile = job_timer::start_with_meta("Copy", meta);
//! profile.stop();
//!
//! let result = profile.result().expect("stopped counters always have a result");
//! assert_eq!(result.meta().get("files"), Some(&json!(3)));
//! ```
//!
//! # Threading
//!
//! The timer tree models a single-threaded cooperative flow: no call
//! blocks, and all mutation happens synchronously inside one counter call.
//! "Parallel" refers to logically overlapping work interleaved on one
//! execution thread, not multi-core parallelism, so [`Counter`] is
//! deliberately neither `Send` nor `Sync`. [`Snapshot`] values are plain
//! data and can be freely moved to other threads.

mod counter;
mod error;
mod meta;
mod node;
mod pal;
mod parallel_merge;
mod report;

pub use counter::Counter;
pub use error::{Error, Result};
pub use meta::Meta;
pub use report::{ParallelGroup, Snapshot, SnapshotChild};

use crate::pal::PlatformFacade;

/// Starts a root timer measuring the given job.
///
/// The returned counter addresses the root of a fresh timer tree; nested
/// jobs are started through it. Stop the root to finalize the tree and
/// make [`Counter::result`] available.
///
/// # Examples
///
/// ```
/// let profile = job_timer::start("Total");
/// profile.stop();
///
/// assert!(profile.is_stopped());
/// ```
#[must_use]
pub fn start(name: impl Into<String>) -> Counter {
    start_with_meta(name, Meta::new())
}

/// Starts a root timer measuring the given job, with meta information
/// attached from the beginning.
///
/// # Examples
///
/// ```
/// use job_timer::Meta;
/// use serde_json::json;
///
/// let mut meta = Meta::new();
/// meta.insert("request_id".to_string(), json!("f3a1"));
///
/// let profile = job_timer::start_with_meta("Handle request", meta);
/// profile.stop();
/// ```
#[must_use]
pub fn start_with_meta(name: impl Into<String>, meta: Meta) -> Counter {
    Counter::root(name.into(), meta, PlatformFacade::real())
}
