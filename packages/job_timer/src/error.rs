use thiserror::Error;

/// Errors that can occur when driving a [`Counter`](crate::Counter).
///
/// Every variant signals misordered instrumentation calls, not a transient
/// failure; nothing is retried or recovered internally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A parallel branch counter was requested from a counter whose job is
    /// no longer running.
    #[error("job '{name}' is not running, cannot create a parallel branch counter")]
    NoActiveJob {
        /// Name of the job the counter addresses.
        name: String,
    },

    /// A start call addressed a job that has already been stopped.
    #[error("job '{name}' is already stopped and cannot be started again")]
    AlreadyStopped {
        /// Name of the stopped job.
        name: String,
    },
}

/// A specialized `Result` type for counter operations, returning the
/// crate's [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn no_active_job_names_the_job() {
        let error = Error::NoActiveJob {
            name: "Total".to_string(),
        };

        assert!(error.to_string().contains("Total"));
    }

    #[test]
    fn already_stopped_is_error() {
        let error = Error::AlreadyStopped {
            name: "Job1".to_string(),
        };

        // Verify it is a valid Error that can be used in Result context.
        let result: Result<()> = Err(error);
        assert!(result.is_err());
    }
}
