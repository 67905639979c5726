//! The counter state machine driving a timer tree.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Instant, SystemTime};

use crate::Meta;
use crate::error::{Error, Result};
use crate::node::{NodeHandle, TimerNode};
use crate::pal::{Platform, PlatformFacade};
use crate::report::{Snapshot, build_snapshot};

/// Internal job name under which parallel branch counters are rooted.
///
/// The placeholder keeps a branch counter's nested jobs out of the
/// parent's own child list; it never appears in snapshots because merging
/// only inspects the placeholder's children.
const PARALLEL_PLACEHOLDER: &str = "parallel";

/// Handle addressing one job in a live timer tree.
///
/// A counter is created for the root job via [`start`][crate::start] and
/// for nested jobs via [`Counter::start`]. Jobs are addressed by
/// slash-separated paths resolved from the counter's own job, so
/// independent subtrees (including parallel branches) each carry their own
/// addressing state and never interfere.
///
/// Counters are cheap handles: cloning one yields another handle to the
/// same job. The tree is single-threaded by design (see the crate docs),
/// so counters are deliberately neither `Send` nor `Sync`.
///
/// # Examples
///
/// ```
/// let profile = job_timer::start("Total");
/// let job = profile.start("Job1")?;
/// job.stop();
/// profile.stop();
///
/// let result = profile.result().expect("stopped counters always have a result");
/// assert_eq!(result.children().len(), 1);
/// # Ok::<(), job_timer::Error>(())
/// ```
///
/// Jobs can equally be driven purely by path from the root counter:
///
/// ```
/// let profile = job_timer::start("Total");
/// profile.start("Job2/Subjob")?;
/// profile.stop_path("Job2/Subjob");
/// profile.stop_path("Job2");
/// profile.stop();
/// # Ok::<(), job_timer::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Counter {
    node: NodeHandle,
    platform: PlatformFacade,
}

impl Counter {
    /// Creates a counter owning a fresh root job.
    pub(crate) fn root(name: String, meta: Meta, platform: PlatformFacade) -> Self {
        let node = TimerNode::new(name, meta, platform.monotonic(), platform.wall_clock());

        Self {
            node: Rc::new(RefCell::new(node)),
            platform,
        }
    }

    /// Wraps an existing node in a new handle.
    fn handle(&self, node: NodeHandle) -> Self {
        Self {
            node,
            platform: self.platform.clone(),
        }
    }

    /// Starts (or re-enters) the job addressed by the given path.
    ///
    /// The path is resolved segment by segment from this counter's own
    /// job, creating intermediate jobs as needed; empty segments are
    /// ignored. Timestamps are captured only when a job is created:
    /// addressing a running job of the same name is an idempotent
    /// re-entry, not a new instance. Returns a counter addressing the
    /// deepest job, which can be stopped directly or used for further
    /// nesting.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStopped`] if this counter's job, or any existing
    /// job the path resolves through or onto, has already been stopped.
    ///
    /// # Examples
    ///
    /// ```
    /// let profile = job_timer::start("Total");
    /// let subjob = profile.start("Job1/Subjob")?;
    ///
    /// // Re-entering a running job addresses the same instance.
    /// let job1 = profile.start("Job1")?;
    ///
    /// subjob.stop();
    /// job1.stop();
    /// profile.stop();
    /// # Ok::<(), job_timer::Error>(())
    /// ```
    pub fn start(&self, path: &str) -> Result<Self> {
        self.start_with_meta(path, Meta::new())
    }

    /// Starts (or re-enters) the job addressed by the given path, merging
    /// meta information into it.
    ///
    /// Meta is merged into the deepest job only, as a right-biased shallow
    /// union: existing keys are replaced, new keys are added, no keys are
    /// removed.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStopped`] under the same conditions as
    /// [`Counter::start`].
    pub fn start_with_meta(&self, path: &str, meta: Meta) -> Result<Self> {
        if self.node.borrow().is_stopped() {
            return Err(Error::AlreadyStopped { name: self.name() });
        }

        let mut current = Rc::clone(&self.node);
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let existing = current.borrow().child_by_name(segment);
            current = match existing {
                Some(child) => {
                    if child.borrow().is_stopped() {
                        return Err(Error::AlreadyStopped {
                            name: segment.to_string(),
                        });
                    }
                    child
                }
                None => {
                    let child = Rc::new(RefCell::new(TimerNode::new(
                        segment.to_string(),
                        Meta::new(),
                        self.platform.monotonic(),
                        self.platform.wall_clock(),
                    )));
                    current.borrow_mut().children.push(Rc::clone(&child));
                    child
                }
            };
        }

        current.borrow_mut().merge_meta(meta);
        Ok(self.handle(current))
    }

    /// Stops the job this counter addresses.
    ///
    /// Before the job is finalized, every still-running descendant is
    /// force-stopped at the same instant and marked interrupted; their
    /// accumulated meta and start timestamps are left intact. Stopping an
    /// already-stopped job is a no-op.
    pub fn stop(&self) {
        self.stop_with_meta(Meta::new());
    }

    /// Stops the job this counter addresses, merging meta information into
    /// it first.
    ///
    /// Meta is merged only into this job, never into force-stopped
    /// descendants. If the job is already stopped the call is a no-op and
    /// the meta is discarded.
    pub fn stop_with_meta(&self, meta: Meta) {
        if self.node.borrow().is_stopped() {
            return;
        }

        let end_monotonic = self.platform.monotonic();
        let end_wall = self.platform.wall_clock();

        {
            let mut node = self.node.borrow_mut();
            node.merge_meta(meta);
            node.finalize(end_monotonic, end_wall, false);
        }

        interrupt_running_descendants(&self.node, end_monotonic, end_wall);
        self.node.borrow_mut().finalize_missed();
    }

    /// Stops the descendant job addressed by the given path.
    ///
    /// A path that does not resolve to an existing job is a silent no-op:
    /// instrumentation code may call stop on a conditionally-created timer
    /// without guarding. An empty path stops this counter's own job.
    pub fn stop_path(&self, path: &str) {
        self.stop_path_with_meta(path, Meta::new());
    }

    /// Stops the descendant job addressed by the given path, merging meta
    /// information into it first.
    ///
    /// Tolerant like [`Counter::stop_path`]; meta is discarded when the
    /// path does not resolve.
    pub fn stop_path_with_meta(&self, path: &str, meta: Meta) {
        let mut current = Rc::clone(&self.node);
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let next = current.borrow().child_by_name(segment);
            match next {
                Some(child) => current = child,
                None => return,
            }
        }

        self.handle(current).stop_with_meta(meta);
    }

    /// Spawns a detached counter measuring one parallel branch of this job.
    ///
    /// The branch counter is rooted at an internal placeholder, so its
    /// nested jobs never interfere with this counter's addressing. At this
    /// job's stop time, same-named jobs across all branch counters are
    /// merged into one [`ParallelGroup`][crate::ParallelGroup] per name.
    /// Branches that are still running at that point are not represented:
    /// stop every branch before stopping the parent.
    ///
    /// # Errors
    ///
    /// [`Error::NoActiveJob`] if this counter's job is no longer running.
    ///
    /// # Examples
    ///
    /// ```
    /// let profile = job_timer::start("Total");
    ///
    /// for _ in 0..3 {
    ///     let branch = profile.parallel()?;
    ///     branch.start("Step")?.stop();
    /// }
    ///
    /// profile.stop();
    /// let result = profile.result().expect("stopped counters always have a result");
    /// assert_eq!(result.children().len(), 1); // one merged "Step" group
    /// # Ok::<(), job_timer::Error>(())
    /// ```
    pub fn parallel(&self) -> Result<Self> {
        if self.node.borrow().is_stopped() {
            return Err(Error::NoActiveJob { name: self.name() });
        }

        let placeholder = Rc::new(RefCell::new(TimerNode::new(
            PARALLEL_PLACEHOLDER.to_string(),
            Meta::new(),
            self.platform.monotonic(),
            self.platform.wall_clock(),
        )));
        self.node.borrow_mut().parallel.push(Rc::clone(&placeholder));

        Ok(self.handle(placeholder))
    }

    /// Whether the job this counter addresses has been stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.node.borrow().is_stopped()
    }

    /// The immutable timing snapshot rooted at this counter's job.
    ///
    /// `None` while the job is running. Once stopped, the subtree is
    /// frozen, so repeated calls return equal snapshots.
    #[must_use]
    pub fn result(&self) -> Option<Snapshot> {
        if self.node.borrow().is_stopped() {
            Some(build_snapshot(&self.node))
        } else {
            None
        }
    }

    /// Name of the job this counter addresses.
    #[must_use]
    pub fn name(&self) -> String {
        self.node.borrow().name.clone()
    }
}

/// Force-stops every still-running descendant in the child tree, marking
/// each as interrupted and backfilling its end time and total at the given
/// instants.
///
/// A descendant that is already stopped is skipped along with its subtree:
/// its own stop call has already cascaded below it. Parallel branch
/// placeholders are deliberately not visited; an unstopped branch is not
/// represented in the results rather than force-stopped into them.
fn interrupt_running_descendants(
    node: &NodeHandle,
    end_monotonic: Instant,
    end_wall: SystemTime,
) {
    let children: Vec<NodeHandle> = node.borrow().children.iter().map(Rc::clone).collect();

    for child in children {
        if child.borrow().is_stopped() {
            continue;
        }

        child.borrow_mut().finalize(end_monotonic, end_wall, true);
        interrupt_running_descendants(&child, end_monotonic, end_wall);
        child.borrow_mut().finalize_missed();
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "fake-clock driven values are exact in f64 and compared exactly"
)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::pal::FakePlatform;
    use crate::{Snapshot, SnapshotChild};

    fn start_test_counter(name: &str) -> (Counter, FakePlatform) {
        let fake = FakePlatform::new();
        let counter = Counter::root(
            name.to_string(),
            Meta::new(),
            PlatformFacade::fake(fake.clone()),
        );
        (counter, fake)
    }

    fn meta_of(pairs: &[(&str, serde_json::Value)]) -> Meta {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    fn child_job<'s>(snapshot: &'s Snapshot, name: &str) -> &'s Snapshot {
        snapshot
            .children()
            .iter()
            .find_map(|child| match child {
                SnapshotChild::Job(job) if job.name() == name => Some(job),
                _ => None,
            })
            .unwrap_or_else(|| panic!("expected child job '{name}'"))
    }

    #[test]
    fn measures_elapsed_time_between_start_and_stop() {
        let (counter, fake) = start_test_counter("Total");

        fake.advance(Duration::from_millis(100));
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.total(), 100.0);
        assert_eq!(result.start(), 0.0);
        assert_eq!(result.end(), 100.0);
        assert_eq!(result.missed(), None);
        assert!(!result.interrupted());
    }

    #[test]
    fn nested_jobs_accumulate_missed_time() {
        let (counter, fake) = start_test_counter("Total");

        fake.advance(Duration::from_millis(100));
        let job = counter.start("Job1").expect("counter is running");
        fake.advance(Duration::from_millis(100));
        job.stop();
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.total(), 200.0);
        assert_eq!(result.missed(), Some(100.0));
        assert_eq!(child_job(&result, "Job1").total(), 100.0);
    }

    #[test]
    fn path_start_creates_intermediate_jobs() {
        let (counter, fake) = start_test_counter("Total");

        counter.start("Job2/Subjob").expect("counter is running");
        fake.advance(Duration::from_millis(50));
        counter.stop_path("Job2/Subjob");
        counter.stop_path("Job2");
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        let job2 = child_job(&result, "Job2");
        assert_eq!(job2.total(), 50.0);
        assert_eq!(child_job(job2, "Subjob").total(), 50.0);
    }

    #[test]
    fn empty_path_segments_are_ignored() {
        let (counter, _fake) = start_test_counter("Total");

        counter.start("Job1//Subjob").expect("counter is running");
        counter.stop_path("Job1/Subjob/");
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        let job1 = child_job(&result, "Job1");
        assert!(!child_job(job1, "Subjob").interrupted());
    }

    #[test]
    fn reentrant_start_addresses_the_same_job() {
        let (counter, fake) = start_test_counter("Total");

        counter.start("Job1").expect("counter is running");
        fake.advance(Duration::from_millis(40));
        // Re-entry does not create a second instance and does not reset
        // the start timestamps.
        let reentered = counter.start("Job1").expect("counter is running");
        fake.advance(Duration::from_millis(60));
        reentered.stop();
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.children().len(), 1);
        assert_eq!(child_job(&result, "Job1").total(), 100.0);
    }

    #[test]
    fn meta_merge_is_right_biased_shallow_union() {
        let (counter, _fake) = start_test_counter("Total");

        let job = counter
            .start_with_meta("Job1", meta_of(&[("a", json!(1)), ("b", json!(1))]))
            .expect("counter is running");
        job.stop_with_meta(meta_of(&[("b", json!(2)), ("c", json!(3))]));
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        let meta = child_job(&result, "Job1").meta().clone();
        assert_eq!(
            meta,
            meta_of(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))])
        );
    }

    #[test]
    fn meta_merges_on_reentry() {
        let (counter, _fake) = start_test_counter("Total");

        counter
            .start_with_meta("Job1", meta_of(&[("first", json!(true))]))
            .expect("counter is running");
        counter
            .start_with_meta("Job1", meta_of(&[("second", json!(true))]))
            .expect("counter is running");
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        let meta = child_job(&result, "Job1").meta().clone();
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn stop_is_idempotent() {
        let (counter, fake) = start_test_counter("Total");

        fake.advance(Duration::from_millis(100));
        counter.stop();
        let first = counter.result().expect("counter is stopped");

        fake.advance(Duration::from_millis(100));
        counter.stop_with_meta(meta_of(&[("late", json!(true))]));
        let second = counter.result().expect("counter is stopped");

        // The second stop is a no-op: same snapshot, late meta discarded.
        assert_eq!(first, second);
    }

    #[test]
    fn stop_path_on_missing_job_is_a_silent_no_op() {
        let (counter, _fake) = start_test_counter("Total");

        counter.stop_path("Job1/DoesNotExist");

        assert!(!counter.is_stopped());
    }

    #[test]
    fn result_is_none_while_running() {
        let (counter, _fake) = start_test_counter("Total");

        assert!(counter.result().is_none());
        assert!(!counter.is_stopped());
    }

    #[test]
    fn repeated_results_are_equal() {
        let (counter, fake) = start_test_counter("Total");
        counter.start("Job1").expect("counter is running");
        fake.advance(Duration::from_millis(10));
        counter.stop();

        assert_eq!(counter.result(), counter.result());
    }

    #[test]
    fn stopping_interrupts_running_descendants() {
        let (counter, fake) = start_test_counter("Total");

        counter.start("Job1").expect("counter is running");
        counter.start("Job2/Subjob").expect("counter is running");
        fake.advance(Duration::from_millis(100));
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        for name in ["Job1", "Job2"] {
            let child = child_job(&result, name);
            assert!(child.interrupted(), "expected '{name}' to be interrupted");
            assert_eq!(child.end(), result.end());
            assert_eq!(child.total(), 100.0);
        }
        let subjob = child_job(child_job(&result, "Job2"), "Subjob");
        assert!(subjob.interrupted());
        assert_eq!(subjob.end(), result.end());
    }

    #[test]
    fn interruption_preserves_descendant_meta() {
        let (counter, fake) = start_test_counter("Total");

        counter
            .start_with_meta("Job1", meta_of(&[("own", json!("kept"))]))
            .expect("counter is running");
        fake.advance(Duration::from_millis(10));
        counter.stop_with_meta(meta_of(&[("ancestor", json!("not inherited"))]));

        let result = counter.result().expect("counter is stopped");
        let job1 = child_job(&result, "Job1");
        assert_eq!(job1.meta().get("own"), Some(&json!("kept")));
        assert_eq!(job1.meta().get("ancestor"), None);
    }

    #[test]
    fn explicitly_stopped_jobs_are_not_marked_interrupted() {
        let (counter, fake) = start_test_counter("Total");

        let job = counter.start("Job1").expect("counter is running");
        fake.advance(Duration::from_millis(30));
        job.stop();
        fake.advance(Duration::from_millis(20));
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        let job1 = child_job(&result, "Job1");
        assert!(!job1.interrupted());
        // The earlier end timestamp is untouched by the ancestor's stop.
        assert_eq!(job1.end(), 30.0);
        assert_eq!(job1.total(), 30.0);
    }

    #[test]
    fn interrupted_jobs_get_missed_time_from_their_own_children() {
        let (counter, fake) = start_test_counter("Total");

        counter.start("Job1/Subjob").expect("counter is running");
        fake.advance(Duration::from_millis(25));
        counter.stop_path("Job1/Subjob");
        fake.advance(Duration::from_millis(75));
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        let job1 = child_job(&result, "Job1");
        assert!(job1.interrupted());
        // 100 ms interrupted total minus the 25 ms explicitly-stopped child.
        assert_eq!(job1.missed(), Some(75.0));
    }

    #[test]
    fn overlapping_siblings_can_drive_missed_negative() {
        let (counter, fake) = start_test_counter("Total");

        counter.start("Job1").expect("counter is running");
        counter.start("Job2").expect("counter is running");
        fake.advance(Duration::from_millis(100));
        counter.stop_path("Job1");
        counter.stop_path("Job2");
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        // Both siblings span the whole interval, so their sum exceeds the
        // parent's own total. This is a valid, if noisy, measurement.
        assert_eq!(result.missed(), Some(-100.0));
    }

    #[test]
    fn start_on_stopped_counter_is_rejected() {
        let (counter, _fake) = start_test_counter("Total");
        counter.stop();

        let error = counter.start("Job1").expect_err("counter is stopped");
        assert!(matches!(error, Error::AlreadyStopped { .. }));
    }

    #[test]
    fn start_through_stopped_child_is_rejected() {
        let (counter, _fake) = start_test_counter("Total");

        counter.start("Job1").expect("counter is running");
        counter.stop_path("Job1");

        let error = counter
            .start("Job1/Subjob")
            .expect_err("path resolves onto a stopped job");
        assert!(matches!(error, Error::AlreadyStopped { name } if name == "Job1"));
    }

    #[test]
    fn parallel_on_stopped_counter_is_rejected() {
        let (counter, _fake) = start_test_counter("Total");
        counter.stop();

        let error = counter.parallel().expect_err("counter is stopped");
        assert!(matches!(error, Error::NoActiveJob { .. }));
    }

    #[test]
    fn parallel_branches_merge_into_groups() {
        let (counter, fake) = start_test_counter("Total");

        let mut branches = Vec::new();
        for _ in 0..3 {
            let branch = counter.parallel().expect("counter is running");
            branch.start("Step").expect("branch is running");
            branches.push(branch);
        }
        fake.advance(Duration::from_millis(50));
        for branch in &branches {
            branch.stop_path("Step");
        }
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.children().len(), 1);
        let group = match &result.children()[0] {
            SnapshotChild::Group(group) => group,
            SnapshotChild::Job(_) => panic!("expected a merged group"),
        };
        assert_eq!(group.name(), "Step");
        assert_eq!(group.instances().len(), 3);
        assert_eq!(group.average(), 50.0);
        assert_eq!(group.start(), 0.0);
        assert_eq!(group.end(), 50.0);
        assert_eq!(group.total(), 50.0);
    }

    #[test]
    fn distinct_branch_jobs_form_distinct_groups() {
        let (counter, fake) = start_test_counter("Total");

        let mut branches = Vec::new();
        for index in 0..10 {
            let branch = counter.parallel().expect("counter is running");
            branch.start("Step").expect("branch is running");
            branches.push((index, branch));
        }
        fake.advance(Duration::from_millis(50));
        for (_, branch) in &branches {
            branch.stop_path("Step");
        }
        // Half the branches run an extra job afterwards.
        for (index, branch) in &branches {
            if index % 2 == 0 {
                branch.start("Extra").expect("branch is running");
            }
        }
        fake.advance(Duration::from_millis(10));
        for (index, branch) in &branches {
            if index % 2 == 0 {
                branch.stop_path("Extra");
            }
        }
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.children().len(), 2);

        let names: Vec<&str> = result
            .children()
            .iter()
            .map(SnapshotChild::name)
            .collect();
        assert_eq!(names, ["Step", "Extra"]);

        let extra = match &result.children()[1] {
            SnapshotChild::Group(group) => group,
            SnapshotChild::Job(_) => panic!("expected a merged group"),
        };
        assert_eq!(extra.instances().len(), 5);
        assert_eq!(extra.average(), 10.0);
    }

    #[test]
    fn unstopped_branches_are_not_represented() {
        let (counter, fake) = start_test_counter("Total");

        let stopped_branch = counter.parallel().expect("counter is running");
        stopped_branch.start("Step").expect("branch is running");

        let running_branch = counter.parallel().expect("counter is running");
        running_branch.start("Step").expect("branch is running");

        let idle_branch = counter.parallel().expect("counter is running");

        fake.advance(Duration::from_millis(50));
        stopped_branch.stop_path("Step");
        counter.stop();
        drop((running_branch, idle_branch));

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.children().len(), 1);
        let group = match &result.children()[0] {
            SnapshotChild::Group(group) => group,
            SnapshotChild::Job(_) => panic!("expected a merged group"),
        };
        assert_eq!(group.instances().len(), 1);
        assert!(!group.instances()[0].interrupted());
    }

    #[test]
    fn group_totals_feed_missed_time() {
        let (counter, fake) = start_test_counter("Total");

        let branch = counter.parallel().expect("counter is running");
        branch.start("Step").expect("branch is running");
        fake.advance(Duration::from_millis(40));
        branch.stop_path("Step");
        fake.advance(Duration::from_millis(60));
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.total(), 100.0);
        assert_eq!(result.missed(), Some(60.0));
    }

    #[test]
    fn wall_clock_skew_can_drive_missed_negative() {
        let (counter, fake) = start_test_counter("Total");

        let branch = counter.parallel().expect("counter is running");
        branch.start("Step").expect("branch is running");
        // The wall clock jumps ahead of the monotonic clock mid-branch, so
        // the group's wall-clock span exceeds the parent's monotonic total.
        fake.advance(Duration::from_millis(50));
        fake.advance_wall(Duration::from_millis(200));
        branch.stop_path("Step");
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        assert_eq!(result.total(), 50.0);
        assert_eq!(result.missed(), Some(50.0 - 250.0));
    }

    #[test]
    fn branch_placeholder_name_never_surfaces() {
        let (counter, fake) = start_test_counter("Total");

        let branch = counter.parallel().expect("counter is running");
        branch.start("Step").expect("branch is running");
        fake.advance(Duration::from_millis(10));
        branch.stop_path("Step");
        counter.stop();

        let result = counter.result().expect("counter is stopped");
        let names: Vec<&str> = result
            .children()
            .iter()
            .map(SnapshotChild::name)
            .collect();
        assert_eq!(names, ["Step"]);
    }

    #[test]
    fn clones_address_the_same_job() {
        let (counter, _fake) = start_test_counter("Total");
        let clone = counter.clone();

        clone.stop();

        assert!(counter.is_stopped());
    }

    // Counters hold `Rc` internals: single-threaded by design.
    static_assertions::assert_not_impl_any!(Counter: Send, Sync);
}
