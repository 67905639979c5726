//! Immutable snapshots of stopped timer trees.

use std::fmt;

use serde::Serialize;

use crate::Meta;
use crate::node::{NodeHandle, wall_ms};
use crate::parallel_merge::{GroupStats, merge_groups};

/// Immutable snapshot of one stopped job and its subtree.
///
/// A snapshot is a deep copy of the live timer tree taken once the job is
/// stopped: it shares no state with the counter that produced it and is
/// safe to retain, send to other threads, serialize or print after the
/// live counter is discarded.
///
/// All durations are fractional milliseconds. `start` and `end` are
/// wall-clock milliseconds since the Unix epoch; `total` is derived from
/// the monotonic clock source and is therefore immune to wall clock
/// adjustments.
///
/// # Examples
///
/// ```
/// let profile = job_timer::start("Total");
/// profile.stop();
///
/// let result = profile.result().expect("stopped counters always have a result");
/// assert_eq!(result.name(), "Total");
/// assert!(result.total() >= 0.0);
/// assert_eq!(result.missed(), None); // no children
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    name: String,
    meta: Meta,
    start: f64,
    end: f64,
    total: f64,
    missed: Option<f64>,
    interrupted: bool,
    children: Vec<SnapshotChild>,
}

/// One child entry of a [`Snapshot`]: a plain nested job or a merged group
/// of parallel branches.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotChild {
    /// A plain nested job measurement.
    Job(Snapshot),

    /// A merged group of same-named jobs measured across parallel branches.
    Group(ParallelGroup),
}

/// Merged statistics for same-named jobs measured across parallel branches.
///
/// `total` is the wall-clock span of the whole group (earliest start to
/// latest end), not the sum of member durations: ten branches that each
/// take 50 ms while overlapping completely yield a group total of about
/// 50 ms, with `average` also about 50 ms.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParallelGroup {
    name: String,
    instances: Vec<Snapshot>,
    average: f64,
    start: f64,
    end: f64,
    total: f64,
}

impl Snapshot {
    /// Name of the job this snapshot measures.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Meta information accumulated on the job.
    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Wall-clock start timestamp, milliseconds since the Unix epoch.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Wall-clock end timestamp, milliseconds since the Unix epoch.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Duration of the job in fractional milliseconds, measured on the
    /// monotonic clock source.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Time attributable to this job's own work, outside any child's
    /// measured interval: `total − Σ(child totals)`.
    ///
    /// `None` when the job has no children. May be negative when sibling
    /// jobs overlap in time or the clock sources disagree; that is a valid
    /// (if noisy) measurement, not an error.
    #[must_use]
    pub fn missed(&self) -> Option<f64> {
        self.missed
    }

    /// Whether the job was force-stopped because an ancestor was stopped
    /// before the job itself.
    #[must_use]
    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// Child measurements in insertion order, with one merged
    /// [`ParallelGroup`] per distinct parallel job name appended after the
    /// plain children.
    #[must_use]
    pub fn children(&self) -> &[SnapshotChild] {
        &self.children
    }

    /// Prints the timing tree to stdout.
    ///
    /// This is a convenience method equivalent to printing the `Display`
    /// rendering of the snapshot.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        print!("{self}");
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(
            f,
            "{:indent$}{}: {:.3} ms",
            "",
            self.name,
            self.total,
            indent = depth.saturating_mul(2)
        )?;
        if let Some(missed) = self.missed {
            write!(f, " (missed {missed:.3} ms)")?;
        }
        if self.interrupted {
            write!(f, " [interrupted]")?;
        }
        writeln!(f)?;

        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl SnapshotChild {
    /// Name of the nested job or merged group.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Job(snapshot) => snapshot.name(),
            Self::Group(group) => group.name(),
        }
    }

    /// Duration in fractional milliseconds: the job's `total` or the
    /// group's wall-clock span.
    #[must_use]
    pub fn total(&self) -> f64 {
        match self {
            Self::Job(snapshot) => snapshot.total(),
            Self::Group(group) => group.total(),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            Self::Job(snapshot) => snapshot.fmt_indented(f, depth),
            Self::Group(group) => group.fmt_indented(f, depth),
        }
    }
}

impl ParallelGroup {
    /// Shared name of the merged branch jobs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshots of the member jobs, in order of first appearance across
    /// branches.
    #[must_use]
    pub fn instances(&self) -> &[Snapshot] {
        &self.instances
    }

    /// Mean of the member totals, fractional milliseconds.
    #[must_use]
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Earliest member start, wall-clock milliseconds since the Unix epoch.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Latest member end, wall-clock milliseconds since the Unix epoch.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Wall-clock span of the whole group (`end − start`), fractional
    /// milliseconds.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} ({} parallel): span {:.3} ms, average {:.3} ms",
            "",
            self.name,
            self.instances.len(),
            self.total,
            self.average,
            indent = depth.saturating_mul(2)
        )?;

        for instance in &self.instances {
            instance.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Display for SnapshotChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Display for ParallelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Builds the immutable snapshot of a stopped node's subtree.
///
/// Every field is copied by value and every child transformed recursively;
/// the live tree is never mutated. Parallel branch placeholders are folded
/// into one [`ParallelGroup`] per distinct job name, appended after the
/// plain children in order of first appearance.
pub(crate) fn build_snapshot(node: &NodeHandle) -> Snapshot {
    let node = node.borrow();

    let mut children: Vec<SnapshotChild> = node
        .children
        .iter()
        .map(|child| SnapshotChild::Job(build_snapshot(child)))
        .collect();
    for stats in merge_groups(&node.parallel) {
        children.push(SnapshotChild::Group(group_snapshot(stats)));
    }

    Snapshot {
        name: node.name.clone(),
        meta: node.meta.clone(),
        start: wall_ms(node.start_wall),
        end: wall_ms(
            node.end_wall
                .expect("snapshots are only built from stopped nodes"),
        ),
        total: node
            .total_ms
            .expect("snapshots are only built from stopped nodes"),
        missed: node.missed_ms,
        interrupted: node.interrupted,
        children,
    }
}

/// Builds the snapshot form of one merged parallel group.
fn group_snapshot(stats: GroupStats) -> ParallelGroup {
    ParallelGroup {
        name: stats.name,
        instances: stats.instances.iter().map(build_snapshot).collect(),
        average: stats.average_ms,
        start: wall_ms(stats.start_wall),
        end: wall_ms(stats.end_wall),
        total: stats.total_ms,
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "test values are exact in f64 and compared exactly"
)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{Duration, Instant, UNIX_EPOCH};

    use serde_json::json;

    use super::*;
    use crate::node::TimerNode;

    fn stopped_node(name: &str, start_ms: u64, end_ms: u64) -> NodeHandle {
        let start_monotonic = Instant::now();
        let mut node = TimerNode::new(
            name.to_string(),
            Meta::new(),
            start_monotonic,
            UNIX_EPOCH + Duration::from_millis(start_ms),
        );
        node.finalize(
            start_monotonic + Duration::from_millis(end_ms - start_ms),
            UNIX_EPOCH + Duration::from_millis(end_ms),
            false,
        );
        Rc::new(RefCell::new(node))
    }

    #[test]
    fn copies_fields_by_value() {
        let node = stopped_node("job", 100, 350);
        node.borrow_mut()
            .meta
            .insert("count".to_string(), json!(7));

        let snapshot = build_snapshot(&node);

        assert_eq!(snapshot.name(), "job");
        assert_eq!(snapshot.start(), 100.0);
        assert_eq!(snapshot.end(), 350.0);
        assert_eq!(snapshot.total(), 250.0);
        assert_eq!(snapshot.missed(), None);
        assert!(!snapshot.interrupted());
        assert_eq!(snapshot.meta().get("count"), Some(&json!(7)));
        assert!(snapshot.children().is_empty());
    }

    #[test]
    fn transforms_children_recursively() {
        let parent = stopped_node("parent", 0, 100);
        let child = stopped_node("child", 10, 40);
        let grandchild = stopped_node("grandchild", 15, 25);
        child.borrow_mut().children.push(grandchild);
        parent.borrow_mut().children.push(child);

        let snapshot = build_snapshot(&parent);

        assert_eq!(snapshot.children().len(), 1);
        let child = match &snapshot.children()[0] {
            SnapshotChild::Job(child) => child,
            SnapshotChild::Group(_) => panic!("expected a plain child"),
        };
        assert_eq!(child.name(), "child");
        assert_eq!(child.children().len(), 1);
    }

    #[test]
    fn appends_parallel_groups_after_plain_children() {
        let parent = stopped_node("parent", 0, 100);
        parent.borrow_mut().children.push(stopped_node("plain", 0, 10));

        let placeholder = stopped_node("parallel", 0, 60);
        placeholder
            .borrow_mut()
            .children
            .push(stopped_node("Step", 0, 50));
        parent.borrow_mut().parallel.push(placeholder);

        let snapshot = build_snapshot(&parent);

        let names: Vec<&str> = snapshot
            .children()
            .iter()
            .map(SnapshotChild::name)
            .collect();
        assert_eq!(names, ["plain", "Step"]);
        assert!(matches!(snapshot.children()[1], SnapshotChild::Group(_)));
    }

    #[test]
    fn serializes_with_contract_field_names() {
        let node = stopped_node("job", 0, 100);

        let value = serde_json::to_value(build_snapshot(&node)).expect("snapshots are serializable");

        let object = value.as_object().expect("snapshot serializes to an object");
        for key in [
            "name",
            "meta",
            "start",
            "end",
            "total",
            "missed",
            "interrupted",
            "children",
        ] {
            assert!(object.contains_key(key), "missing contract field '{key}'");
        }
        assert_eq!(object.get("missed"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn serializes_groups_with_contract_field_names() {
        let parent = stopped_node("parent", 0, 100);
        let placeholder = stopped_node("parallel", 0, 60);
        placeholder
            .borrow_mut()
            .children
            .push(stopped_node("Step", 0, 50));
        parent.borrow_mut().parallel.push(placeholder);

        let value = serde_json::to_value(build_snapshot(&parent)).expect("snapshots are serializable");

        let group = value
            .get("children")
            .and_then(|children| children.get(0))
            .and_then(serde_json::Value::as_object)
            .expect("group serializes to an object");
        for key in ["name", "instances", "average", "start", "end", "total"] {
            assert!(group.contains_key(key), "missing contract field '{key}'");
        }
    }

    #[test]
    fn display_renders_indented_tree() {
        let parent = stopped_node("parent", 0, 100);
        parent.borrow_mut().children.push(stopped_node("child", 0, 30));
        parent.borrow_mut().finalize_missed();

        let rendered = build_snapshot(&parent).to_string();

        assert!(rendered.contains("parent: 100.000 ms"));
        assert!(rendered.contains("(missed 70.000 ms)"));
        assert!(rendered.contains("  child: 30.000 ms"));
    }

    #[test]
    fn display_marks_interrupted_nodes() {
        let start_monotonic = Instant::now();
        let mut node = TimerNode::new(
            "job".to_string(),
            Meta::new(),
            start_monotonic,
            UNIX_EPOCH,
        );
        node.finalize(
            start_monotonic + Duration::from_millis(10),
            UNIX_EPOCH + Duration::from_millis(10),
            true,
        );

        let rendered = build_snapshot(&Rc::new(RefCell::new(node))).to_string();

        assert!(rendered.contains("[interrupted]"));
    }

    // Snapshots are plain values, safe to hand to other threads.
    static_assertions::assert_impl_all!(Snapshot: Send, Sync);
    static_assertions::assert_impl_all!(SnapshotChild: Send, Sync);
    static_assertions::assert_impl_all!(ParallelGroup: Send, Sync);
}
