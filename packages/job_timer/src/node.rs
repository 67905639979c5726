//! Live timer tree nodes.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::Meta;
use crate::meta::merge_meta;
use crate::parallel_merge::merge_groups;

/// Shared handle to a live timer node.
///
/// The tree is single-threaded by design, so intra-tree sharing uses
/// `Rc<RefCell<...>>`; every mutation happens synchronously inside one
/// counter call.
pub(crate) type NodeHandle = Rc<RefCell<TimerNode>>;

/// One job's live measurement record in the timer tree.
///
/// Mutable while running; frozen in practice once stopped, because every
/// mutating entry point rejects stopped nodes.
#[derive(Debug)]
pub(crate) struct TimerNode {
    pub(crate) name: String,
    pub(crate) meta: Meta,
    pub(crate) start_monotonic: Instant,
    pub(crate) start_wall: SystemTime,
    pub(crate) end_wall: Option<SystemTime>,
    pub(crate) total_ms: Option<f64>,
    pub(crate) missed_ms: Option<f64>,
    pub(crate) interrupted: bool,

    /// Nested jobs, in insertion order, addressable by name. Plain siblings
    /// never share a name: starting an existing name re-enters that child.
    pub(crate) children: Vec<NodeHandle>,

    /// Placeholder roots of parallel branch counters registered on this
    /// node. Kept separate from `children` so the interrupt cascade does
    /// not descend into branches; an unstopped branch is not represented
    /// in the results.
    pub(crate) parallel: Vec<NodeHandle>,
}

impl TimerNode {
    /// Creates a new running node with timestamps captured by the caller.
    pub(crate) fn new(
        name: String,
        meta: Meta,
        start_monotonic: Instant,
        start_wall: SystemTime,
    ) -> Self {
        Self {
            name,
            meta,
            start_monotonic,
            start_wall,
            end_wall: None,
            total_ms: None,
            missed_ms: None,
            interrupted: false,
            children: Vec::new(),
            parallel: Vec::new(),
        }
    }

    /// Whether this node has been stopped, directly or by an ancestor.
    pub(crate) fn is_stopped(&self) -> bool {
        self.end_wall.is_some()
    }

    /// Looks up a direct child by name.
    pub(crate) fn child_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.children
            .iter()
            .find(|child| child.borrow().name == name)
            .map(Rc::clone)
    }

    /// Merges meta information into this node (right-biased shallow union).
    pub(crate) fn merge_meta(&mut self, incoming: Meta) {
        merge_meta(&mut self.meta, incoming);
    }

    /// Finalizes this node at the given instants.
    ///
    /// Sets the end timestamp and computes `total` from the monotonic
    /// source. A node that is already stopped is left untouched: `total`
    /// is fixed once the end timestamp is set.
    pub(crate) fn finalize(
        &mut self,
        end_monotonic: Instant,
        end_wall: SystemTime,
        interrupted: bool,
    ) {
        if self.is_stopped() {
            return;
        }

        self.end_wall = Some(end_wall);
        self.total_ms = Some(duration_ms(self.start_monotonic, end_monotonic));
        self.interrupted = interrupted;
    }

    /// Computes `missed` time for a stopped node.
    ///
    /// `missed = total − Σ(child totals) − Σ(parallel group totals)`,
    /// computed only when children or merged groups exist. The result may
    /// be negative when the monotonic and wall clock sources disagree or
    /// when sibling jobs overlap in time; that is a valid (if noisy)
    /// measurement, not an error.
    pub(crate) fn finalize_missed(&mut self) {
        let groups = merge_groups(&self.parallel);
        if self.children.is_empty() && groups.is_empty() {
            return;
        }

        let children_total: f64 = self
            .children
            .iter()
            .map(|child| {
                child
                    .borrow()
                    .total_ms
                    .expect("children are force-stopped before missed is computed")
            })
            .sum();
        let groups_total: f64 = groups.iter().map(|group| group.total_ms).sum();

        let total = self
            .total_ms
            .expect("missed is only computed on stopped nodes");
        self.missed_ms = Some(total - children_total - groups_total);
    }
}

/// Converts a monotonic interval to fractional milliseconds.
pub(crate) fn duration_ms(start: Instant, end: Instant) -> f64 {
    ms_of(end.saturating_duration_since(start))
}

/// Converts a wall-clock timestamp to fractional milliseconds since the
/// Unix epoch. Timestamps before the epoch come out negative.
pub(crate) fn wall_ms(timestamp: SystemTime) -> f64 {
    match timestamp.duration_since(UNIX_EPOCH) {
        Ok(since) => ms_of(since),
        Err(error) => -ms_of(error.duration()),
    }
}

/// Signed wall-clock span between two timestamps, in fractional
/// milliseconds. Negative when `end` precedes `start`, which can happen
/// under wall clock adjustments and is reported as measured.
pub(crate) fn wall_span_ms(start: SystemTime, end: SystemTime) -> f64 {
    match end.duration_since(start) {
        Ok(span) => ms_of(span),
        Err(error) => -ms_of(error.duration()),
    }
}

/// Fractional milliseconds of a duration, rounded once.
#[expect(
    clippy::cast_precision_loss,
    reason = "realistic job durations stay far below f64 integer precision limits"
)]
fn ms_of(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1e6
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "test values are exact in f64 and compared exactly"
)]
mod tests {
    use super::*;

    fn running_node(name: &str) -> TimerNode {
        TimerNode::new(name.to_string(), Meta::new(), Instant::now(), UNIX_EPOCH)
    }

    #[test]
    fn new_node_is_running() {
        let node = running_node("test");

        assert!(!node.is_stopped());
        assert_eq!(node.total_ms, None);
        assert_eq!(node.missed_ms, None);
        assert!(!node.interrupted);
    }

    #[test]
    fn finalize_computes_total_from_monotonic_source() {
        let mut node = running_node("test");
        let end_monotonic = node.start_monotonic + Duration::from_millis(250);

        node.finalize(end_monotonic, UNIX_EPOCH + Duration::from_secs(1), false);

        assert!(node.is_stopped());
        assert_eq!(node.total_ms, Some(250.0));
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut node = running_node("test");
        let first_end = node.start_monotonic + Duration::from_millis(100);
        let second_end = node.start_monotonic + Duration::from_millis(500);

        node.finalize(first_end, UNIX_EPOCH, false);
        node.finalize(second_end, UNIX_EPOCH + Duration::from_secs(9), true);

        // Total and end are fixed once set; the second call changes nothing.
        assert_eq!(node.total_ms, Some(100.0));
        assert_eq!(node.end_wall, Some(UNIX_EPOCH));
        assert!(!node.interrupted);
    }

    #[test]
    fn missed_is_none_without_children() {
        let mut node = running_node("test");
        node.finalize(node.start_monotonic + Duration::from_millis(100), UNIX_EPOCH, false);

        node.finalize_missed();

        assert_eq!(node.missed_ms, None);
    }

    #[test]
    fn missed_subtracts_child_totals() {
        let mut parent = running_node("parent");
        let mut child = running_node("child");

        child.finalize(child.start_monotonic + Duration::from_millis(80), UNIX_EPOCH, false);
        parent
            .children
            .push(Rc::new(RefCell::new(child)));
        parent.finalize(
            parent.start_monotonic + Duration::from_millis(200),
            UNIX_EPOCH,
            false,
        );

        parent.finalize_missed();

        assert_eq!(parent.missed_ms, Some(120.0));
    }

    #[test]
    fn missed_can_be_negative_for_overlapping_children() {
        let mut parent = running_node("parent");

        // Two logically-parallel siblings that each span the parent's whole
        // interval sum to more than the parent's own total.
        for name in ["a", "b"] {
            let mut child = running_node(name);
            child.start_monotonic = parent.start_monotonic;
            child.finalize(
                parent.start_monotonic + Duration::from_millis(100),
                UNIX_EPOCH,
                false,
            );
            parent.children.push(Rc::new(RefCell::new(child)));
        }
        parent.finalize(
            parent.start_monotonic + Duration::from_millis(100),
            UNIX_EPOCH,
            false,
        );

        parent.finalize_missed();

        assert_eq!(parent.missed_ms, Some(-100.0));
    }

    #[test]
    fn child_by_name_finds_children_in_any_position() {
        let mut parent = running_node("parent");
        for name in ["first", "second"] {
            parent
                .children
                .push(Rc::new(RefCell::new(running_node(name))));
        }

        assert!(parent.child_by_name("second").is_some());
        assert!(parent.child_by_name("missing").is_none());
    }

    #[test]
    fn wall_ms_of_epoch_is_zero() {
        assert_eq!(wall_ms(UNIX_EPOCH), 0.0);
        assert_eq!(wall_ms(UNIX_EPOCH + Duration::from_millis(1500)), 1500.0);
    }

    #[test]
    fn wall_span_ms_is_signed() {
        let earlier = UNIX_EPOCH + Duration::from_millis(100);
        let later = UNIX_EPOCH + Duration::from_millis(350);

        assert_eq!(wall_span_ms(earlier, later), 250.0);
        assert_eq!(wall_span_ms(later, earlier), -250.0);
    }
}
