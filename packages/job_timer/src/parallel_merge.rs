//! Merging of parallel branch measurements.
//!
//! A stopped node may carry parallel branch counters (see
//! [`Counter::parallel`][crate::Counter::parallel]). At merge time the
//! branch placeholders themselves disappear; their stopped jobs are folded
//! into one statistics record per distinct job name. Jobs that are still
//! running at merge time, and branches that never started a job, contribute
//! nothing: callers are responsible for stopping every branch before
//! stopping the parent.

use std::rc::Rc;
use std::time::SystemTime;

use crate::node::{NodeHandle, wall_span_ms};

/// Statistics for one name-group of parallel branch jobs.
///
/// Produced at stop time for missed-time accounting and by the result
/// builder for [`ParallelGroup`][crate::ParallelGroup] snapshots; both
/// consumers share this code.
#[derive(Debug)]
pub(crate) struct GroupStats {
    pub(crate) name: String,

    /// The member jobs, in order of first appearance across branches.
    pub(crate) instances: Vec<NodeHandle>,

    /// Mean of the member totals, fractional milliseconds.
    pub(crate) average_ms: f64,

    /// Earliest member start (wall clock).
    pub(crate) start_wall: SystemTime,

    /// Latest member end (wall clock).
    pub(crate) end_wall: SystemTime,

    /// Wall-clock span of the whole group (`end − start`), not the sum of
    /// member durations.
    pub(crate) total_ms: f64,
}

/// Folds the stopped jobs of the given parallel branch placeholders into
/// one statistics record per distinct job name, in order of first
/// appearance of the name.
pub(crate) fn merge_groups(placeholders: &[NodeHandle]) -> Vec<GroupStats> {
    let mut groups: Vec<(String, Vec<NodeHandle>)> = Vec::new();

    for placeholder in placeholders {
        for job in &placeholder.borrow().children {
            if !job.borrow().is_stopped() {
                // An unstopped branch job is simply not represented.
                continue;
            }

            let name = job.borrow().name.clone();
            match groups.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, members)) => members.push(Rc::clone(job)),
                None => groups.push((name, vec![Rc::clone(job)])),
            }
        }
    }

    groups
        .into_iter()
        .map(|(name, members)| group_stats(name, members))
        .collect()
}

/// Computes the derived statistics for one non-empty group of stopped jobs.
#[expect(
    clippy::cast_precision_loss,
    reason = "parallel branch counts are far below f64 precision limits"
)]
fn group_stats(name: String, members: Vec<NodeHandle>) -> GroupStats {
    let totals_sum: f64 = members
        .iter()
        .map(|member| {
            member
                .borrow()
                .total_ms
                .expect("only stopped jobs are grouped")
        })
        .sum();
    let average_ms = totals_sum / members.len() as f64;

    let start_wall = members
        .iter()
        .map(|member| member.borrow().start_wall)
        .min()
        .expect("groups are never empty");
    let end_wall = members
        .iter()
        .map(|member| {
            member
                .borrow()
                .end_wall
                .expect("only stopped jobs are grouped")
        })
        .max()
        .expect("groups are never empty");

    GroupStats {
        name,
        instances: members,
        average_ms,
        start_wall,
        end_wall,
        total_ms: wall_span_ms(start_wall, end_wall),
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "test values are exact in f64 and compared exactly"
)]
mod tests {
    use std::cell::RefCell;
    use std::time::{Duration, Instant, UNIX_EPOCH};

    use super::*;
    use crate::Meta;
    use crate::node::TimerNode;

    /// Builds a stopped job node covering the given wall-clock interval,
    /// with a monotonic total equal to the interval length.
    fn stopped_job(name: &str, start_ms: u64, end_ms: u64) -> NodeHandle {
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

    fn running_job(name: &str) -> NodeHandle {
        Rc::new(RefCell::new(TimerNode::new(
            name.to_string(),
            Meta::new(),
            Instant::now(),
            UNIX_EPOCH,
        )))
    }

    fn placeholder_with(jobs: Vec<NodeHandle>) -> NodeHandle {
        let mut placeholder = TimerNode::new(
            "parallel".to_string(),
            Meta::new(),
            Instant::now(),
            UNIX_EPOCH,
        );
        placeholder.children = jobs;
        Rc::new(RefCell::new(placeholder))
    }

    #[test]
    fn no_placeholders_yields_no_groups() {
        assert!(merge_groups(&[]).is_empty());
    }

    #[test]
    fn same_named_jobs_merge_into_one_group() {
        let placeholders = vec![
            placeholder_with(vec![stopped_job("Step", 0, 50)]),
            placeholder_with(vec![stopped_job("Step", 10, 70)]),
            placeholder_with(vec![stopped_job("Step", 5, 40)]),
        ];

        let groups = merge_groups(&placeholders);

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.name, "Step");
        assert_eq!(group.instances.len(), 3);
        assert_eq!(group.start_wall, UNIX_EPOCH);
        assert_eq!(group.end_wall, UNIX_EPOCH + Duration::from_millis(70));
        assert_eq!(group.total_ms, 70.0);
        // (50 + 60 + 35) / 3
        assert_eq!(group.average_ms, 145.0 / 3.0);
    }

    #[test]
    fn distinct_names_group_in_first_appearance_order() {
        let placeholders = vec![
            placeholder_with(vec![stopped_job("Step", 0, 50), stopped_job("Extra", 50, 60)]),
            placeholder_with(vec![stopped_job("Step", 0, 45)]),
        ];

        let groups = merge_groups(&placeholders);

        let names: Vec<&str> = groups.iter().map(|group| group.name.as_str()).collect();
        assert_eq!(names, ["Step", "Extra"]);
        assert_eq!(groups[0].instances.len(), 2);
        assert_eq!(groups[1].instances.len(), 1);
    }

    #[test]
    fn running_jobs_are_not_represented() {
        let placeholders = vec![
            placeholder_with(vec![stopped_job("Step", 0, 50)]),
            placeholder_with(vec![running_job("Step")]),
            placeholder_with(Vec::new()),
        ];

        let groups = merge_groups(&placeholders);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].instances.len(), 1);
    }

    #[test]
    fn single_member_group_has_trivial_statistics() {
        let placeholders = vec![placeholder_with(vec![stopped_job("Step", 20, 80)])];

        let groups = merge_groups(&placeholders);

        assert_eq!(groups[0].average_ms, 60.0);
        assert_eq!(groups[0].total_ms, 60.0);
    }
}
