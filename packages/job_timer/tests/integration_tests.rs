//! Integration tests for `job_timer` against the real clock.
//!
//! These tests drive real wall-clock delays with `thread::sleep`, so they
//! assert generous bounds: sleeps can overshoot but never undershoot, and
//! durations are measured on the monotonic clock.

use std::thread;
use std::time::Duration;

use job_timer::SnapshotChild;

/// Upper bound for a measurement that should be "about" some sleep length.
///
/// Scheduling delays on a loaded machine can stretch a sleep considerably;
/// anything below a second is acceptable for a test that only needs to
/// prove the right interval was measured.
const GENEROUS_CEILING_MS: f64 = 1_000.0;

fn sleep_ms(milliseconds: u64) {
    thread::sleep(Duration::from_millis(milliseconds));
}

#[test]
#[cfg_attr(miri, ignore = "Miri cannot use the real operating system clocks")]
fn measures_delay_between_start_and_stop() {
    let profile = job_timer::start("Total");
    sleep_ms(100);
    profile.stop();

    let result = profile.result().expect("stopped counters always have a result");

    assert!(
        result.total() >= 100.0,
        "expected total {} to cover the 100 ms sleep",
        result.total()
    );
    assert!(
        result.total() < GENEROUS_CEILING_MS,
        "expected total {} to stay in the same order of magnitude as the sleep",
        result.total()
    );

    // The wall-clock span should agree with the monotonic total to within
    // ordinary clock resolution.
    let wall_span = result.end() - result.start();
    assert!(
        (wall_span - result.total()).abs() < 50.0,
        "expected wall span {wall_span} to be about the monotonic total {}",
        result.total()
    );
}

#[test]
#[cfg_attr(miri, ignore = "Miri cannot use the real operating system clocks")]
fn nested_jobs_account_missed_time() {
    let profile = job_timer::start("Total");

    sleep_ms(100);
    let job = profile.start("Job1").expect("counter is running");
    sleep_ms(100);
    job.stop();
    profile.stop();

    let result = profile.result().expect("stopped counters always have a result");
    let job1 = match result.children() {
        [SnapshotChild::Job(job1)] => job1,
        other => panic!("expected exactly one plain child, got {}", other.len()),
    };

    assert!(
        result.total() >= 200.0 && result.total() < GENEROUS_CEILING_MS,
        "expected total {} to be about 200 ms",
        result.total()
    );
    assert!(
        job1.total() >= 100.0 && job1.total() < result.total(),
        "expected Job1 total {} to be about 100 ms and within the parent",
        job1.total()
    );

    // The 100 ms before Job1 started is the root's own, unmeasured work.
    let missed = result.missed().expect("jobs with children have missed time");
    assert!(
        missed >= 100.0 && missed < GENEROUS_CEILING_MS,
        "expected missed {missed} to be about 100 ms"
    );
}

#[test]
#[cfg_attr(miri, ignore = "Miri cannot use the real operating system clocks")]
fn stopping_the_root_interrupts_open_jobs() {
    let profile = job_timer::start("Total");

    profile.start("Job1").expect("counter is running");
    profile.start("Job2").expect("counter is running");
    sleep_ms(20);
    profile.stop();

    let result = profile.result().expect("stopped counters always have a result");
    assert_eq!(result.children().len(), 2);

    for child in result.children() {
        let job = match child {
            SnapshotChild::Job(job) => job,
            SnapshotChild::Group(group) => panic!("unexpected group '{}'", group.name()),
        };
        assert!(
            job.interrupted(),
            "expected '{}' to be marked interrupted",
            job.name()
        );
        assert!(
            (job.end() - result.end()).abs() < f64::EPSILON,
            "expected '{}' to end at the root's stop instant",
            job.name()
        );
    }
}

#[test]
#[cfg_attr(miri, ignore = "Miri cannot use the real operating system clocks")]
fn parallel_branches_merge_by_job_name() {
    let profile = job_timer::start("Total");

    // Ten branches measure "Step" concurrently on this one thread.
    let branches: Vec<_> = (0..10)
        .map(|_| {
            let branch = profile.parallel().expect("counter is running");
            branch.start("Step").expect("branch is running");
            branch
        })
        .collect();
    sleep_ms(50);
    for branch in &branches {
        branch.stop_path("Step");
    }

    // Half of them run an extra job afterwards.
    for branch in branches.iter().step_by(2) {
        branch.start("Extra").expect("branch is running");
    }
    sleep_ms(10);
    for branch in branches.iter().step_by(2) {
        branch.stop_path("Extra");
    }

    profile.stop();

    let result = profile.result().expect("stopped counters always have a result");
    assert_eq!(result.children().len(), 2);

    let group = |name: &str| match result
        .children()
        .iter()
        .find(|child| child.name() == name)
    {
        Some(SnapshotChild::Group(group)) => group,
        _ => panic!("expected a merged group named '{name}'"),
    };

    let step = group("Step");
    assert_eq!(step.instances().len(), 10);
    assert!(
        step.average() >= 50.0 && step.average() < GENEROUS_CEILING_MS,
        "expected Step average {} to be about 50 ms",
        step.average()
    );
    // The branches overlap completely, so the group's wall span is far
    // closer to one branch's duration than to the 500 ms serial sum.
    assert!(
        step.total() < GENEROUS_CEILING_MS,
        "expected Step span {} to reflect overlapping branches",
        step.total()
    );

    let extra = group("Extra");
    assert_eq!(extra.instances().len(), 5);
    assert!(
        extra.average() >= 10.0 && extra.average() < GENEROUS_CEILING_MS,
        "expected Extra average {} to be about 10 ms",
        extra.average()
    );
}

#[test]
#[cfg_attr(miri, ignore = "Miri cannot use the real operating system clocks")]
fn snapshot_outlives_the_counter_and_crosses_threads() {
    let result = {
        let profile = job_timer::start("Total");
        profile.start("Job1").expect("counter is running").stop();
        profile.stop();
        profile.result().expect("stopped counters always have a result")
    }; // live counter dropped here

    let total = thread::spawn(move || result.total())
        .join()
        .expect("snapshot thread should not panic");

    assert!(total >= 0.0);
}
