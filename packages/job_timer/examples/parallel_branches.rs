//! Example demonstrating parallel branch counters and group merging.
//!
//! Ten branches measure a job named `Step` that overlaps in time on this
//! one thread; half of them follow up with an `Extra` job. When the root
//! stops, the same-named branch jobs merge into one group per name with
//! instance, average and span statistics.
//!
//! Run with: `cargo run --example parallel_branches`.

use std::thread::sleep;
use std::time::Duration;

use job_timer::{Error, SnapshotChild};

fn main() -> Result<(), Error> {
    println!("=== Parallel Branch Example ===");
    println!();

    let profile = job_timer::start("Total");

    // Spawn ten detached branch counters; each starts its own "Step" job.
    // The branches all make progress during the same 50 ms window, the way
    // overlapping callbacks would.
    let branches: Vec<_> = (0..10)
        .map(|_| {
            let branch = profile.parallel()?;
            branch.start("Step")?;
            Ok(branch)
        })
        .collect::<Result<_, Error>>()?;

    sleep(Duration::from_millis(50));
    for branch in &branches {
        branch.stop_path("Step");
    }

    // Every other branch runs a short follow-up job.
    for branch in branches.iter().step_by(2) {
        branch.start("Extra")?;
    }
    sleep(Duration::from_millis(10));
    for branch in branches.iter().step_by(2) {
        branch.stop_path("Extra");
    }

    profile.stop();

    let result = profile
        .result()
        .expect("stopped counters always have a result");

    println!("Timing tree:");
    result.print_to_stdout();
    println!();

    for child in result.children() {
        if let SnapshotChild::Group(group) = child {
            println!(
                "Group '{}': {} instances, average {:.1} ms over a {:.1} ms span",
                group.name(),
                group.instances().len(),
                group.average(),
                group.total()
            );
        }
    }

    Ok(())
}
