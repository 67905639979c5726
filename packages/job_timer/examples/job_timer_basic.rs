//! Simplified example demonstrating key `job_timer` types working together.
//!
//! This example shows how to use the main types in the `job_timer` package:
//! - `Counter`: drives start/stop calls for nested jobs
//! - `Snapshot`: immutable timing tree with derived statistics
//!
//! Run with: `cargo run --example job_timer_basic`.

use std::thread::sleep;
use std::time::Duration;

use job_timer::{Error, Meta};
use serde_json::json;

fn main() -> Result<(), Error> {
    println!("=== Job Timing Example ===");
    println!();

    // Create a root timer - everything below hangs off this job.
    let profile = job_timer::start("Total");
    println!("✓ Started root timer");
    println!();

    // Some unmeasured preparation work; this will show up as the root's
    // "missed" time because no child covers it.
    sleep(Duration::from_millis(30));

    // A nested job with meta information attached at start time.
    let mut meta = Meta::new();
    meta.insert("files".to_string(), json!(3));
    let load = profile.start_with_meta("Load", meta)?;
    sleep(Duration::from_millis(50));
    load.stop();

    // Nested jobs can be driven by path from the root counter, creating
    // intermediate jobs as needed.
    profile.start("Process/Parse")?;
    sleep(Duration::from_millis(20));
    profile.stop_path("Process/Parse");
    sleep(Duration::from_millis(10));
    profile.stop_path("Process");

    // Stopping a timer that was never created is a harmless no-op.
    profile.stop_path("OnlySometimesCreated");

    profile.stop_with_meta({
        let mut meta = Meta::new();
        meta.insert("status".to_string(), json!("ok"));
        meta
    });

    let result = profile
        .result()
        .expect("stopped counters always have a result");

    println!("Timing tree:");
    result.print_to_stdout();
    println!();

    println!(
        "Root spent {:.1} ms outside its measured children.",
        result
            .missed()
            .expect("jobs with children have missed time")
    );
    println!();

    // Snapshots serialize with stable field names, so they can be handed
    // to any logging or metrics backend.
    println!("As JSON:");
    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("snapshots are serializable")
    );

    Ok(())
}
