//! Benchmarks to measure the compute overhead of `job_timer` logic itself.
//!
//! These benchmarks measure the overhead of the tracking infrastructure by
//! timing empty jobs - jobs that do not do any actual work but still incur
//! the bookkeeping overhead.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("job_timer_overhead");

    // Baseline measurement - no tracking at all
    group.bench_function("baseline_empty", |b| {
        b.iter(|| {
            // Completely empty - just the black_box call
            black_box(());
        });
    });

    group.bench_function("root_start_stop", |b| {
        b.iter(|| {
            let profile = job_timer::start("bench");
            profile.stop();
            black_box(profile);
        });
    });

    group.bench_function("nested_start_stop", |b| {
        b.iter(|| {
            let profile = job_timer::start("bench");
            let job = profile.start("job").expect("counter is running");
            job.stop();
            profile.stop();
            black_box(profile);
        });
    });

    group.bench_function("path_start_stop_three_levels", |b| {
        b.iter(|| {
            let profile = job_timer::start("bench");
            profile
                .start("a/b/c")
                .expect("counter is running");
            profile.stop_path("a/b/c");
            profile.stop_path("a/b");
            profile.stop_path("a");
            profile.stop();
            black_box(profile);
        });
    });

    group.bench_function("snapshot_build", |b| {
        let profile = job_timer::start("bench");
        for index in 0..10 {
            profile
                .start(&format!("job{index}"))
                .expect("counter is running")
                .stop();
        }
        profile.stop();

        b.iter(|| {
            black_box(profile.result());
        });
    });

    group.finish();
}
