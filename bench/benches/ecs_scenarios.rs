//! ECS scenario benchmarks using Criterion.
//!
//! These benchmarks measure mixed workloads:
//! - Particle system (high entity count, release and respawn)
//! - Archetype churn (random add/remove)

use std::time::{Duration, Instant};

use ash_bench::scenarios::{ChurnConfig, ChurnScenario, ParticleConfig, ParticleScenario, Scenario};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

// =============================================================================
// Particle System Benchmarks
// =============================================================================

fn bench_particles(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/particles");

    for count in [10_000, 50_000, 100_000] {
        group.throughput(Throughput::Elements(count as u64));

        // Full frame update
        group.bench_with_input(BenchmarkId::new("frame", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| {
                scenario.update();
            });
        });

        // Movement pass only
        group.bench_with_input(BenchmarkId::new("movement", count), &count, |b, &n| {
            let mut scenario = ParticleScenario::with_config(ParticleConfig {
                particle_count: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| {
                scenario.movement();
            });
        });
    }

    group.finish();
}

// =============================================================================
// Churn Benchmarks
// =============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario/churn");

    for changes in [100, 1_000, 5_000] {
        group.throughput(Throughput::Elements(changes as u64));

        group.bench_with_input(BenchmarkId::new("frame", changes), &changes, |b, &n| {
            let mut scenario = ChurnScenario::with_config(ChurnConfig {
                changes_per_frame: n,
                ..Default::default()
            });
            scenario.setup();

            b.iter(|| {
                scenario.update();
            });
        });
    }

    group.finish();
}

// =============================================================================
// Frame Time Benchmarks (longer running, statistical)
// =============================================================================

fn run_frames(scenario: &mut impl Scenario, frames: usize) -> Duration {
    scenario.setup();
    let start = Instant::now();
    for _ in 0..frames {
        scenario.update();
    }
    let elapsed = start.elapsed();
    scenario.teardown();
    elapsed
}

fn bench_frame_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_times");
    group.sample_size(20); // Fewer samples since each runs many frames

    group.bench_function("particles_1000_frames", |b| {
        b.iter_custom(|iters| {
            (0..iters)
                .map(|_| {
                    let mut scenario = ParticleScenario::with_config(ParticleConfig {
                        particle_count: 50_000,
                        ..Default::default()
                    });
                    run_frames(&mut scenario, 1000)
                })
                .sum()
        });
    });

    group.bench_function("churn_1000_frames", |b| {
        b.iter_custom(|iters| {
            (0..iters)
                .map(|_| run_frames(&mut ChurnScenario::new(), 1000))
                .sum()
        });
    });

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_particles, bench_churn, bench_frame_times);

criterion_main!(benches);
