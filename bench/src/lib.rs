//! Benchmark utilities for the ash storage engine.
//!
//! - **Microbenchmarks**: Individual operations (spawn, iterate, migrate, release, handles)
//! - **Scenario benchmarks**: Mixed workloads (particles, random add/remove churn)
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p ash_bench
//!
//! # Run specific benchmark group
//! cargo bench -p ash_bench -- spawn
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod scenarios;
