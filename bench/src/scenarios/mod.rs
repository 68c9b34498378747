//! Realistic workload benchmarks.
//!
//! These scenarios exercise the storage engine with representative entity counts and
//! component combinations.
//!
//! # Scenarios
//!
//! - **Particles**: High entity count, simple components, short lifetimes
//! - **Churn**: Random component add/remove, many archetype transitions per frame

pub mod churn;
pub mod particles;

pub use churn::{ChurnConfig, ChurnScenario};
pub use particles::{ParticleConfig, ParticleScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of entities in this scenario.
    fn entity_count(&self) -> usize;

    /// Set up the scenario (spawn entities, initialize state).
    fn setup(&mut self);

    /// Run one "frame" of the scenario.
    fn update(&mut self);

    /// Clean up the scenario.
    fn teardown(&mut self);
}
