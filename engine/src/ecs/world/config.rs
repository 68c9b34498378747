use crate::ecs::storage::GrowthStrategy;

/// Storage tuning for a [`World`](super::World).
///
/// ```ignore
/// let world = World::with_config(
///     world::Id::new(0),
///     Config {
///         growth: GrowthStrategy::Buffer(256),
///         initial_capacity: 1024,
///     },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How archetype columns grow once full.
    pub growth: GrowthStrategy,

    /// Rows reserved up front in every newly created archetype.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            growth: GrowthStrategy::Multiply(2),
            initial_capacity: 0,
        }
    }
}
