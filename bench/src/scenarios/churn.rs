//! Archetype churn benchmark scenario.
//!
//! Every entity carries a Position. Each frame a random subset of entities gains or loses one
//! of three optional components, so rows constantly move between up to eight archetypes.
//!
//! This scenario tests:
//! - Row migration cost (move shared columns, construct or drop the rest)
//! - Directory updates for swap-remove relocation
//! - Mixed add (default constructed) and insert (by value) paths

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ash_ecs::ecs::{Entity, World, WorldId};

use crate::components::{AiState, Health, Position, Team};
use crate::scenarios::Scenario;

/// Configuration for the churn benchmark.
pub struct ChurnConfig {
    /// Number of entities.
    pub entity_count: usize,
    /// Entities changed per frame.
    pub changes_per_frame: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            entity_count: 10_000,
            changes_per_frame: 1_000,
            seed: 42,
        }
    }
}

/// Archetype churn benchmark scenario.
pub struct ChurnScenario {
    config: ChurnConfig,
    world: World,
    rng: ChaCha8Rng,
    entities: Vec<Entity>,
}

impl ChurnScenario {
    pub fn new() -> Self {
        Self::with_config(ChurnConfig::default())
    }

    pub fn with_config(config: ChurnConfig) -> Self {
        let mut world = World::new(WorldId::new(0));
        world.register_component::<Health>();
        world.register_component::<AiState>();
        Self {
            world,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            entities: Vec::new(),
            config,
        }
    }

    /// Number of archetypes created so far.
    pub fn archetype_count(&self) -> usize {
        self.world.archetype_count()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    fn toggle(&mut self, entity: Entity, which: u32) {
        let world = &mut self.world;
        let result = match which {
            0 if world.has_component::<Health>(entity) => world.remove::<Health>(entity),
            0 => world.add::<Health>(entity),
            1 if world.has_component::<AiState>(entity) => world.remove::<AiState>(entity),
            1 => world.add::<AiState>(entity),
            _ if world.has_component::<Team>(entity) => world.remove::<Team>(entity),
            _ => world.insert(entity, Team { id: which }),
        };
        debug_assert!(result.is_ok(), "toggle failed: {result:?}");
    }
}

impl Default for ChurnScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ChurnScenario {
    fn name(&self) -> &'static str {
        "churn"
    }

    fn description(&self) -> &'static str {
        "Random component add/remove across a small family of archetypes"
    }

    fn entity_count(&self) -> usize {
        self.config.entity_count
    }

    fn setup(&mut self) {
        self.entities = (0..self.config.entity_count)
            .map(|i| {
                self.world.spawn(Position {
                    x: i as f32,
                    y: 0.0,
                    z: 0.0,
                })
            })
            .collect();
    }

    fn update(&mut self) {
        if self.entities.is_empty() {
            return;
        }
        for _ in 0..self.config.changes_per_frame {
            let entity = self.entities[self.rng.gen_range(0..self.entities.len())];
            let which = self.rng.gen_range(0..3);
            self.toggle(entity, which);
        }
    }

    fn teardown(&mut self) {
        for entity in self.entities.drain(..) {
            let _ = self.world.release(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churn_keeps_every_entity_and_position() {
        // Given
        let mut scenario = ChurnScenario::with_config(ChurnConfig {
            entity_count: 200,
            changes_per_frame: 100,
            seed: 7,
        });
        scenario.setup();

        // When
        for _ in 0..20 {
            scenario.update();
        }

        // Then
        assert_eq!(scenario.world().len(), 200);
        assert!(scenario.archetype_count() <= 8);
        for (i, entity) in scenario.entities.iter().enumerate() {
            let pos = scenario.world().component::<Position>(*entity).unwrap();
            assert_eq!(pos.x, i as f32);
        }

        scenario.teardown();
        assert!(scenario.world().is_empty());
    }
}
