//! Particle system benchmark scenario.
//!
//! Simulates a high-volume particle system with:
//! - 100,000 particles
//! - Simple components: Position, Velocity, Lifetime, Color, Size
//! - Passes: movement, lifetime decay, fade, release and respawn of dead particles
//!
//! This scenario tests:
//! - High entity count iteration through registered views
//! - Release/spawn throughput, including swap-remove relocation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use ash_ecs::ecs::{Entity, View, World, WorldId};

use crate::components::{Color, Lifetime, Particle, Position, Size, Velocity};
use crate::scenarios::Scenario;

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            delta_time: 1.0 / 60.0, // 60 FPS
            seed: 12345,
        }
    }
}

struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn create_particle(&mut self) -> (Particle, Position, Velocity, Lifetime, Color, Size) {
        let rng = &mut self.0;
        let pos = Position {
            x: rng.gen_range(-100.0..100.0),
            y: rng.gen_range(-100.0..100.0),
            z: rng.gen_range(-100.0..100.0),
        };
        let vel = Velocity {
            x: rng.gen_range(-10.0..10.0),
            y: rng.gen_range(-10.0..10.0),
            z: rng.gen_range(-10.0..10.0),
        };
        let lifetime = Lifetime {
            remaining: rng.gen_range(0.05..0.5),
            total: 0.5,
        };
        let color = Color {
            r: rng.gen_range(0.0..1.0),
            g: rng.gen_range(0.0..1.0),
            b: rng.gen_range(0.0..1.0),
            a: 1.0,
        };
        let size = Size {
            width: rng.gen_range(0.1..2.0),
            height: rng.gen_range(0.1..2.0),
        };

        (Particle, pos, vel, lifetime, color, size)
    }
}

struct Views {
    movement: View<(&'static mut Position, &'static Velocity)>,
    decay: View<&'static mut Lifetime>,
    fade: View<(&'static Lifetime, &'static mut Color)>,
    lifetimes: View<&'static Lifetime>,
}

/// Particle system benchmark scenario.
pub struct ParticleScenario {
    config: ParticleConfig,
    world: World,
    factory: ParticleFactory,
    views: Option<Views>,
    dead: Vec<Entity>,
}

impl ParticleScenario {
    /// Create a new particle scenario with default config.
    pub fn new() -> Self {
        Self::with_config(ParticleConfig::default())
    }

    /// Create a new particle scenario with custom config.
    pub fn with_config(config: ParticleConfig) -> Self {
        Self {
            world: World::new(WorldId::new(0)),
            factory: ParticleFactory(ChaCha8Rng::seed_from_u64(config.seed)),
            views: None,
            dead: Vec::new(),
            config,
        }
    }

    /// Get current particle count.
    pub fn current_count(&self) -> usize {
        self.world.len()
    }

    /// Advance positions by velocity.
    pub fn movement(&mut self) {
        let Some(views) = &self.views else { return };
        let dt = self.config.delta_time;
        views.movement.each(&mut self.world, |(pos, vel)| {
            pos.x += vel.x * dt;
            pos.y += vel.y * dt;
            pos.z += vel.z * dt;
        });
    }

    /// Decay particle lifetimes.
    pub fn lifetime_decay(&mut self) {
        let Some(views) = &self.views else { return };
        let dt = self.config.delta_time;
        views.decay.each(&mut self.world, |lifetime| {
            lifetime.remaining -= dt;
        });
    }

    fn fade(&mut self) {
        let Some(views) = &self.views else { return };
        views.fade.each(&mut self.world, |(lifetime, color)| {
            color.a = (lifetime.remaining / lifetime.total).max(0.0);
        });
    }

    /// Release dead particles and spawn a replacement for each.
    fn respawn(&mut self) {
        let Some(views) = &self.views else { return };
        let dead = &mut self.dead;
        views.lifetimes.each_entity_ref(&self.world, |entity, lifetime| {
            if lifetime.remaining <= 0.0 {
                dead.push(entity);
            }
        });

        for entity in self.dead.drain(..) {
            if self.world.release(entity).is_ok() {
                self.world.spawn(self.factory.create_particle());
            }
        }
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn description(&self) -> &'static str {
        "High-volume particle system with movement, lifetime, and respawn"
    }

    fn entity_count(&self) -> usize {
        self.config.particle_count
    }

    fn setup(&mut self) {
        for _ in 0..self.config.particle_count {
            self.world.spawn(self.factory.create_particle());
        }

        self.views = Some(Views {
            movement: self.world.make_view(),
            decay: self.world.make_view(),
            fade: self.world.make_view(),
            lifetimes: self.world.make_view(),
        });
    }

    fn update(&mut self) {
        self.movement();
        self.lifetime_decay();
        self.fade();
        self.respawn();
    }

    fn teardown(&mut self) {
        if let Some(views) = self.views.take() {
            let mut entities = Vec::new();
            views
                .lifetimes
                .each_entity_ref(&self.world, |entity, _| entities.push(entity));
            for entity in entities {
                let _ = self.world.release(entity);
            }
            self.world.destroy_view(views.movement);
            self.world.destroy_view(views.decay);
            self.world.destroy_view(views.fade);
            self.world.destroy_view(views.lifetimes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_scenario_setup() {
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count: 100,
            ..Default::default()
        });

        scenario.setup();
        assert_eq!(scenario.current_count(), 100);

        scenario.teardown();
        assert_eq!(scenario.current_count(), 0);
    }

    #[test]
    fn particle_scenario_update() {
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count: 100,
            ..Default::default()
        });

        scenario.setup();

        // Enough frames for every initial particle to die at least once
        for _ in 0..60 {
            scenario.update();
        }

        // Dead particles are replaced one for one
        assert_eq!(scenario.current_count(), 100);

        scenario.teardown();
    }
}
