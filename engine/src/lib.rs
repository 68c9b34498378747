//! An archetype based entity/component storage engine.
//!
//! Entities are generation checked identifiers. Components attached to an entity determine the
//! archetype (table) its data lives in, and views iterate every archetype matching a set of
//! components. See [`ecs::World`] for the entry point.

// Allow derive macros to refer to `::ash_ecs` from inside this crate.
extern crate self as ash_ecs;

pub mod ecs;
