//! Errors reported by the storage engine.
//!
//! Every error here is a caller contract violation detected synchronously at the point of the
//! call. None of them are transient, and none leave storage partially mutated: all validation
//! happens before a row is touched.

use thiserror::Error;

use crate::ecs::entity::Entity;

/// Convenience alias for results returned by the storage engine.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The entity is stale (released) or was never created by this world.
    #[error("invalid entity: {0:?}")]
    InvalidEntity(Entity),

    /// The component type has never been seen by this world.
    #[error("unknown component type: {0}")]
    UnknownComponent(&'static str),

    /// The entity's archetype does not contain the component.
    #[error("entity {entity:?} does not have component {component}")]
    ComponentNotPresent {
        entity: Entity,
        component: &'static str,
    },

    /// The entity's archetype already contains the component.
    #[error("entity {entity:?} already has component {component}")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    /// A default-constructing add was requested for a component registered without a
    /// constructor.
    #[error("component {0} has no registered constructor")]
    MissingConstructor(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::Id;

    #[test]
    fn error_messages_name_the_offender() {
        let entity = Entity::new(Id::from(7u32));
        let err = Error::DuplicateComponent {
            entity,
            component: "Position",
        };
        let message = err.to_string();
        assert!(message.contains("Position"));
        assert!(message.contains("already has"));

        assert_eq!(
            Error::UnknownComponent("Velocity").to_string(),
            "unknown component type: Velocity"
        );
    }
}
