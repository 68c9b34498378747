use crate::ecs::{archetype, storage::Row};

/// Where an entity's component data lives: an archetype and a row in its table.
///
/// Locations are only meaningful until the next structural change to that archetype. The entity
/// directory is the authority on an entity's current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    archetype_id: archetype::Id,
    row: Row,
}

impl Location {
    #[inline]
    pub const fn new(archetype_id: archetype::Id, row: Row) -> Self {
        Self { archetype_id, row }
    }

    /// The archetype holding the entity.
    #[inline]
    pub fn archetype_id(&self) -> archetype::Id {
        self.archetype_id
    }

    /// The entity's row in the archetype's table.
    #[inline]
    pub fn row(&self) -> Row {
        self.row
    }
}
