//! Archetypes and the catalog that owns them.
//!
//! An [`Archetype`] is the storage for every entity sharing one exact set of components. Its
//! [`Mask`] is its identity: the [`Catalog`] guarantees at most one archetype per mask, and creates
//! archetypes lazily the first time an entity needs that component set.
//!
//! Archetypes are never destroyed. An archetype emptied by removals keeps its (empty) table for the
//! lifetime of the world, ready for the next entity with the same component set.

mod catalog;

pub use catalog::{Catalog, Observer};

use crate::ecs::{
    component::{self, Mask, Spec},
    storage::Table,
};

/// The identifier of an archetype. Assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// Get the index of the Id as a usize to be used in collections.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// The storage for all entities with exactly one set of components.
pub struct Archetype {
    id: Id,

    /// The component set, as a bitset.
    mask: Mask,

    /// The component set, as the sorted ids laying out the table's columns.
    spec: Spec,

    table: Table,
}

impl Archetype {
    pub(crate) fn new(id: Id, spec: Spec, table: Table) -> Self {
        Self {
            id,
            mask: Mask::from_spec(&spec),
            spec,
            table,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// The component ids of this archetype, ascending.
    #[inline]
    pub fn components(&self) -> &[component::Id] {
        self.spec.ids()
    }

    #[inline]
    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    #[inline]
    pub fn contains(&self, id: component::Id) -> bool {
        self.mask.contains(id)
    }

    /// Whether this archetype stores every component in `mask`.
    #[inline]
    pub fn supports(&self, mask: &Mask) -> bool {
        self.mask.contains_all(mask)
    }

    #[inline]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[inline]
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// Number of entities stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
