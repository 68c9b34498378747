//! Entity identifiers and the entity directory.
//!
//! An [`Entity`] is a value type combining a slot [`Id`] with a [`Generation`]. The slot
//! identifies a record in the [`Directory`]; the generation tracks how many times that slot has
//! been released. Any entity value whose generation no longer matches its record is *stale* and is
//! rejected by every world operation:
//!
//! ```rust,ignore
//! let entity = directory.create(); // Entity { id: 0, generation: 0 }
//! directory.release(entity)?;
//! let reused = directory.create(); // Entity { id: 0, generation: 1 }
//! assert!(!directory.is_valid(entity));
//! ```
//!
//! Generations only advance on release. Moving an entity between archetypes keeps its identity,
//! and is tracked by a separate per-record relocation epoch (see [`Record::epoch`]).

mod directory;

use std::fmt;

pub use directory::{Directory, Record};

/// The generation of an entity, used to track whether an entity value refers to the current
/// occupant of its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of a slot.
    pub const FIRST: Self = Self(0);

    /// The generation of a slot that has run out of generations. No entity is ever handed out
    /// with it.
    pub const RETIRED: Self = Self(u32::MAX);

    /// Get the next generation from the current. Saturates at [`Generation::RETIRED`].
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns true if a slot at this generation can no longer be reused.
    #[inline]
    pub fn is_retired(&self) -> bool {
        *self == Self::RETIRED
    }

    /// Get the raw generation value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// An entity slot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Get the raw id value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An entity in the world.
///
/// Two entities are equal only if both the id and the generation match.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// The slot of the entity in the directory.
    id: Id,

    /// The generation of the entity.
    generation: Generation,
}

impl Entity {
    /// Construct a first generation entity for an id.
    ///
    /// This is primarily used for testing.
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    /// Construct an entity with an id and known generation.
    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the generation of this entity.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this entity's record in the directory.
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.id.0, self.generation.0)
    }
}

/// Order by id, then generation.
impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ordering() {
        // Given
        let e1 = Entity::new(1u32);
        let e2 = Entity::new(2u32);
        let e1_gen1 = Entity::new_with_generation(Id(1), Generation::FIRST.next());

        // Then - Ordered by ID first, then generation
        assert!(e1 < e2);
        assert!(e1 < e1_gen1);
        assert!(e1_gen1 < e2);
    }

    #[test]
    fn entity_equality_requires_matching_generation() {
        let e1 = Entity::new(42u32);
        let e2 = Entity::new(42u32);
        let e3 = Entity::new(43u32);
        let e1_gen1 = Entity::new_with_generation(Id(42), Generation(1));

        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
        assert_ne!(e1, e1_gen1);
    }

    #[test]
    fn generation_next() {
        let gen0 = Generation::FIRST;
        let gen1 = gen0.next();
        let gen2 = gen1.next();

        assert_eq!(gen0.value(), 0);
        assert_eq!(gen1.value(), 1);
        assert_eq!(gen2.value(), 2);
        assert!(gen2 > gen1);
    }

    #[test]
    fn generation_next_saturates_at_retired() {
        let last = Generation(u32::MAX - 1);

        assert!(!last.is_retired());
        assert_eq!(last.next(), Generation::RETIRED);
        assert_eq!(Generation::RETIRED.next(), Generation::RETIRED);
        assert!(Generation::RETIRED.is_retired());
    }

    #[test]
    fn entity_debug_format() {
        let entity = Entity::new_with_generation(Id(3), Generation(2));
        assert_eq!(format!("{entity:?}"), "Entity(3v2)");
        assert_eq!(entity.index(), 3);
    }
}
