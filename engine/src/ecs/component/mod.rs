//! Component types, their runtime shape and the per-world component registry.
//!
//! ## Architecture
//!
//! - [`Component`]: The trait every attachable data type implements (usually via
//!   `#[derive(Component)]`).
//! - [`Id`]: A small integer assigned to each component type the first time a world sees it.
//!   It doubles as the type's bit position in every [`Mask`].
//! - [`Info`]: The type-erased shape of a component (layout, construct, move and drop).
//! - [`Registry`]: Maps Rust types to ids and ids to [`Info`].
//! - [`Spec`]: A sorted list of component ids, used to lay out archetype columns.
//! - [`Mask`]: A bitset over component ids, the identity of an archetype.
//! - [`Set`]: A single component value or a tuple of values to attach to an entity.
//!
//! ## Index assignment
//!
//! Ids are assigned lazily: the first use of a type in a world (registration, attach, view or
//! handle) assigns the next free id. Once assigned, an id never changes for the lifetime of the
//! registry.
//!
//! ```ignore
//! use ash_ecs::ecs::component::{Component, Registry};
//!
//! #[derive(Component, Default)]
//! struct Position { x: f32, y: f32 }
//!
//! let registry = Registry::new();
//! let pos_id = registry.register_default::<Position>();
//! assert_eq!(registry.register::<Position>(), pos_id);
//! ```

mod info;
mod mask;
mod registry;
mod set;
mod spec;

pub use info::{ConstructFn, Info};
pub use mask::Mask;
pub use registry::Registry;
pub use set::{Set, Target};
pub use spec::{IntoSpec, Spec};

/// A component identifier. Assigned in registration order starting from zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component for indexable storage (Vec, bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A plain data type that can be attached to an entity.
///
/// The hooks are optional change tracking points. [`mark_read`](Component::mark_read) runs when
/// a read or write handle hands out a shared reference, [`mark_write`](Component::mark_write)
/// when a write handle hands out a mutable one. Both default to no-ops.
pub trait Component: 'static + Sized + Send + Sync {
    #[inline]
    fn mark_read(&self) {}

    #[inline]
    fn mark_write(&mut self) {}
}
