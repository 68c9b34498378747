use std::{
    fmt,
    hash::{Hash, Hasher},
};

use fixedbitset::FixedBitSet;

use crate::ecs::component::{Id, Spec};

/// A bitset over component ids. Bit `n` is set when the component with id `n` is present.
///
/// Masks are the identity of an archetype: two masks are equal when they have the same bits
/// set, regardless of how much backing storage either happens to have grown.
#[derive(Clone, Default)]
pub struct Mask {
    bits: FixedBitSet,
}

impl Mask {
    /// An empty mask.
    #[inline]
    pub fn new() -> Self {
        Self {
            bits: FixedBitSet::new(),
        }
    }

    /// Build a mask with one bit per id in the spec.
    pub fn from_spec(spec: &Spec) -> Self {
        let mut mask = Self::new();
        for id in spec.ids() {
            mask.insert(*id);
        }
        mask
    }

    /// Set the bit for `id`.
    #[inline]
    pub fn insert(&mut self, id: Id) {
        if id.index() >= self.bits.len() {
            self.bits.grow(id.index() + 1);
        }
        self.bits.insert(id.index());
    }

    /// Whether the bit for `id` is set.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Whether every bit set in `other` is also set in `self`.
    #[inline]
    pub fn contains_all(&self, other: &Mask) -> bool {
        other.bits.ones().all(|index| self.bits.contains(index))
    }

    /// Whether any bit set in `other` is also set in `self`.
    #[inline]
    pub fn contains_any(&self, other: &Mask) -> bool {
        other.bits.ones().any(|index| self.bits.contains(index))
    }

    /// Returns true if no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Number of bits set.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// The ids of all set bits, in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.bits.ones().map(Id::from)
    }
}

impl PartialEq for Mask {
    fn eq(&self, other: &Self) -> bool {
        self.bits.ones().eq(other.bits.ones())
    }
}

impl Eq for Mask {}

impl Hash for Mask {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for index in self.bits.ones() {
            index.hash(state);
        }
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.ones()).finish()
    }
}

impl From<&Spec> for Mask {
    fn from(spec: &Spec) -> Self {
        Self::from_spec(spec)
    }
}
