use crate::{
    all_tuples,
    ecs::component::{Component, Id, Registry},
};

/// A sorted, duplicate free list of component ids.
///
/// Where a [`Mask`](super::Mask) answers membership questions, a spec fixes the column order of an
/// archetype table: column `n` stores the component `spec.ids()[n]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Spec {
    ids: Vec<Id>,
}

impl Spec {
    /// An empty component specification.
    pub const EMPTY: Self = Spec { ids: Vec::new() };

    /// Construct a new Spec from the given component ids. Order does not matter and duplicates are
    /// collapsed.
    #[inline]
    pub fn new(ids: impl Into<Vec<Id>>) -> Self {
        let mut ids = ids.into();
        ids.sort_unstable();
        ids.dedup();
        ids.shrink_to_fit();
        Self { ids }
    }

    /// The component ids, ascending.
    #[inline]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// The column position of `id`, if present.
    #[inline]
    pub fn position(&self, id: Id) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.position(id).is_some()
    }

    /// Determine if every id in `other` is also in this spec.
    #[inline]
    pub fn contains_all(&self, other: &Spec) -> bool {
        other.ids.iter().all(|id| self.contains(*id))
    }

    /// Determine if any id in `other` is also in this spec.
    #[inline]
    pub fn contains_any(&self, other: &Spec) -> bool {
        other.ids.iter().any(|id| self.contains(*id))
    }

    /// The ids in either spec.
    pub fn union(&self, other: &Spec) -> Self {
        let mut ids = Vec::with_capacity(self.ids.len() + other.ids.len());
        ids.extend_from_slice(&self.ids);
        ids.extend_from_slice(&other.ids);
        Self::new(ids)
    }

    /// The ids in self that are not in other.
    pub fn difference(&self, other: &Spec) -> Self {
        // Filtering a sorted list keeps it sorted.
        Self {
            ids: self
                .ids
                .iter()
                .copied()
                .filter(|id| !other.contains(*id))
                .collect(),
        }
    }

    /// The ids in both specs.
    pub fn intersection(&self, other: &Spec) -> Self {
        Self {
            ids: self
                .ids
                .iter()
                .copied()
                .filter(|id| other.contains(*id))
                .collect(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl From<Vec<Id>> for Spec {
    #[inline]
    fn from(value: Vec<Id>) -> Self {
        Spec::new(value)
    }
}

/// Types that name a set of component types: a single component, `()` or a tuple of either.
///
/// Converting registers any component type the registry has not seen yet.
pub trait IntoSpec {
    fn into_spec(registry: &Registry) -> Spec;
}

impl IntoSpec for () {
    fn into_spec(_registry: &Registry) -> Spec {
        Spec::EMPTY
    }
}

impl<C: Component> IntoSpec for C {
    fn into_spec(registry: &Registry) -> Spec {
        Spec::new([registry.register::<C>()])
    }
}

macro_rules! tuple_spec {
    ($($name: ident),*) => {
        impl<$($name: IntoSpec),*> IntoSpec for ($($name,)*) {
            fn into_spec(registry: &Registry) -> Spec {
                let mut ids = Vec::new();
                $(
                    ids.extend_from_slice(<$name>::into_spec(registry).ids());
                )*
                Spec::new(ids)
            }
        }
    }
}

all_tuples!(tuple_spec);

#[cfg(test)]
mod tests {
    use std::hash::{DefaultHasher, Hash, Hasher};

    use ash_macros::Component;

    use super::*;

    #[derive(Component)]
    struct Position;
    #[derive(Component)]
    struct Velocity;
    #[derive(Component)]
    struct Health;
    #[derive(Component)]
    struct Name;

    fn ids() -> (Registry, Id, Id, Id, Id) {
        let registry = Registry::new();
        let a = registry.register::<Position>();
        let b = registry.register::<Velocity>();
        let c = registry.register::<Health>();
        let d = registry.register::<Name>();
        (registry, a, b, c, d)
    }

    #[test]
    fn order_and_duplicates_are_normalized() {
        // Given
        let (_, a, b, c, _) = ids();

        // When
        let shuffled = Spec::new(vec![c, a, b, a, c]);
        let sorted = Spec::new(vec![a, b, c]);

        // Then
        assert_eq!(shuffled.ids(), &[a, b, c]);
        assert_eq!(shuffled, sorted);
        let mut h1 = DefaultHasher::new();
        shuffled.hash(&mut h1);
        let mut h2 = DefaultHasher::new();
        sorted.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn membership() {
        let (_, a, b, c, d) = ids();
        let abc = Spec::new(vec![a, b, c]);
        let ab = Spec::new(vec![b, a]);
        let ad = Spec::new(vec![a, d]);

        assert!(abc.contains(b));
        assert!(!abc.contains(d));
        assert_eq!(abc.position(c), Some(2));
        assert!(abc.contains_all(&ab));
        assert!(abc.contains_all(&Spec::EMPTY));
        assert!(!abc.contains_all(&ad));
        assert!(abc.contains_any(&ad));
    }

    #[test]
    fn set_operations() {
        // Given
        let (_, a, b, c, d) = ids();
        let abc = Spec::new(vec![a, b, c]);
        let bd = Spec::new(vec![b, d]);

        // Then
        assert_eq!(abc.union(&bd).ids(), &[a, b, c, d]);
        assert_eq!(abc.union(&abc), abc);
        assert_eq!(abc.difference(&bd).ids(), &[a, c]);
        assert_eq!(abc.intersection(&bd).ids(), &[b]);
        assert!(Spec::EMPTY.is_empty());
        assert_eq!(abc.len(), 3);
    }

    #[test]
    fn into_spec_registers_lazily() {
        // Given
        let registry = Registry::new();

        // When
        let spec = registry.spec::<(Health, (Position, Health))>();

        // Then - Ids assigned in first-seen order, spec collapsed and sorted
        assert_eq!(spec.ids(), &[Id::new(0), Id::new(1)]);
        assert_eq!(registry.get::<Health>(), Some(Id::new(0)));
        assert_eq!(registry.get::<Position>(), Some(Id::new(1)));
        assert!(registry.spec::<()>().is_empty());
    }
}
