use std::{
    collections::HashMap,
    ops::{Index, IndexMut},
};

use log::debug;

use crate::ecs::{
    archetype::{Archetype, Id},
    component::{self, Mask, Spec},
    error::Result,
    storage::{GrowthStrategy, Table},
};

/// Notified of every archetype the catalog creates, at creation time.
pub trait Observer {
    fn on_archetype_created(&mut self, archetype: &Archetype);
}

/// Observes nothing.
impl Observer for () {
    fn on_archetype_created(&mut self, _archetype: &Archetype) {}
}

/// Every archetype of a world, indexed by id and by mask.
pub struct Catalog {
    /// The archetypes, indexed by id.
    archetypes: Vec<Archetype>,

    /// The archetype for each mask. At most one archetype exists per mask.
    by_mask: HashMap<Mask, Id>,

    /// Column growth for new tables.
    growth: GrowthStrategy,

    /// Rows reserved in new tables.
    initial_capacity: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(GrowthStrategy::default(), 0)
    }
}

impl Catalog {
    /// Create an empty catalog whose tables grow with `growth` and start with room for
    /// `initial_capacity` rows.
    pub fn new(growth: GrowthStrategy, initial_capacity: usize) -> Self {
        Self {
            archetypes: Vec::new(),
            by_mask: HashMap::new(),
            growth,
            initial_capacity,
        }
    }

    /// Get the archetype for the spec's component set, creating it (and telling `observer`) if
    /// it does not exist yet.
    pub fn get_or_create(
        &mut self,
        spec: &Spec,
        components: &component::Registry,
        observer: &mut impl Observer,
    ) -> Result<Id> {
        let mask = Mask::from_spec(spec);
        if let Some(id) = self.by_mask.get(&mask) {
            return Ok(*id);
        }

        let infos = components.infos(spec)?;
        let id = Id::new(self.archetypes.len() as u32);
        let table = Table::new(&infos, self.growth, self.initial_capacity);
        self.archetypes.push(Archetype::new(id, spec.clone(), table));
        self.by_mask.insert(mask, id);

        debug!(
            "created archetype {:?} with components [{}]",
            id,
            infos
                .iter()
                .map(|info| info.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let archetype = &self.archetypes[id.index()];
        observer.on_archetype_created(archetype);
        Ok(id)
    }

    /// Get the archetype for a mask, if it exists.
    #[inline]
    pub fn find(&self, mask: &Mask) -> Option<Id> {
        self.by_mask.get(mask).copied()
    }

    #[inline]
    pub fn get(&self, id: Id) -> Option<&Archetype> {
        self.archetypes.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id) -> Option<&mut Archetype> {
        self.archetypes.get_mut(id.index())
    }

    /// Borrow two distinct archetypes mutably at once.
    ///
    /// # Panics
    /// - If the ids are equal or either is out of range.
    pub fn pair_mut(&mut self, a: Id, b: Id) -> (&mut Archetype, &mut Archetype) {
        assert_ne!(a, b, "cannot borrow archetype {a:?} twice");
        if a.index() < b.index() {
            let (low, high) = self.archetypes.split_at_mut(b.index());
            (&mut low[a.index()], &mut high[0])
        } else {
            let (low, high) = self.archetypes.split_at_mut(a.index());
            (&mut high[0], &mut low[b.index()])
        }
    }

    /// The ids of every archetype storing all components in `mask`, in creation order.
    pub fn supporting(&self, mask: &Mask) -> Vec<Id> {
        self.archetypes
            .iter()
            .filter(|archetype| archetype.supports(mask))
            .map(Archetype::id)
            .collect()
    }

    /// Number of archetypes.
    #[inline]
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }
}

impl Index<Id> for Catalog {
    type Output = Archetype;

    /// # Panics
    /// - If no archetype has the id. Ids only come from this catalog, so this is a bug.
    #[inline]
    fn index(&self, id: Id) -> &Archetype {
        &self.archetypes[id.index()]
    }
}

impl IndexMut<Id> for Catalog {
    #[inline]
    fn index_mut(&mut self, id: Id) -> &mut Archetype {
        &mut self.archetypes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use ash_macros::Component;

    use super::*;

    #[derive(Component)]
    struct Position;
    #[derive(Component)]
    struct Velocity;
    #[derive(Component)]
    struct Health;

    #[derive(Default)]
    struct Recorder(Vec<Id>);

    impl Observer for Recorder {
        fn on_archetype_created(&mut self, archetype: &Archetype) {
            self.0.push(archetype.id());
        }
    }

    #[test]
    fn get_or_create_is_idempotent_by_mask() {
        // Given
        let components = component::Registry::new();
        let mut catalog = Catalog::default();
        let mut recorder = Recorder::default();

        // When - Same component set, different order
        let a = catalog
            .get_or_create(
                &components.spec::<(Position, Velocity)>(),
                &components,
                &mut recorder,
            )
            .unwrap();
        let b = catalog
            .get_or_create(
                &components.spec::<(Velocity, Position)>(),
                &components,
                &mut recorder,
            )
            .unwrap();

        // Then
        assert_eq!(a, b);
        assert_eq!(catalog.len(), 1);
        assert_eq!(recorder.0, vec![a]);
    }

    #[test]
    fn observer_sees_each_new_archetype_once() {
        // Given
        let components = component::Registry::new();
        let mut catalog = Catalog::default();
        let mut recorder = Recorder::default();

        // When
        let p = catalog
            .get_or_create(&components.spec::<Position>(), &components, &mut recorder)
            .unwrap();
        let pv = catalog
            .get_or_create(
                &components.spec::<(Position, Velocity)>(),
                &components,
                &mut recorder,
            )
            .unwrap();
        catalog
            .get_or_create(&components.spec::<Position>(), &components, &mut ())
            .unwrap();

        // Then
        assert_eq!(recorder.0, vec![p, pv]);
        assert_ne!(p, pv);
    }

    #[test]
    fn supporting_filters_by_superset() {
        // Given
        let components = component::Registry::new();
        let mut catalog = Catalog::default();
        let p = catalog
            .get_or_create(&components.spec::<Position>(), &components, &mut ())
            .unwrap();
        let pv = catalog
            .get_or_create(
                &components.spec::<(Position, Velocity)>(),
                &components,
                &mut (),
            )
            .unwrap();
        let h = catalog
            .get_or_create(&components.spec::<Health>(), &components, &mut ())
            .unwrap();

        // When
        let position = Mask::from_spec(&components.spec::<Position>());
        let velocity = Mask::from_spec(&components.spec::<Velocity>());

        // Then
        assert_eq!(catalog.supporting(&position), vec![p, pv]);
        assert_eq!(catalog.supporting(&velocity), vec![pv]);
        assert_eq!(catalog.supporting(&Mask::new()), vec![p, pv, h]);
        assert_eq!(catalog.find(&position), Some(p));
    }

    #[test]
    fn pair_mut_borrows_both() {
        let components = component::Registry::new();
        let mut catalog = Catalog::default();
        let p = catalog
            .get_or_create(&components.spec::<Position>(), &components, &mut ())
            .unwrap();
        let h = catalog
            .get_or_create(&components.spec::<Health>(), &components, &mut ())
            .unwrap();

        let (first, second) = catalog.pair_mut(h, p);
        assert_eq!(first.id(), h);
        assert_eq!(second.id(), p);

        let (first, second) = catalog.pair_mut(p, h);
        assert_eq!(first.id(), p);
        assert_eq!(second.id(), h);
    }

    #[test]
    #[should_panic(expected = "twice")]
    fn pair_mut_same_id_panics() {
        let components = component::Registry::new();
        let mut catalog = Catalog::default();
        let p = catalog
            .get_or_create(&components.spec::<Position>(), &components, &mut ())
            .unwrap();
        catalog.pair_mut(p, p);
    }
}
