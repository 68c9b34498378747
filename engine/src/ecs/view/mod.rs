//! Cached, mask-matched iteration over every archetype holding a set of components.
//!
//! A [`View`] is created once through [`World::make_view`] and remembers which archetypes match
//! its components. The archetype catalog pushes every archetype it creates to the live views
//! whose mask it satisfies, so a view made before any matching entity exists still sees those
//! entities later.
//!
//! ```ignore
//! let view = world.make_view::<(&Position, &mut Velocity)>();
//! view.each(&mut world, |(pos, vel)| {
//!     vel.dx -= pos.x * 0.1;
//! });
//! world.destroy_view(view);
//! ```
//!
//! Iteration runs archetype by archetype in creation order, then row by row. That order is not
//! stable across structural changes.

mod data;

use std::marker::PhantomData;

use log::debug;

pub use data::{Access, Data, ReadOnly};

use crate::ecs::{
    archetype::{self, Archetype, Catalog},
    component::{self, Mask},
    entity::Entity,
    storage::Row,
    world::World,
};

/// The identifier of a view within its world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A typed handle to a view registered with a world.
///
/// The handle owns no data. It is consumed by [`World::destroy_view`].
pub struct View<D: Data> {
    id: Id,

    /// The instance token of the world that created the view.
    world: u64,

    _data: PhantomData<fn() -> D>,
}

impl<D: Data> View<D> {
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// The instance token of the world that created the view.
    #[inline]
    pub(crate) fn world(&self) -> u64 {
        self.world
    }

    /// Visit every matching row with mutable access.
    pub fn each<'w>(&self, world: &'w mut World, mut f: impl FnMut(D::Item<'w>)) {
        let world: &'w World = world;
        // SAFETY: The exclusive world borrow is held for 'w and the view's accesses were checked
        // for aliasing when it was made.
        unsafe { self.run(world, |_, item| f(item)) }
    }

    /// Visit every matching row with mutable access, along with its entity.
    pub fn each_entity<'w>(&self, world: &'w mut World, f: impl FnMut(Entity, D::Item<'w>)) {
        let world: &'w World = world;
        // SAFETY: As in `each`.
        unsafe { self.run(world, f) }
    }

    /// Number of rows the view would visit.
    pub fn len(&self, world: &World) -> usize {
        let catalog = world.catalog();
        self.state(world)
            .archetypes
            .iter()
            .map(|id| catalog[*id].len())
            .sum()
    }

    /// Returns true if the view would visit no rows.
    pub fn is_empty(&self, world: &World) -> bool {
        self.len(world) == 0
    }

    /// Number of archetypes the view matches, including empty ones.
    pub fn archetype_count(&self, world: &World) -> usize {
        self.state(world).archetypes.len()
    }

    /// The ids of the matching archetypes, in iteration order.
    pub fn archetypes<'w>(&self, world: &'w World) -> &'w [archetype::Id] {
        &self.state(world).archetypes
    }

    fn state<'w>(&self, world: &'w World) -> &'w State {
        assert_eq!(
            self.world,
            world.instance(),
            "view used with a world other than the one that created it"
        );
        world.views().state(self.id)
    }

    /// # Safety
    /// - Mutably fetched components must not be aliased for 'w. Either the caller holds the world
    ///   exclusively, or `D` is read-only.
    unsafe fn run<'w>(&self, world: &'w World, f: impl FnMut(Entity, D::Item<'w>)) {
        let state = self.state(world);
        unsafe { visit::<D>(world.catalog(), &state.ids, &state.archetypes, f) }
    }
}

impl<D: ReadOnly> View<D> {
    /// Visit every matching row through a shared world. Several threads may do this at once.
    pub fn each_ref<'w>(&self, world: &'w World, mut f: impl FnMut(D::Item<'w>)) {
        // SAFETY: `D` is read-only.
        unsafe { self.run(world, |_, item| f(item)) }
    }

    /// Visit every matching row through a shared world, along with its entity.
    pub fn each_entity_ref<'w>(&self, world: &'w World, f: impl FnMut(Entity, D::Item<'w>)) {
        // SAFETY: `D` is read-only.
        unsafe { self.run(world, f) }
    }
}

impl<D: Data> std::fmt::Debug for View<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("data", &std::any::type_name::<D>())
            .finish()
    }
}

/// The cached state of one view.
#[derive(Debug)]
pub(crate) struct State {
    /// The components every matching archetype must store.
    mask: Mask,

    /// The component ids in `D::register` order. May repeat read-only ids.
    ids: Vec<component::Id>,

    /// The matching archetypes, in creation order.
    archetypes: Vec<archetype::Id>,
}

/// The live views of one world.
///
/// Slots of destroyed views are left empty and never reused.
#[derive(Debug, Default)]
pub(crate) struct Views {
    states: Vec<Option<State>>,
}

/// Resolve the component ids `D` reads or writes, and the mask of all of them.
///
/// # Panics
/// - If `D` requests a component twice and either request is mutable.
pub(crate) fn resolve<D: Data>(components: &component::Registry) -> (Vec<component::Id>, Mask) {
    let mut access = Vec::new();
    D::register(components, &mut access);
    for (index, first) in access.iter().enumerate() {
        let aliased = access[index + 1..]
            .iter()
            .any(|second| second.id == first.id && (first.mutable || second.mutable));
        if aliased {
            panic!(
                "view {} requests {} more than once with mutable access",
                std::any::type_name::<D>(),
                components.name(first.id)
            );
        }
    }

    let mut mask = Mask::new();
    for a in &access {
        mask.insert(a.id);
    }
    (access.into_iter().map(|a| a.id).collect(), mask)
}

/// Visit every row of the given archetypes.
///
/// # Safety
/// - Every archetype must store each of `ids`, which must come from [`resolve`] for `D`.
/// - Mutably fetched components must not be aliased for 'w.
pub(crate) unsafe fn visit<'w, D: Data>(
    catalog: &'w Catalog,
    ids: &[component::Id],
    archetypes: &[archetype::Id],
    mut f: impl FnMut(Entity, D::Item<'w>),
) {
    for id in archetypes {
        let table = catalog[*id].table();
        if table.is_empty() {
            continue;
        }
        let fetch = unsafe { D::prepare(table, &mut ids.iter().copied()) };
        for (row, entity) in table.entities().iter().enumerate() {
            // SAFETY: The row is in range and each row is visited once.
            f(*entity, unsafe { D::fetch(fetch, Row::new(row)) });
        }
    }
}

impl Views {
    /// Register a view for `D`, matching it against the existing archetypes.
    ///
    /// # Panics
    /// - If `D` requests a component twice and either request is mutable.
    pub(crate) fn create<D: Data>(
        &mut self,
        components: &component::Registry,
        catalog: &Catalog,
        world: u64,
    ) -> View<D> {
        let (ids, mask) = resolve::<D>(components);
        let archetypes = catalog.supporting(&mask);
        let id = Id(self.states.len() as u32);
        debug!(
            "created view {:?} for {} matching {} archetypes",
            id,
            std::any::type_name::<D>(),
            archetypes.len()
        );
        self.states.push(Some(State {
            mask,
            ids,
            archetypes,
        }));

        View {
            id,
            world,
            _data: PhantomData,
        }
    }

    /// Drop the cached state of a view.
    pub(crate) fn destroy(&mut self, id: Id) {
        if let Some(slot) = self.states.get_mut(id.index()) {
            slot.take();
            debug!("destroyed view {:?}", id);
        }
    }

    /// # Panics
    /// - If the view was destroyed. Destroying consumes the view handle, so this is a bug.
    pub(crate) fn state(&self, id: Id) -> &State {
        self.states
            .get(id.index())
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("view {id:?} is not registered"))
    }

    /// Number of live views.
    pub(crate) fn len(&self) -> usize {
        self.states.iter().flatten().count()
    }
}

impl archetype::Observer for Views {
    fn on_archetype_created(&mut self, archetype: &Archetype) {
        for state in self.states.iter_mut().flatten() {
            if archetype.supports(&state.mask) {
                state.archetypes.push(archetype.id());
            }
        }
    }
}
