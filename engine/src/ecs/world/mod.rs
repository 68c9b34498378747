//! The World is the central container for all entities and components.
//!
//! A `World` owns the entity directory, the component registry, the archetype catalog and the
//! registered views, and is the only place structural changes happen. Every operation that
//! changes which components an entity has moves the entity between archetypes in one step.
//!
//! # Architecture
//!
//! - **Component Registry**: Assigns component ids and holds each type's layout and constructor.
//! - **Entity Directory**: Generation checked records of where each entity's row lives.
//! - **Catalog**: One archetype (table) per distinct component set.
//! - **Views**: Cached archetype lists, kept current as archetypes are created.
//!
//! # Example
//!
//! ```ignore
//! use ash_ecs::ecs::{World, WorldId};
//!
//! let mut world = World::new(WorldId::new(1));
//!
//! let entity = world.spawn((Position { x: 0.0, y: 0.0 }, Velocity { dx: 1.0, dy: 0.0 }));
//! world.each::<(&mut Position, &Velocity)>(|(pos, vel)| pos.x += vel.dx);
//! assert_eq!(world.component::<Position>(entity)?.x, 1.0);
//!
//! world.release(entity)?;
//! ```

mod config;
mod storage;

use std::{
    any::type_name,
    sync::atomic::{AtomicU64, Ordering},
};

use log::debug;

pub use config::Config;

use crate::ecs::{
    archetype::{Archetype, Catalog},
    component::{self, Component, Info, IntoSpec, Set},
    entity::{Directory, Entity},
    error::{Error, Result},
    handle::{Read, Write},
    storage::{Construct, Location, Values},
    view::{self, Data, View, Views},
};

use self::storage::Storage;

/// Source of the per-instance token views and handles check against.
static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

/// A world identifier. This is a unique identifier for a world in the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a new world identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

/// The World is the central container for all entities and their components.
///
/// Structural operations take `&mut self`. Reads through [`View::each_ref`], [`Read`] handles and
/// [`World::component`] take `&self`, so a shared world can be read from several threads at once.
pub struct World {
    /// The world's user facing identifier.
    id: Id,

    /// Process-unique token distinguishing this world from every other instance.
    instance: u64,

    /// The registry of every component type this world has seen.
    components: component::Registry,

    /// Entity records, archetypes and views.
    storage: Storage,
}

impl World {
    pub fn new(id: Id) -> Self {
        Self::with_config(id, Config::default())
    }

    /// Create a world whose archetype tables use the given growth and initial capacity.
    pub fn with_config(id: Id, config: Config) -> Self {
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        debug!("created world {:?} with {:?}", id, config);
        Self {
            id,
            instance,
            components: component::Registry::new(),
            storage: Storage::new(Catalog::new(config.growth, config.initial_capacity)),
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn components(&self) -> &component::Registry {
        &self.components
    }

    #[inline]
    pub fn directory(&self) -> &Directory {
        &self.storage.directory
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.storage.catalog
    }

    #[inline]
    pub(crate) fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.storage.catalog
    }

    #[inline]
    pub(crate) fn views(&self) -> &Views {
        &self.storage.views
    }

    #[inline]
    pub(crate) fn instance(&self) -> u64 {
        self.instance
    }

    /// Create a new entity with no components.
    #[inline]
    pub fn create(&mut self) -> Entity {
        self.storage.directory.create()
    }

    /// Create a new entity holding the given component values.
    ///
    /// # Panics
    /// - If the set names a component type more than once.
    pub fn spawn<S: Set>(&mut self, values: S) -> Entity {
        let entity = self.create();
        if let Err(err) = self.insert(entity, values) {
            panic!("cannot spawn {}: {err}", type_name::<S>());
        }
        entity
    }

    /// Release an entity, dropping its components and freeing its slot for reuse.
    ///
    /// Another entity in the same archetype may be relocated to fill the vacated row.
    pub fn release(&mut self, entity: Entity) -> Result<()> {
        self.storage.release(entity)
    }

    /// Determine if the entity is live in this world.
    #[inline]
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.storage.directory.is_valid(entity)
    }

    /// Register `C` with its `Default` implementation as its constructor, so it can be attached
    /// without a value through [`World::add`].
    pub fn register_component<C: Component + Default>(&mut self) -> component::Id {
        self.components.register_default::<C>()
    }

    /// Register `C` with a custom constructor. Has no effect on the constructor if `C` already
    /// has one.
    pub fn register_component_with<C: Component>(
        &mut self,
        ctor: impl Fn() -> C + Send + Sync + 'static,
    ) -> component::Id {
        self.components.register_with::<C>(Info::constructor(ctor))
    }

    /// Attach default-constructed components to an entity.
    ///
    /// None of `S` may already be present, which is checked first, and every component in `S`
    /// must have a registered constructor. On error the entity is unchanged.
    pub fn add<S: IntoSpec>(&mut self, entity: Entity) -> Result<()> {
        self.storage.directory.location(entity)?;
        let added = self.components.spec::<S>();
        if added.is_empty() {
            return Ok(());
        }
        self.storage
            .check_absent(&self.components, entity, &added)?;
        self.check_constructors(added.ids())?;
        self.storage
            .attach(&self.components, entity, &added, Construct)
    }

    /// Attach component values to an entity. None of them may already be present.
    pub fn insert<S: Set>(&mut self, entity: Entity, values: S) -> Result<()> {
        self.storage.directory.location(entity)?;
        let added = self.components.spec::<S>();
        if added.len() != S::LEN {
            return Err(Error::DuplicateComponent {
                entity,
                component: type_name::<S>(),
            });
        }
        if added.is_empty() {
            return Ok(());
        }
        self.storage.attach(
            &self.components,
            entity,
            &added,
            Values::new(&self.components, values),
        )
    }

    /// Make sure an entity has every component in `S`, default-constructing the ones it lacks.
    ///
    /// Components already present keep their values.
    pub fn reserve<S: IntoSpec>(&mut self, entity: Entity) -> Result<()> {
        let current = self.storage.spec_of(entity)?;
        let missing = self.components.spec::<S>().difference(&current);
        if missing.is_empty() {
            return Ok(());
        }
        self.check_constructors(missing.ids())?;
        self.storage
            .attach(&self.components, entity, &missing, Construct)
    }

    /// Detach components from an entity, dropping their values. Every component in `S` must be
    /// present.
    ///
    /// An entity left with no components is released.
    pub fn remove<S: IntoSpec>(&mut self, entity: Entity) -> Result<()> {
        self.storage.directory.location(entity)?;
        let removed = self.components.spec::<S>();
        if removed.is_empty() {
            return Ok(());
        }
        self.storage.detach(&self.components, entity, &removed)
    }

    /// Borrow component `C` of an entity.
    pub fn component<C: Component>(&self, entity: Entity) -> Result<&C> {
        let (id, location) = self.locate::<C>(entity)?;
        self.storage.catalog[location.archetype_id()]
            .table()
            .get::<C>(id, location.row())
            .ok_or_else(|| not_present::<C>(entity))
    }

    /// Mutably borrow component `C` of an entity.
    pub fn component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        let (id, location) = self.locate::<C>(entity)?;
        self.storage.catalog[location.archetype_id()]
            .table_mut()
            .get_mut::<C>(id, location.row())
            .ok_or_else(|| not_present::<C>(entity))
    }

    /// Returns true if the entity is live and has component `C`.
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.locate::<C>(entity).is_ok()
    }

    /// A self revalidating read handle to component `C` of an entity.
    pub fn read<C: Component>(&self, entity: Entity) -> Result<Read<C>> {
        Read::new(self, entity)
    }

    /// A self revalidating write handle to component `C` of an entity.
    pub fn write<C: Component>(&self, entity: Entity) -> Result<Write<C>> {
        Write::new(self, entity)
    }

    /// Register a view over every entity holding the components `D` asks for.
    ///
    /// The view is matched against every existing archetype now, and against every archetype
    /// created later as it is created.
    ///
    /// # Panics
    /// - If `D` requests a component more than once and any of the requests is mutable.
    pub fn make_view<D: Data>(&mut self) -> View<D> {
        self.storage
            .views
            .create::<D>(&self.components, &self.storage.catalog, self.instance)
    }

    /// Unregister a view.
    ///
    /// # Panics
    /// - If the view belongs to another world.
    pub fn destroy_view<D: Data>(&mut self, view: View<D>) {
        assert_eq!(
            view.world(),
            self.instance,
            "view destroyed through a world other than the one that created it"
        );
        self.storage.views.destroy(view.id());
    }

    /// Number of registered views.
    #[inline]
    pub fn view_count(&self) -> usize {
        self.storage.views.len()
    }

    /// Visit every entity holding the components `D` asks for, without registering a view.
    ///
    /// # Panics
    /// - If `D` requests a component more than once and any of the requests is mutable.
    pub fn each<'w, D: Data>(&'w mut self, mut f: impl FnMut(D::Item<'w>)) {
        let world: &'w World = self;
        let (ids, mask) = view::resolve::<D>(&world.components);
        let archetypes = world.storage.catalog.supporting(&mask);
        // SAFETY: The world is borrowed exclusively for 'w, `ids` come from `resolve` and every
        // archetype supports the mask.
        unsafe {
            view::visit::<D>(&world.storage.catalog, &ids, &archetypes, |_, item| f(item));
        }
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.directory.len()
    }

    /// Returns true if there are no live entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.directory.is_empty()
    }

    /// Number of archetypes created so far.
    #[inline]
    pub fn archetype_count(&self) -> usize {
        self.storage.catalog.len()
    }

    /// Where the entity's row lives. `Ok(None)` for a live entity with no components.
    #[inline]
    pub fn location(&self, entity: Entity) -> Result<Option<Location>> {
        self.storage.directory.location(entity)
    }

    /// The archetype holding the entity. `Ok(None)` for a live entity with no components.
    pub fn archetype_of(&self, entity: Entity) -> Result<Option<&Archetype>> {
        Ok(self
            .location(entity)?
            .map(|location| &self.storage.catalog[location.archetype_id()]))
    }

    fn locate<C: Component>(&self, entity: Entity) -> Result<(component::Id, Location)> {
        let location = self.storage.directory.location(entity)?;
        let id = self.components.id_of::<C>()?;
        location
            .filter(|location| self.storage.catalog[location.archetype_id()].contains(id))
            .map(|location| (id, location))
            .ok_or_else(|| not_present::<C>(entity))
    }

    fn check_constructors(&self, ids: &[component::Id]) -> Result<()> {
        for id in ids {
            let info = self.components.info(*id)?;
            if !info.has_constructor() {
                return Err(Error::MissingConstructor(info.name()));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("entities", &self.len())
            .field("components", &self.components.len())
            .field("archetypes", &self.archetype_count())
            .field("views", &self.view_count())
            .finish()
    }
}

fn not_present<C: Component>(entity: Entity) -> Error {
    Error::ComponentNotPresent {
        entity,
        component: type_name::<C>(),
    }
}
