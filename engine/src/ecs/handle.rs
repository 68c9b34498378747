//! Generation checked, self revalidating accessors to one entity's component.
//!
//! A handle caches where the component lived the last time it was resolved, together with the
//! entity record's relocation epoch at that time. Every access compares the cached epoch with the
//! live one and re-resolves through the entity directory when the entity has moved. A released
//! entity fails with [`Error::InvalidEntity`] instead of dangling.
//!
//! ```ignore
//! let health = world.write::<Health>(entity)?;
//! health.get_mut(&mut world)?.value -= 10;
//! world.add::<Poisoned>(entity)?; // entity moves to another archetype
//! assert_eq!(health.get(&world)?.value, 90);
//! ```

use std::{any::type_name, cell::Cell, fmt, marker::PhantomData};

use crate::ecs::{
    component::{self, Component},
    entity::Entity,
    error::{Error, Result},
    storage::Location,
    world::World,
};

#[derive(Debug, Clone, Copy)]
struct Cache {
    epoch: u32,
    location: Location,
}

/// The resolution logic shared by both handle kinds.
struct Handle<C: Component> {
    entity: Entity,
    id: component::Id,
    world: u64,
    cache: Cell<Cache>,
    _component: PhantomData<fn() -> C>,
}

impl<C: Component> Handle<C> {
    fn new(world: &World, entity: Entity) -> Result<Self> {
        let id = world.components().id_of::<C>()?;
        let record = world.directory().get(entity)?;
        let location = Self::locate(world, entity, id, record.location())?;
        Ok(Self {
            entity,
            id,
            world: world.instance(),
            cache: Cell::new(Cache {
                epoch: record.epoch(),
                location,
            }),
            _component: PhantomData,
        })
    }

    /// The current location of the component, re-resolving if the entity moved.
    fn resolve(&self, world: &World) -> Result<Location> {
        assert_eq!(
            self.world,
            world.instance(),
            "handle used with a world other than the one that created it"
        );
        let record = world.directory().get(self.entity)?;
        let cache = self.cache.get();
        if record.epoch() == cache.epoch {
            return Ok(cache.location);
        }

        let location = Self::locate(world, self.entity, self.id, record.location())?;
        self.cache.set(Cache {
            epoch: record.epoch(),
            location,
        });
        Ok(location)
    }

    fn locate(
        world: &World,
        entity: Entity,
        id: component::Id,
        location: Option<Location>,
    ) -> Result<Location> {
        location
            .filter(|location| world.catalog()[location.archetype_id()].contains(id))
            .ok_or(Error::ComponentNotPresent {
                entity,
                component: type_name::<C>(),
            })
    }

    fn get<'w>(&self, world: &'w World) -> Result<&'w C> {
        let location = self.resolve(world)?;
        world.catalog()[location.archetype_id()]
            .table()
            .get::<C>(self.id, location.row())
            .ok_or_else(|| self.not_present())
    }

    fn get_mut<'w>(&self, world: &'w mut World) -> Result<&'w mut C> {
        let location = self.resolve(world)?;
        world
            .catalog_mut()
            .get_mut(location.archetype_id())
            .and_then(|archetype| archetype.table_mut().get_mut::<C>(self.id, location.row()))
            .ok_or_else(|| self.not_present())
    }

    fn not_present(&self) -> Error {
        Error::ComponentNotPresent {
            entity: self.entity,
            component: type_name::<C>(),
        }
    }
}

impl<C: Component> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity,
            id: self.id,
            world: self.world,
            cache: Cell::new(self.cache.get()),
            _component: PhantomData,
        }
    }
}

/// A read handle to component `C` of one entity.
pub struct Read<C: Component>(Handle<C>);

impl<C: Component> Read<C> {
    pub(crate) fn new(world: &World, entity: Entity) -> Result<Self> {
        Handle::new(world, entity).map(Self)
    }

    /// The entity the handle points at.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.0.entity
    }

    /// Borrow the component. Calls [`Component::mark_read`].
    pub fn get<'w>(&self, world: &'w World) -> Result<&'w C> {
        let value = self.0.get(world)?;
        value.mark_read();
        Ok(value)
    }
}

impl<C: Component> Clone for Read<C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C: Component> fmt::Debug for Read<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Read")
            .field("entity", &self.0.entity)
            .field("component", &type_name::<C>())
            .finish()
    }
}

/// A write handle to component `C` of one entity.
pub struct Write<C: Component>(Handle<C>);

impl<C: Component> Write<C> {
    pub(crate) fn new(world: &World, entity: Entity) -> Result<Self> {
        Handle::new(world, entity).map(Self)
    }

    /// The entity the handle points at.
    #[inline]
    pub fn entity(&self) -> Entity {
        self.0.entity
    }

    /// Borrow the component. Calls [`Component::mark_read`].
    pub fn get<'w>(&self, world: &'w World) -> Result<&'w C> {
        let value = self.0.get(world)?;
        value.mark_read();
        Ok(value)
    }

    /// Borrow the component mutably. Calls [`Component::mark_write`].
    pub fn get_mut<'w>(&self, world: &'w mut World) -> Result<&'w mut C> {
        let value = self.0.get_mut(world)?;
        value.mark_write();
        Ok(value)
    }
}

impl<C: Component> Clone for Write<C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<C: Component> fmt::Debug for Write<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Write")
            .field("entity", &self.0.entity)
            .field("component", &type_name::<C>())
            .finish()
    }
}
