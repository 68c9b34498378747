use log::{debug, trace};

use crate::ecs::{
    archetype::{self, Catalog},
    component::{self, Spec},
    entity::{Directory, Entity},
    error::{Error, Result},
    storage::{Fill, Location},
    view::Views,
};

/// The structural state of a world: entity records, archetypes and the views observing them.
///
/// Kept apart from the component registry so a transition can borrow the registry (for example
/// through [`Values`](crate::ecs::storage::Values)) while the storage is borrowed mutably.
pub(crate) struct Storage {
    pub(crate) directory: Directory,
    pub(crate) catalog: Catalog,
    pub(crate) views: Views,
}

impl Storage {
    pub(crate) fn new(catalog: Catalog) -> Self {
        Self {
            directory: Directory::new(),
            catalog,
            views: Views::default(),
        }
    }

    /// The component set of the entity's archetype, or the empty set if it has no components.
    pub(crate) fn spec_of(&self, entity: Entity) -> Result<Spec> {
        Ok(self
            .directory
            .location(entity)?
            .map(|location| self.catalog[location.archetype_id()].spec().clone())
            .unwrap_or_default())
    }

    /// The entity's current component set, provided it holds none of `added`.
    ///
    /// Fails with [`Error::DuplicateComponent`] naming the first of `added` already present.
    pub(crate) fn check_absent(
        &self,
        components: &component::Registry,
        entity: Entity,
        added: &Spec,
    ) -> Result<Spec> {
        let source = self.spec_of(entity)?;
        match added.ids().iter().find(|id| source.contains(**id)) {
            Some(id) => Err(Error::DuplicateComponent {
                entity,
                component: components.name(*id),
            }),
            None => Ok(source),
        }
    }

    /// Move the entity to the archetype of its current components plus `added`, taking the new
    /// values from `fill`.
    ///
    /// Fails with [`Error::DuplicateComponent`] if the entity already has any of `added`.
    pub(crate) fn attach<F: Fill>(
        &mut self,
        components: &component::Registry,
        entity: Entity,
        added: &Spec,
        fill: F,
    ) -> Result<()> {
        let current = self.directory.location(entity)?;
        let source = self.check_absent(components, entity, added)?;

        let target = self
            .catalog
            .get_or_create(&source.union(added), components, &mut self.views)?;
        match current {
            Some(location) => self.migrate(entity, location, target, fill),
            None => {
                let archetype = &mut self.catalog[target];
                let row = archetype.table_mut().append(entity, fill)?;
                trace!("placed {:?} in archetype {:?}", entity, target);
                self.directory.relocate(entity, Location::new(target, row));
                Ok(())
            }
        }
    }

    /// Move the entity to the archetype of its current components minus `removed`, dropping the
    /// removed values. An entity left with no components is released.
    ///
    /// Fails with [`Error::ComponentNotPresent`] if the entity lacks any of `removed`.
    pub(crate) fn detach(
        &mut self,
        components: &component::Registry,
        entity: Entity,
        removed: &Spec,
    ) -> Result<()> {
        let current = self.directory.location(entity)?;
        let source = self.spec_of(entity)?;
        if let Some(id) = removed.ids().iter().find(|id| !source.contains(**id)) {
            return Err(Error::ComponentNotPresent {
                entity,
                component: components.name(*id),
            });
        }
        let Some(location) = current else {
            // No components and nothing to remove.
            return Ok(());
        };

        let remaining = source.difference(removed);
        if remaining.is_empty() {
            debug!("{:?} lost its last component, releasing it", entity);
            return self.release(entity);
        }

        let target = self
            .catalog
            .get_or_create(&remaining, components, &mut self.views)?;
        self.migrate(entity, location, target, ())
    }

    /// Remove the entity's row, if any, and release its directory slot.
    pub(crate) fn release(&mut self, entity: Entity) -> Result<()> {
        if let Some(location) = self.directory.location(entity).ok().flatten() {
            let table = self.catalog[location.archetype_id()].table_mut();
            if let Some(relocated) = table.remove_row(location.row()) {
                self.directory.relocate(relocated, location);
            }
        }
        self.directory.release(entity)
    }

    fn migrate<F: Fill>(
        &mut self,
        entity: Entity,
        from: Location,
        to: archetype::Id,
        fill: F,
    ) -> Result<()> {
        let (source, target) = self.catalog.pair_mut(from.archetype_id(), to);
        let moved = source
            .table_mut()
            .move_row(from.row(), target.table_mut(), fill)?;
        trace!(
            "moved {:?} from archetype {:?} to {:?}",
            entity,
            from.archetype_id(),
            to
        );

        if let Some(relocated) = moved.relocated {
            self.directory.relocate(relocated, from);
        }
        self.directory.relocate(entity, Location::new(to, moved.row));
        Ok(())
    }
}
