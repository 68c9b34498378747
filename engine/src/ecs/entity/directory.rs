use crossbeam::queue::SegQueue;
use log::{debug, warn};

use crate::ecs::{
    entity::{Entity, Generation, Id},
    error::{Error, Result},
    storage::Location,
};

/// The directory record for one entity slot.
///
/// The record is the single source of truth for where an entity's data lives. `location` is
/// `None` for entities that have no components attached (and for released slots).
#[derive(Debug, Clone, Copy)]
pub struct Record {
    /// The archetype and row holding the entity's data, if any.
    location: Option<Location>,

    /// The current generation of the slot.
    generation: Generation,

    /// Bumped every time `location` changes. Handles compare against it to decide whether their
    /// cached location is still good.
    epoch: u32,
}

impl Record {
    const fn new() -> Self {
        Self {
            location: None,
            generation: Generation::FIRST,
            epoch: 0,
        }
    }

    /// The storage location of the entity, if it has any components.
    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// The current generation of the slot.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The relocation epoch of the slot.
    #[inline]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

/// A densely indexed table of entity records and the FIFO free-list of released slots.
///
/// The directory never touches archetype storage. Callers remove or move rows first and then
/// report the new location (or the release) here, in the same logical step.
#[derive(Debug, Default)]
pub struct Directory {
    /// One record per slot ever allocated.
    records: Vec<Record>,

    /// Released slots waiting for reuse, oldest first.
    free: SegQueue<Id>,

    /// Number of live entities.
    alive: usize,
}

impl Directory {
    /// Construct an empty directory.
    #[inline]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            free: SegQueue::new(),
            alive: 0,
        }
    }

    /// Create a new entity, reusing the oldest released slot when one is available.
    ///
    /// The generation of a reused slot was already advanced when it was released.
    pub fn create(&mut self) -> Entity {
        self.alive += 1;
        if let Some(id) = self.free.pop() {
            let record = &self.records[id.0 as usize];
            return Entity::new_with_generation(id, record.generation);
        }

        let id = Id(self.records.len() as u32);
        self.records.push(Record::new());
        Entity::new(id)
    }

    /// Release an entity's slot for reuse.
    ///
    /// The record's generation advances, its location is cleared and the slot joins the back of
    /// the free-list. A slot whose generation reaches [`Generation::RETIRED`] is never reused.
    /// The caller must already have removed the entity's row from its archetype.
    pub fn release(&mut self, entity: Entity) -> Result<()> {
        let Some(record) = self.record_mut(entity) else {
            warn!("attempted to release an invalid entity: {:?}", entity);
            return Err(Error::InvalidEntity(entity));
        };
        record.generation = record.generation.next();
        record.location = None;
        record.epoch = record.epoch.wrapping_add(1);
        let retired = record.generation.is_retired();

        if retired {
            debug!("retired entity slot {} after its last generation", entity.index());
        } else {
            self.free.push(entity.id());
        }
        self.alive -= 1;
        Ok(())
    }

    /// Determine if the entity refers to the current occupant of its slot.
    #[inline]
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.record(entity).is_some()
    }

    /// Get the record for a valid entity.
    #[inline]
    pub fn get(&self, entity: Entity) -> Result<&Record> {
        self.record(entity).ok_or(Error::InvalidEntity(entity))
    }

    /// Get the storage location for a valid entity. `Ok(None)` means the entity is valid but has
    /// no components.
    #[inline]
    pub fn location(&self, entity: Entity) -> Result<Option<Location>> {
        self.get(entity).map(Record::location)
    }

    /// Record a new location for a live entity and bump its relocation epoch.
    ///
    /// # Panics
    /// - If the entity is stale. Locations are only ever reported for entities read from
    ///   archetype back-references, which are always live.
    pub fn relocate(&mut self, entity: Entity, location: Location) {
        let record = self
            .record_mut(entity)
            .unwrap_or_else(|| panic!("relocating a stale entity: {:?}", entity));
        record.location = Some(location);
        record.epoch = record.epoch.wrapping_add(1);
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.alive
    }

    /// Returns true if there are no live entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    fn record(&self, entity: Entity) -> Option<&Record> {
        self.records
            .get(entity.index())
            .filter(|record| record.generation == entity.generation())
    }

    fn record_mut(&mut self, entity: Entity) -> Option<&mut Record> {
        self.records
            .get_mut(entity.index())
            .filter(|record| record.generation == entity.generation())
    }
}
