use std::{
    any::{TypeId, type_name},
    sync::{
        RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

use crate::ecs::{
    component::{Component, ConstructFn, Id, Info, IntoSpec, Spec},
    error::{Error, Result},
};

/// The component registry for a world. Maps component types to ids and ids to [`Info`].
///
/// Reads of the TypeId to Id map are lock-free via `DashMap`; the info list sits behind a
/// `RwLock` that is only written when a type is first seen or gains a constructor. Registration
/// takes `&self` so lookups from shared world borrows can assign ids lazily.
pub struct Registry {
    /// Map from TypeId to component Id.
    type_map: DashMap<TypeId, Id>,

    /// Registered component infos, indexed by id.
    components: RwLock<Vec<Info>>,

    /// Next available component identifier.
    next_id: AtomicU32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a new component registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            components: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Get the id for `C`, assigning the next free id if this is the first time `C` is seen.
    ///
    /// No constructor is recorded. Re-registering an existing type returns its id unchanged.
    pub fn register<C: Component>(&self) -> Id {
        let type_id = TypeId::of::<C>();

        // Fast path: already registered
        if let Some(id) = self.type_map.get(&type_id) {
            return *id;
        }

        // Slow path: use the entry API so two racing registrations agree on one id.
        *self
            .type_map
            .entry(type_id)
            .or_insert_with(|| {
                let id = Id::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                let mut components = self.components.write().unwrap();
                debug_assert_eq!(components.len(), id.index());
                components.push(Info::new::<C>(id));
                id
            })
            .value()
    }

    /// Register `C` with a constructor used when the component is attached without a value.
    ///
    /// If `C` already has a constructor this is a no-op.
    pub fn register_with<C: Component>(&self, ctor: ConstructFn) -> Id {
        let id = self.register::<C>();
        let mut components = self.components.write().unwrap();
        components[id.index()].install_constructor(ctor);
        id
    }

    /// Register `C` using its `Default` implementation as the constructor.
    pub fn register_default<C: Component + Default>(&self) -> Id {
        self.register_with::<C>(Info::constructor(C::default))
    }

    /// Get the id for `C`, if registered.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        self.type_map
            .get(&TypeId::of::<C>())
            .map(|entry| *entry.value())
    }

    /// Get the id for `C`, failing with `UnknownComponent` if it has never been seen.
    #[inline]
    pub fn id_of<C: Component>(&self) -> Result<Id> {
        self.get::<C>()
            .ok_or(Error::UnknownComponent(type_name::<C>()))
    }

    /// Get the info for a component id.
    pub fn info(&self, id: Id) -> Result<Info> {
        let components = self.components.read().unwrap();
        components
            .get(id.index())
            .cloned()
            .ok_or(Error::UnknownComponent("<unregistered component id>"))
    }

    /// Get the info for every id in the spec, in spec order.
    pub fn infos(&self, spec: &Spec) -> Result<Vec<Info>> {
        spec.ids().iter().map(|id| self.info(*id)).collect()
    }

    /// The type name of a registered component, for diagnostics.
    pub fn name(&self, id: Id) -> &'static str {
        self.info(id)
            .map(|info| info.name())
            .unwrap_or("<unregistered component id>")
    }

    /// Build a spec for `IS`, registering any types not seen yet.
    #[inline]
    pub fn spec<IS: IntoSpec>(&self) -> Spec {
        IS::into_spec(self)
    }

    /// Number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.read().unwrap().len()
    }

    /// Returns true if no component types are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use ash_macros::Component;

    use super::*;

    #[derive(Component, Debug, Default, PartialEq)]
    struct Position {
        x: f32,
    }

    #[derive(Component, Debug)]
    struct Velocity();

    #[derive(Component, Debug)]
    struct Health();

    #[test]
    fn ids_follow_registration_order() {
        // Given
        let registry = Registry::new();

        // When
        let pos_id = registry.register::<Position>();
        let vel_id = registry.register::<Velocity>();

        // Then
        assert_eq!(pos_id, Id::new(0));
        assert_eq!(vel_id, Id::new(1));
        assert_eq!(registry.len(), 2);

        // Then - Registering the same type again returns the same id
        assert_eq!(registry.register::<Position>(), pos_id);
        assert_eq!(registry.register_default::<Position>(), pos_id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_component_lookup() {
        let registry = Registry::new();
        registry.register::<Position>();

        assert!(registry.get::<Health>().is_none());
        assert!(matches!(
            registry.id_of::<Health>(),
            Err(Error::UnknownComponent(name)) if name.ends_with("Health")
        ));
        assert!(matches!(
            registry.info(Id::new(9)),
            Err(Error::UnknownComponent(_))
        ));
    }

    #[test]
    fn constructor_installed_on_later_registration() {
        // Given - Lazily registered without constructor
        let registry = Registry::new();
        let id = registry.register::<Position>();
        assert!(!registry.info(id).unwrap().has_constructor());

        // When
        registry.register_default::<Position>();

        // Then
        let info = registry.info(id).unwrap();
        assert!(info.has_constructor());
        assert_eq!(info.id(), id);
    }

    #[test]
    fn infos_follow_spec_order() {
        let registry = Registry::new();
        let pos = registry.register::<Position>();
        let vel = registry.register::<Velocity>();

        let infos = registry.infos(&Spec::new(vec![vel, pos])).unwrap();

        assert_eq!(infos.iter().map(Info::id).collect::<Vec<_>>(), vec![pos, vel]);
    }

    #[test]
    fn concurrent_registration_agrees_on_ids() {
        // Given
        let registry = Arc::new(Registry::new());

        // When - Multiple threads register components concurrently
        let handles: Vec<_> = (0..12)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || match i % 3 {
                    0 => registry.register::<Position>(),
                    1 => registry.register::<Velocity>(),
                    _ => registry.register::<Health>(),
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Then - Same type, same id; three types, three ids
        for (i, id) in results.iter().enumerate() {
            assert_eq!(*id, results[i % 3]);
        }
        assert_eq!(registry.len(), 3);
    }
}
