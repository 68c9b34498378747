use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use ash_ecs::ecs::{Component, Entity, Error, World, WorldId};

#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Component, Debug, Default)]
struct A;

#[derive(Component, Debug, Default)]
struct B;

#[derive(Component, Debug, Default, PartialEq)]
struct C(u32);

fn world() -> World {
    World::new(WorldId::new(0))
}

#[test]
fn attach_then_detach_scenario() {
    // Given
    let mut world = world();
    world.register_component_with(|| Position {
        x: 1.0,
        y: 2.0,
        z: 3.0,
    });
    world.register_component_with(|| Velocity {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    });
    let e0 = world.create();

    // When
    world.add::<Position>(e0).unwrap();
    world.add::<Velocity>(e0).unwrap();

    // Then
    assert_eq!(
        world.component::<Position>(e0),
        Ok(&Position {
            x: 1.0,
            y: 2.0,
            z: 3.0
        })
    );

    // When
    world.remove::<Position>(e0).unwrap();

    // Then
    assert!(!world.has_component::<Position>(e0));
    assert!(world.has_component::<Velocity>(e0));
    assert_eq!(world.component::<Velocity>(e0).unwrap().y, 1.0);
}

#[test]
fn thousand_entities_split_over_two_archetypes() {
    // Given
    let mut world = world();
    world.register_component::<A>();
    world.register_component::<B>();
    world.register_component_with(|| C(7));
    let entities: Vec<Entity> = (0..1000).map(|_| world.create()).collect();

    // When
    for (index, entity) in entities.iter().enumerate() {
        if index % 2 == 0 {
            world.add::<A>(*entity).unwrap();
        } else {
            world.add::<B>(*entity).unwrap();
        }
    }
    for entity in &entities {
        world.add::<C>(*entity).unwrap();
    }
    let view = world.make_view::<&C>();

    // Then
    assert_eq!(view.len(&world), 1000);
    assert_eq!(view.archetype_count(&world), 2);

    let mut visited = HashSet::new();
    view.each_entity(&mut world, |entity, c| {
        assert_eq!(c.0, 7);
        visited.insert(entity);
    });
    assert_eq!(visited.len(), 1000);
    assert!(entities.iter().all(|entity| visited.contains(entity)));
}

#[test]
fn released_entity_reports_invalid() {
    // Given
    let mut world = world();
    let entity = world.spawn(Position::default());

    // When
    world.release(entity).unwrap();

    // Then
    assert_eq!(
        world.component::<Position>(entity),
        Err(Error::InvalidEntity(entity))
    );
    assert!(!world.has_component::<Position>(entity));
    assert!(!world.is_valid(entity));
}

#[test]
fn generation_advances_on_reuse() {
    let mut world = world();
    let old = world.create();
    world.release(old).unwrap();

    let new = world.create();

    assert_eq!(new.id(), old.id());
    assert!(new.generation() > old.generation());
    assert!(!world.is_valid(old));
}

#[test]
fn view_made_early_sees_late_archetypes() {
    // Given - No entity has both components yet
    let mut world = world();
    let view = world.make_view::<(&Position, &Velocity)>();
    assert_eq!(view.archetype_count(&world), 0);

    // When
    let entity = world.spawn((
        Position {
            x: 4.0,
            ..Default::default()
        },
        Velocity::default(),
        C(1),
    ));
    world.spawn(Position::default());

    // Then
    let mut seen = Vec::new();
    view.each_entity(&mut world, |entity, (pos, _)| seen.push((entity, pos.x)));
    assert_eq!(seen, vec![(entity, 4.0)]);
    assert_eq!(view.archetype_count(&world), 1);
}

#[test]
fn view_each_writes_components() {
    // Given
    let mut world = world();
    for i in 0..10 {
        world.spawn((
            Position::default(),
            Velocity {
                x: i as f32,
                y: 1.0,
                z: 0.0,
            },
        ));
    }
    let view = world.make_view::<(&mut Position, &Velocity)>();

    // When
    for _ in 0..2 {
        view.each(&mut world, |(pos, vel)| {
            pos.x += vel.x;
            pos.y += vel.y;
        });
    }

    // Then
    let mut total = 0.0;
    world.each::<&Position>(|pos| total += pos.x + pos.y);
    assert_eq!(total, 2.0 * 45.0 + 2.0 * 10.0);
    world.destroy_view(view);
}

#[test]
fn same_final_set_reaches_same_archetype() {
    // Given
    let mut world = world();
    world.register_component::<A>();
    world.register_component::<B>();
    world.register_component::<C>();
    let first = world.create();
    let second = world.create();

    // When - Two different attach orders
    world.add::<A>(first).unwrap();
    world.add::<(B, C)>(first).unwrap();
    world.add::<C>(second).unwrap();
    world.add::<B>(second).unwrap();
    world.add::<A>(second).unwrap();

    // Then
    let a = world.archetype_of(first).unwrap().unwrap();
    let b = world.archetype_of(second).unwrap().unwrap();
    assert!(std::ptr::eq(a, b));
    assert_eq!(a.mask(), b.mask());
    assert_eq!(a.components().len(), 3);
}

#[test]
fn rows_stay_dense_under_churn() {
    // Given
    let mut world = world();
    world.register_component::<C>();
    let entities: Vec<Entity> = (0..64)
        .map(|i| world.spawn(Position { x: i as f32, y: 0.0, z: 0.0 }))
        .collect();

    // When - Interleave releases and migrations
    for (index, entity) in entities.iter().enumerate() {
        match index % 3 {
            0 => world.release(*entity).unwrap(),
            1 => world.add::<C>(*entity).unwrap(),
            _ => {}
        }
    }

    // Then - Every survivor still resolves to its own value
    for (index, entity) in entities.iter().enumerate() {
        if index % 3 == 0 {
            assert!(!world.is_valid(*entity));
            continue;
        }
        assert_eq!(world.component::<Position>(*entity).unwrap().x, index as f32);
        let location = world.location(*entity).unwrap().unwrap();
        let archetype = world.archetype_of(*entity).unwrap().unwrap();
        assert_eq!(archetype.table().entities()[location.row().index()], *entity);
        for column in archetype.table().columns() {
            assert_eq!(column.len(), archetype.len());
        }
    }
}

#[test]
fn read_only_views_run_concurrently() {
    // Given
    let mut world = world();
    for i in 0..100 {
        world.spawn(Position {
            x: i as f32,
            y: 0.0,
            z: 0.0,
        });
    }
    let view = world.make_view::<&Position>();

    // When
    let sums: Vec<f32> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let mut sum = 0.0;
                    view.each_ref(&world, |pos| sum += pos.x);
                    sum
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    // Then
    assert!(sums.iter().all(|sum| *sum == 4950.0));
}

static LIVE: AtomicUsize = AtomicUsize::new(0);

#[derive(Component, Debug)]
struct Counted;

impl Counted {
    fn new() -> Self {
        LIVE.fetch_add(1, Ordering::SeqCst);
        Counted
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        LIVE.fetch_sub(1, Ordering::SeqCst);
    }
}

#[test]
fn migration_never_leaks_or_double_drops() {
    // Given
    let mut world = world();
    world.register_component::<A>();
    let entities: Vec<Entity> = (0..32).map(|_| world.spawn(Counted::new())).collect();
    assert_eq!(LIVE.load(Ordering::SeqCst), 32);

    // When - Move every entity, then drop values through remove and release
    for entity in &entities {
        world.add::<A>(*entity).unwrap();
    }
    assert_eq!(LIVE.load(Ordering::SeqCst), 32);
    for entity in &entities[..16] {
        world.remove::<Counted>(*entity).unwrap();
    }
    assert_eq!(LIVE.load(Ordering::SeqCst), 16);
    for entity in &entities[16..24] {
        world.release(*entity).unwrap();
    }
    assert_eq!(LIVE.load(Ordering::SeqCst), 8);

    // Then - The rest go with the world
    drop(world);
    assert_eq!(LIVE.load(Ordering::SeqCst), 0);
}
