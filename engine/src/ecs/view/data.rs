use std::{any::TypeId, ptr::NonNull};

use crate::{
    all_tuples,
    ecs::{
        component::{self, Component},
        storage::{Row, Table},
    },
};

/// A component access requested by a view: which component, and whether it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub id: component::Id,
    pub mutable: bool,
}

/// The per-row data a view yields: `&C`, `&mut C` or a (nested) tuple of those.
///
/// # Safety
/// - `register` must push exactly one access per component reference, in the order `prepare`
///   consumes component ids.
/// - `prepare` must only return pointers into the table's columns for the consumed ids.
pub unsafe trait Data {
    /// The item yielded for one row, borrowing the world for `'w`.
    type Item<'w>;

    /// Column base pointers for one table.
    type Fetch: Copy;

    /// Record the component accesses of this data type, registering unseen components.
    fn register(components: &component::Registry, access: &mut Vec<Access>);

    /// Resolve the columns for the next ids in `ids`.
    ///
    /// # Safety
    /// - The table must store every component yielded by `ids`, and each id must be the one
    ///   `register` recorded at the same position.
    unsafe fn prepare(table: &Table, ids: &mut impl Iterator<Item = component::Id>) -> Self::Fetch;

    /// Build the item for one row.
    ///
    /// # Safety
    /// - `row` must be in range for the table `fetch` was prepared from.
    /// - No other live reference may alias a mutably fetched component at this row.
    unsafe fn fetch<'w>(fetch: Self::Fetch, row: Row) -> Self::Item<'w>;
}

/// Data that never hands out mutable references, and so can be iterated through a shared world.
///
/// # Safety
/// - Every access recorded by `register` must be immutable.
pub unsafe trait ReadOnly: Data {}

fn column_ptr<C: Component>(table: &Table, id: component::Id) -> NonNull<C> {
    let Some(column) = table.column(id) else {
        panic!(
            "table has no column for {}",
            std::any::type_name::<C>()
        );
    };
    debug_assert_eq!(column.info().type_id(), TypeId::of::<C>());
    column.base_ptr().cast::<C>()
}

fn next_id(ids: &mut impl Iterator<Item = component::Id>) -> component::Id {
    ids.next()
        .unwrap_or_else(|| panic!("view component ids exhausted"))
}

unsafe impl<C: Component> Data for &C {
    type Item<'w> = &'w C;
    type Fetch = NonNull<C>;

    fn register(components: &component::Registry, access: &mut Vec<Access>) {
        access.push(Access {
            id: components.register::<C>(),
            mutable: false,
        });
    }

    unsafe fn prepare(table: &Table, ids: &mut impl Iterator<Item = component::Id>) -> Self::Fetch {
        column_ptr::<C>(table, next_id(ids))
    }

    unsafe fn fetch<'w>(fetch: Self::Fetch, row: Row) -> Self::Item<'w> {
        unsafe { fetch.add(row.index()).as_ref() }
    }
}

unsafe impl<C: Component> ReadOnly for &C {}

unsafe impl<C: Component> Data for &mut C {
    type Item<'w> = &'w mut C;
    type Fetch = NonNull<C>;

    fn register(components: &component::Registry, access: &mut Vec<Access>) {
        access.push(Access {
            id: components.register::<C>(),
            mutable: true,
        });
    }

    unsafe fn prepare(table: &Table, ids: &mut impl Iterator<Item = component::Id>) -> Self::Fetch {
        column_ptr::<C>(table, next_id(ids))
    }

    unsafe fn fetch<'w>(fetch: Self::Fetch, row: Row) -> Self::Item<'w> {
        unsafe { fetch.add(row.index()).as_mut() }
    }
}

macro_rules! tuple_data {
    ($($name: ident),*) => {
        unsafe impl<$($name: Data),*> Data for ($($name,)*) {
            type Item<'w> = ($($name::Item<'w>,)*);
            type Fetch = ($($name::Fetch,)*);

            fn register(components: &component::Registry, access: &mut Vec<Access>) {
                $(<$name>::register(components, access);)*
            }

            unsafe fn prepare(
                table: &Table,
                ids: &mut impl Iterator<Item = component::Id>,
            ) -> Self::Fetch {
                unsafe { ($(<$name>::prepare(table, ids),)*) }
            }

            #[allow(non_snake_case)]
            unsafe fn fetch<'w>(fetch: Self::Fetch, row: Row) -> Self::Item<'w> {
                let ($($name,)*) = fetch;
                unsafe { ($(<$name as Data>::fetch($name, row),)*) }
            }
        }

        unsafe impl<$($name: ReadOnly),*> ReadOnly for ($($name,)*) {}
    }
}

all_tuples!(tuple_data);

#[cfg(test)]
mod tests {
    use ash_macros::Component;

    use super::*;
    use crate::ecs::{
        component::Registry,
        entity::{Entity, Id},
        storage::{GrowthStrategy, Values},
    };

    #[derive(Component, Debug, PartialEq)]
    struct Position(f32);

    #[derive(Component, Debug, PartialEq)]
    struct Velocity(f32);

    fn access<D: Data>(components: &Registry) -> Vec<Access> {
        let mut access = Vec::new();
        D::register(components, &mut access);
        access
    }

    #[test]
    fn register_records_access_in_order() {
        // Given
        let components = Registry::new();

        // When
        let access = access::<(&mut Velocity, (&Position, &Velocity))>(&components);

        // Then
        let vel = components.get::<Velocity>().unwrap();
        let pos = components.get::<Position>().unwrap();
        assert_eq!(
            access,
            vec![
                Access {
                    id: vel,
                    mutable: true
                },
                Access {
                    id: pos,
                    mutable: false
                },
                Access {
                    id: vel,
                    mutable: false
                },
            ]
        );
    }

    #[test]
    fn fetch_reads_and_writes_rows() {
        // Given
        let components = Registry::new();
        let infos = components
            .infos(&components.spec::<(Position, Velocity)>())
            .unwrap();
        let mut table = Table::new(&infos, GrowthStrategy::default(), 0);
        for i in 0..3u32 {
            table
                .append(
                    Entity::new(Id::from(i)),
                    Values::new(&components, (Position(i as f32), Velocity(1.0))),
                )
                .unwrap();
        }
        let ids: Vec<_> = access::<(&mut Position, &Velocity)>(&components)
            .iter()
            .map(|access| access.id)
            .collect();

        // When
        unsafe {
            let fetch = <(&mut Position, &Velocity)>::prepare(&table, &mut ids.iter().copied());
            for row in 0..table.len() {
                let (pos, vel) = <(&mut Position, &Velocity)>::fetch(fetch, Row::new(row));
                pos.0 += vel.0;
            }
        }

        // Then
        let pos = components.get::<Position>().unwrap();
        assert_eq!(table.get::<Position>(pos, Row::new(0)), Some(&Position(1.0)));
        assert_eq!(table.get::<Position>(pos, Row::new(2)), Some(&Position(3.0)));
    }
}
