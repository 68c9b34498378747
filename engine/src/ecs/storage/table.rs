use crate::ecs::{
    component::{self, Component, Info, Registry, Set},
    entity::Entity,
    error::{Error, Result},
    storage::{Column, Row, mem::GrowthStrategy},
};

/// Columnar storage for every entity of one archetype.
///
/// One [`Column`] per component, ordered by component id, plus the entity living in each row.
///
/// # Invariants
/// - `entities.len()` equals the length of every column.
/// - Row `n` of every column belongs to `entities[n]`.
pub struct Table {
    /// The entity stored in each row.
    entities: Vec<Entity>,

    /// The component columns, ascending by component id.
    columns: Vec<Column>,
}

/// The outcome of moving a row out of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
    /// The row the entity now occupies in the target table.
    pub row: Row,

    /// The entity that was swapped into the vacated source row, if any. Its directory record
    /// must be updated to the vacated row.
    pub relocated: Option<Entity>,
}

impl Table {
    /// Create an empty table with one column per component info.
    ///
    /// The infos must be sorted by id and free of duplicates, which a [`Spec`](component::Spec)
    /// guarantees.
    pub fn new(infos: &[Info], growth: GrowthStrategy, capacity: usize) -> Self {
        debug_assert!(infos.windows(2).all(|pair| pair[0].id() < pair[1].id()));
        Self {
            entities: Vec::with_capacity(capacity),
            columns: infos
                .iter()
                .map(|info| Column::new(info.clone(), growth, capacity))
                .collect(),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The entity in each row.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Position of the column storing component `id`.
    #[inline]
    pub fn column_index(&self, id: component::Id) -> Option<usize> {
        self.columns
            .binary_search_by_key(&id, |column| column.info().id())
            .ok()
    }

    #[inline]
    pub fn column(&self, id: component::Id) -> Option<&Column> {
        self.column_index(id).map(|index| &self.columns[index])
    }

    #[inline]
    pub fn column_mut(&mut self, id: component::Id) -> Option<&mut Column> {
        self.column_index(id).map(move |index| &mut self.columns[index])
    }

    /// Typed access to the component `id` of the entity at `row`.
    pub fn get<C: Component>(&self, id: component::Id, row: Row) -> Option<&C> {
        self.column(id)?.get::<C>(row)
    }

    /// Typed mutable access to the component `id` of the entity at `row`.
    pub fn get_mut<C: Component>(&mut self, id: component::Id, row: Row) -> Option<&mut C> {
        self.column_mut(id)?.get_mut::<C>(row)
    }

    /// Append a row for `entity`, filling every column from `fill`.
    ///
    /// Fails without touching the table if `fill` cannot produce a value for every column.
    pub fn append<F: Fill>(&mut self, entity: Entity, fill: F) -> Result<Row> {
        fill.fill(self, |_| false)?;
        self.entities.push(entity);

        #[cfg(debug_assertions)]
        self.verify_invariants();

        Ok(Row::new(self.entities.len() - 1))
    }

    /// Drop the row's values and swap the last row into its place.
    ///
    /// Returns the entity that moved into `row`, if the removed row was not the last one.
    pub fn remove_row(&mut self, row: Row) -> Option<Entity> {
        for column in self.columns.iter_mut() {
            column.swap_remove_drop(row);
        }
        self.entities.swap_remove(row.index());

        #[cfg(debug_assertions)]
        self.verify_invariants();

        self.entities.get(row.index()).copied()
    }

    /// Move the entity at `row` into `target`.
    ///
    /// Components both tables store are moved. Components only this table stores are dropped.
    /// Components only the target stores come from `fill`, which runs first: if it fails neither
    /// table has been touched.
    pub fn move_row<F: Fill>(&mut self, row: Row, target: &mut Table, fill: F) -> Result<Moved> {
        fill.fill(target, |id| self.column_index(id).is_some())?;

        for column in self.columns.iter_mut() {
            match target.column_index(column.info().id()) {
                Some(index) => {
                    // SAFETY: The source value is moved into the target and then forgotten by
                    // the swap-remove, so it is owned exactly once.
                    unsafe {
                        target.columns[index].push_from(column.ptr(row));
                        column.swap_remove_forget(row);
                    }
                }
                None => column.swap_remove_drop(row),
            }
        }

        let entity = self.entities.swap_remove(row.index());
        target.entities.push(entity);

        #[cfg(debug_assertions)]
        {
            self.verify_invariants();
            target.verify_invariants();
        }

        Ok(Moved {
            row: Row::new(target.entities.len() - 1),
            relocated: self.entities.get(row.index()).copied(),
        })
    }

    #[cfg(debug_assertions)]
    fn verify_invariants(&self) {
        for column in &self.columns {
            assert_eq!(
                column.len(),
                self.entities.len(),
                "column {} has {} rows but the table has {} entities",
                column.info().name(),
                column.len(),
                self.entities.len()
            );
        }
    }
}

impl component::Target for Table {
    fn apply<C: Component>(&mut self, id: component::Id, value: C) {
        let Some(column) = self.column_mut(id) else {
            panic!("table has no column for {}", std::any::type_name::<C>());
        };
        column.push(value);
    }
}

/// A source of values for the columns a row gains when it is appended or moved into a table.
pub trait Fill {
    /// Push exactly one value onto each of the table's columns whose component is not
    /// `present`. Present components are moved in by the caller.
    ///
    /// Must either fail before pushing anything or push onto every such column.
    fn fill(self, table: &mut Table, present: impl Fn(component::Id) -> bool) -> Result<()>;
}

/// Fills nothing. For moves whose target stores a subset of the source's components.
impl Fill for () {
    fn fill(self, table: &mut Table, present: impl Fn(component::Id) -> bool) -> Result<()> {
        debug_assert!(
            table.columns.iter().all(|column| present(column.info().id())),
            "no values for the columns the row gains"
        );
        Ok(())
    }
}

/// Fills every column from its component's registered constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Construct;

impl Fill for Construct {
    fn fill(self, table: &mut Table, present: impl Fn(component::Id) -> bool) -> Result<()> {
        if let Some(missing) = table
            .columns
            .iter()
            .map(Column::info)
            .find(|info| !present(info.id()) && !info.has_constructor())
        {
            return Err(Error::MissingConstructor(missing.name()));
        }
        for column in table.columns.iter_mut() {
            if !present(column.info().id()) {
                column.push_constructed()?;
            }
        }
        Ok(())
    }
}

/// Fills columns from the values of a component [`Set`].
pub struct Values<'r, S> {
    registry: &'r Registry,
    set: S,
}

impl<'r, S: Set> Values<'r, S> {
    pub fn new(registry: &'r Registry, set: S) -> Self {
        Self { registry, set }
    }
}

impl<S: Set> Fill for Values<'_, S> {
    fn fill(self, table: &mut Table, present: impl Fn(component::Id) -> bool) -> Result<()> {
        debug_assert_eq!(
            table
                .columns
                .iter()
                .filter(|column| !present(column.info().id()))
                .count(),
            S::LEN
        );
        self.set.apply(self.registry, table);
        Ok(())
    }
}
