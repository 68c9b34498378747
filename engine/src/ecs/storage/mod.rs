//! Type-erased columnar storage.
//!
//! Every archetype owns one [`Table`]. A table stores its entities structure-of-arrays style:
//! one [`Column`] per component type plus the list of entities occupying each [`Row`].
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │ Table {Position, Velocity}                     │
//! │   entities: [E1,        E4,        E7       ]  │
//! │   Position: [Pos{1,2},  Pos{3,4},  Pos{5,6} ]  │
//! │   Velocity: [Vel{0,1},  Vel{1,0},  Vel{0,0} ]  │
//! └───────────────────────┬────────────────────────┘
//!                         │
//!                ┌────────▼─────────┐
//!                │  Column          │  typed access, drop, move
//!                └────────┬─────────┘
//!                         │
//!                ┌────────▼─────────┐
//!                │  IndexedMemory   │  raw growable allocation
//!                └──────────────────┘
//! ```
//!
//! ## Row operations
//!
//! Tables stay dense. Removing a row swaps the last row into the hole, and
//! [`Table::remove_row`] / [`Table::move_row`] report which entity moved so the caller can
//! update that entity's directory record in the same step. Tables never talk to the entity
//! directory themselves.
//!
//! Moving a row between tables is the single primitive under every add and remove:
//!
//! - components in both tables are moved bitwise,
//! - components only in the source are dropped,
//! - components only in the target come from a [`Fill`] ([`Construct`], [`Values`] or `()`).

mod column;
mod location;
mod mem;
mod row;
mod table;

pub use column::Column;
pub use location::Location;
pub use mem::{GrowthStrategy, IndexedMemory};
pub use row::Row;
pub use table::{Construct, Fill, Moved, Table, Values};
