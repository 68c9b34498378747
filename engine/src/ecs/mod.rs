pub mod archetype;
pub mod component;
pub mod entity;
pub mod error;
pub mod handle;
pub mod storage;
pub(crate) mod util;
pub mod view;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use error::{Error, Result};
pub use handle::{Read, Write};
pub use view::View;
pub use world::{Config, Id as WorldId, World};

/// Derive macro for [`Component`].
pub use ash_macros::Component;
