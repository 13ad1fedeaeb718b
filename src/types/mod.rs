//! Data types for the table engine.

mod geometry;
mod node;
mod selection;
mod serialized;

pub use geometry::*;
pub use node::*;
pub use selection::*;
pub use serialized::*;
