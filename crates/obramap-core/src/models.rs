//! Domain models shared across the obramap crates.

pub mod geometry;
pub mod obra;
pub mod position;

pub use geometry::{Geometry, GeometryType};
pub use obra::Obra;
pub use position::{Coordinate, PositionSample};
