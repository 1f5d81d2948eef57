//! CPU-side mesh generation.

mod plane;

pub use plane::{grid_columns, GridMesh};
