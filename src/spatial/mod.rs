//! Spatial indexing

pub mod cell_index;

pub use cell_index::{cell_key, SpatialIndex};
