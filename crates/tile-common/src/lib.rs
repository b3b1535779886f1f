//! Common types and utilities shared across the weather tile crates.

pub mod bbox;
pub mod math;
pub mod range;
pub mod tile;

pub use bbox::{BoundingBox, Center};
pub use range::{full_ranges, DimensionRange};
pub use tile::{lat2tile, lon2tile, tile2lat, tile2lon, TileCoord};
