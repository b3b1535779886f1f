//! Vector tile rendering for gridded weather data.
//!
//! Implements the tile layers:
//! - Contour lines (marching squares)
//! - Grid points
//! - Wind arrows
//!
//! All layers are written with a self-contained Mapbox Vector Tile encoder
//! and can be restricted to clip polygons.

pub mod arrows;
pub mod clip;
pub mod config;
pub mod contour;
pub mod error;
pub mod mvt;
pub mod points;
pub mod vector_tile;

pub use clip::{ClipTester, ClippingOptions, GeoJson};
pub use config::RenderConfig;
pub use contour::{ContourLevel, ContourOptions, Thresholds};
pub use error::{RenderError, Result};
pub use vector_tile::{build_vector_tile, LayerSelection, VectorTileRequest};
