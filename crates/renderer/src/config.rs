//! Configuration for vector tile rendering.

use serde::{Deserialize, Serialize};

/// Tunables for the vector tile layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Integer coordinate space of every layer.
    pub extent: u32,

    /// Lattice cells per tile side used for contour sampling.
    pub contour_resolution: usize,

    /// Extra lattice cells sampled beyond each tile edge.
    pub contour_buffer: usize,

    /// Interval used when a contour request names no levels.
    pub default_interval: f64,

    /// Arrows per tile side from zoom 2 on.
    pub arrows_per_tile: usize,

    /// Tile units outside the tile in which grid points are still emitted.
    pub grid_point_margin: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            extent: 4096,
            contour_resolution: 128,
            contour_buffer: 1,
            default_interval: 2.0,
            arrows_per_tile: 27,
            grid_point_margin: 0,
        }
    }
}

impl RenderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TILE_EXTENT") {
            if let Ok(extent) = val.parse() {
                config.extent = extent;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                config.contour_resolution = resolution;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_BUFFER") {
            if let Ok(buffer) = val.parse() {
                config.contour_buffer = buffer;
            }
        }

        if let Ok(val) = std::env::var("CONTOUR_INTERVAL") {
            if let Ok(interval) = val.parse() {
                config.default_interval = interval;
            }
        }

        if let Ok(val) = std::env::var("ARROWS_PER_TILE") {
            if let Ok(arrows) = val.parse() {
                config.arrows_per_tile = arrows;
            }
        }

        if let Ok(val) = std::env::var("GRID_POINT_MARGIN") {
            if let Ok(margin) = val.parse() {
                config.grid_point_margin = margin;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.extent == 0 {
            return Err("extent must be > 0".to_string());
        }

        if self.contour_resolution == 0 {
            return Err("contour_resolution must be > 0".to_string());
        }

        if !(self.default_interval > 0.0) {
            return Err("default_interval must be > 0".to_string());
        }

        if self.arrows_per_tile == 0 {
            return Err("arrows_per_tile must be > 0".to_string());
        }

        Ok(())
    }

    /// Arrows per tile side at `zoom`; the first two zooms use a denser lattice.
    pub fn arrows_at_zoom(&self, zoom: u32) -> usize {
        match zoom {
            0 => 50,
            1 => 40,
            _ => self.arrows_per_tile,
        }
    }
}
