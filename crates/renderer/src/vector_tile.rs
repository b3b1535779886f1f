//! Assemble the requested layers into one encoded vector tile.

use crate::arrows::wind_arrows_layer;
use crate::clip::{ClipTester, ClippingOptions};
use crate::config::RenderConfig;
use crate::contour::{contour_layer, generate_contours, ContourOptions, Thresholds};
use crate::error::{RenderError, Result};
use crate::mvt::TileWriter;
use crate::points::grid_points_layer;
use grid::{Grid, GridDescriptor};
use tile_common::{DimensionRange, TileCoord};
use tracing::debug;

/// Which layers to put into the tile.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSelection {
    /// Contour levels, or `None` for no contour layer.
    pub contours: Option<Thresholds>,
    pub grid_points: bool,
    /// Requires direction values.
    pub wind_arrows: bool,
}

impl Default for LayerSelection {
    fn default() -> Self {
        Self {
            contours: Some(Thresholds::Interval(2.0)),
            grid_points: false,
            wind_arrows: false,
        }
    }
}

/// Everything needed to render one tile.
#[derive(Debug, Clone)]
pub struct VectorTileRequest<'a> {
    pub tile: TileCoord,
    pub grid: &'a GridDescriptor,
    /// `[rows, columns]` window `values` covers; the whole grid when `None`.
    pub ranges: Option<[DimensionRange; 2]>,
    pub values: &'a [f32],
    /// Direction in degrees for each value, used by the grid and arrow layers.
    pub directions: Option<&'a [f32]>,
    pub layers: LayerSelection,
    pub clipping: Option<&'a ClippingOptions>,
    pub config: RenderConfig,
}

impl<'a> VectorTileRequest<'a> {
    /// Contours at the configured default interval, no clipping.
    pub fn new(tile: TileCoord, grid: &'a GridDescriptor, values: &'a [f32]) -> Self {
        let config = RenderConfig::default();
        Self {
            tile,
            grid,
            ranges: None,
            values,
            directions: None,
            layers: LayerSelection {
                contours: Some(Thresholds::Interval(config.default_interval)),
                ..Default::default()
            },
            clipping: None,
            config,
        }
    }

    pub fn with_ranges(mut self, ranges: [DimensionRange; 2]) -> Self {
        self.ranges = Some(ranges);
        self
    }

    pub fn with_directions(mut self, directions: &'a [f32]) -> Self {
        self.directions = Some(directions);
        self
    }

    pub fn with_layers(mut self, layers: LayerSelection) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_clipping(mut self, clipping: &'a ClippingOptions) -> Self {
        self.clipping = Some(clipping);
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    fn validate(&self) -> Result<()> {
        self.config.validate().map_err(RenderError::InvalidRequest)?;

        if let Some(directions) = self.directions {
            if directions.len() != self.values.len() {
                return Err(RenderError::invalid_request(format!(
                    "{} directions for {} values",
                    directions.len(),
                    self.values.len()
                )));
            }
        }
        if self.layers.wind_arrows && self.directions.is_none() {
            return Err(RenderError::invalid_request("wind arrows need directions"));
        }
        if let Some(Thresholds::Interval(interval)) = self.layers.contours {
            if !(interval > 0.0) {
                return Err(RenderError::invalid_request(format!(
                    "contour interval must be > 0, got {}",
                    interval
                )));
            }
        }
        Ok(())
    }
}

/// Render the requested layers of one tile to vector tile bytes.
pub fn build_vector_tile(request: &VectorTileRequest<'_>) -> Result<Vec<u8>> {
    request.validate()?;
    let config = &request.config;
    let tile = request.tile;

    let grid = Grid::from_descriptor(request.grid, request.ranges)?;
    let clip = match request.clipping {
        Some(options) => ClipTester::from_options(options)?,
        None => None,
    };

    let mut writer = TileWriter::new();
    let mut features = 0;

    if let Some(thresholds) = &request.layers.contours {
        let options = ContourOptions {
            resolution: config.contour_resolution,
            buffer: config.contour_buffer,
            extent: config.extent,
        };
        let levels =
            generate_contours(&grid, request.values, tile, thresholds, &options, clip.as_ref());
        let layer = contour_layer(&levels, config.extent);
        features += layer.features.len();
        writer.write_layer(&layer);
    }

    if request.layers.grid_points {
        let layer = grid_points_layer(
            &grid,
            request.values,
            request.directions,
            tile,
            config.extent,
            config.grid_point_margin,
            clip.as_ref(),
        );
        features += layer.features.len();
        writer.write_layer(&layer);
    }

    if let (true, Some(directions)) = (request.layers.wind_arrows, request.directions) {
        let layer = wind_arrows_layer(
            &grid,
            request.values,
            directions,
            tile,
            config.extent,
            config.arrows_at_zoom(tile.z),
            clip.as_ref(),
        );
        features += layer.features.len();
        writer.write_layer(&layer);
    }

    let layers = writer.layer_count();
    let bytes = writer.finish();
    debug!(
        tile = %tile.cache_key(),
        layers,
        features,
        bytes = bytes.len(),
        "built vector tile"
    );
    Ok(bytes)
}
