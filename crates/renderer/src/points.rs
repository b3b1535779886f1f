//! Grid point layer: one point feature per grid cell inside the tile.

use crate::clip::ClipTester;
use crate::mvt::{Feature, GeomType, GeometryBuilder, Layer};
use grid::precision::to_fixed;
use grid::SampleGrid;
use std::ops::ControlFlow;
use tile_common::{lat2tile, lon2tile, TileCoord};

pub const LAYER_NAME: &str = "grid";

/// Tile coordinate of a world position on `axis` (tile index `origin`).
#[inline]
fn tile_offset(world: f64, extent: u32, origin: u32) -> i64 {
    (world * extent as f64).floor() as i64 - origin as i64 * extent as i64
}

/// Emit every grid point that falls within the tile, widened by `margin`
/// tile units. Points whose value is `NaN` are skipped.
pub fn grid_points_layer<G: SampleGrid>(
    grid: &G,
    values: &[f32],
    directions: Option<&[f32]>,
    tile: TileCoord,
    extent: u32,
    margin: u32,
    clip: Option<&ClipTester>,
) -> Layer {
    let mut layer = Layer::new(LAYER_NAME, extent);
    let mut builder = GeometryBuilder::new();
    let low = -(margin as i64);
    let high = extent as i64 + margin as i64;

    grid.for_each_point(|index, lat, lon| {
        let py = tile_offset(lat2tile(lat, tile.z), extent, tile.y);
        if py <= low || py > high {
            return ControlFlow::Continue(());
        }
        let px = tile_offset(lon2tile(lon, tile.z), extent, tile.x);
        if px <= low || px > high {
            return ControlFlow::Continue(());
        }
        let value = match values.get(index) {
            Some(v) if !v.is_nan() => *v as f64,
            _ => return ControlFlow::Continue(()),
        };
        if clip.is_some_and(|c| !c.contains(lon, lat)) {
            return ControlFlow::Continue(());
        }

        builder.points(&[(px as i32, py as i32)]);
        let mut feature = Feature::new(Some(index as u64), GeomType::Point, builder.finish())
            .with_property("value", to_fixed(value, 2));
        if let Some(direction) = directions.and_then(|d| d.get(index)) {
            feature = feature.with_property("direction", *direction as f64);
        }
        layer.push(feature);
        ControlFlow::Continue(())
    });

    layer
}
