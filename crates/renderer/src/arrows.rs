//! Wind arrow layer.
//!
//! Arrows sit on a regular lattice across the tile. Each one points along
//! the flow (direction + 180°) and grows with wind speed.

use crate::clip::ClipTester;
use crate::mvt::{Feature, GeomType, GeometryBuilder, Layer};
use grid::precision::to_fixed;
use grid::SampleGrid;
use tile_common::math::{degrees_to_radians, rotate_point, round_half_up};
use tile_common::{tile2lat, tile2lon, TileCoord};

pub const LAYER_NAME: &str = "wind-arrows";

/// Arrow length as a fraction of the lattice spacing.
pub fn arrow_length(speed: f64) -> f64 {
    match speed {
        s if s < 2.0 => 0.5,
        s if s < 4.0 => 0.55,
        s if s < 6.0 => 0.6,
        s if s < 9.0 => 0.7,
        s if s < 13.0 => 0.75,
        s if s < 15.0 => 0.8,
        s if s < 20.0 => 0.85,
        s if s < 30.0 => 0.9,
        _ => 0.95,
    }
}

/// Head and shaft of one arrow centred at `(cx, cy)`, in tile units.
///
/// Returns `[left barb, tip, right barb]` and `[tip, tail]`.
pub fn arrow_parts(
    cx: f64,
    cy: f64,
    size: f64,
    speed: f64,
    direction: f64,
) -> ([(i32, i32); 3], [(i32, i32); 2]) {
    let rotation = degrees_to_radians(direction + 180.0);
    let half = size * arrow_length(speed) / 2.0;
    let barb_y = cy - (half - size * 0.22);

    let at = |x: f64, y: f64| {
        let (xt, yt) = rotate_point(cx, cy, rotation, x, y);
        (round_half_up(xt) as i32, round_half_up(yt) as i32)
    };

    let tip = at(cx, cy - half);
    (
        [at(cx - 0.13 * size, barb_y), tip, at(cx + 0.13 * size, barb_y)],
        [tip, at(cx, cy + half)],
    )
}

/// Build the arrow layer for `tile`. `arrows` is the lattice count per side.
///
/// Lattice points where speed or direction is `NaN` are skipped.
pub fn wind_arrows_layer<G: SampleGrid>(
    grid: &G,
    speeds: &[f32],
    directions: &[f32],
    tile: TileCoord,
    extent: u32,
    arrows: usize,
    clip: Option<&ClipTester>,
) -> Layer {
    let mut layer = Layer::new(LAYER_NAME, extent);
    let mut builder = GeometryBuilder::new();
    let extent_f = extent as f64;
    let size = extent_f / arrows.max(1) as f64;
    let steps = move || {
        (0..)
            .map(move |k| k as f64 * size)
            .take_while(move |&t| t < extent_f + 1.0)
    };

    let mut id = 0u64;
    for tile_y in steps() {
        let lat = tile2lat(tile.y as f64 + tile_y / extent_f, tile.z);
        for tile_x in steps() {
            let lon = tile2lon(tile.x as f64 + tile_x / extent_f, tile.z);
            let speed = grid.value_at(speeds, lat, lon);
            let direction = grid.value_at(directions, lat, lon);
            if speed.is_nan() || direction.is_nan() {
                continue;
            }
            if clip.is_some_and(|c| !c.contains(lon, lat)) {
                continue;
            }

            let (head, shaft) =
                arrow_parts(tile_x - size / 2.0, tile_y - size / 2.0, size, speed, direction);
            builder.line(&head).line(&shaft);
            layer.push(
                Feature::new(Some(id), GeomType::LineString, builder.finish())
                    .with_property("value", to_fixed(speed, 2))
                    .with_property("direction", to_fixed(direction, 2)),
            );
            id += 1;
        }
    }

    layer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_length_thresholds() {
        assert_eq!(arrow_length(0.0), 0.5);
        assert_eq!(arrow_length(2.0), 0.55);
        assert_eq!(arrow_length(5.9), 0.6);
        assert_eq!(arrow_length(12.0), 0.75);
        assert_eq!(arrow_length(29.9), 0.9);
        assert_eq!(arrow_length(45.0), 0.95);
    }

    #[test]
    fn test_northerly_wind_points_south() {
        // Wind from 0° flows south: the tip is below the centre in tile space.
        let (head, shaft) = arrow_parts(100.0, 100.0, 100.0, 10.0, 0.0);
        let tip = head[1];
        assert_eq!(tip, shaft[0]);
        assert_eq!(tip.0, 100);
        assert!(tip.1 > 100);
        assert!(shaft[1].1 < 100);
    }

    #[test]
    fn test_southerly_wind_points_north() {
        let (head, shaft) = arrow_parts(100.0, 100.0, 100.0, 10.0, 180.0);
        // speed 10 -> length 0.75 -> half 37.5
        assert_eq!(head[1], (100, 63));
        assert_eq!(shaft[1], (100, 138));
    }
}
