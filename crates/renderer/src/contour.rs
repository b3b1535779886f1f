//! Contour line (isoline) extraction using marching squares.
//!
//! The tile is sampled on a regular lattice of `resolution × resolution`
//! cells plus a buffer ring beyond the tile edges, so lines leaving one tile
//! continue seamlessly in its neighbour. Every cell is classified against
//! each threshold it spans, and the resulting edge segments are stitched
//! into polylines keyed by the lattice edge they end on.
//!
//! Stitching keeps fragments in an arena; `by_start` / `by_end` map an
//! edge index to the fragment whose open end lies on that edge.

use crate::clip::ClipTester;
use crate::mvt::{Feature, GeomType, GeometryBuilder, Layer};
use grid::SampleGrid;
use std::collections::{HashMap, VecDeque};
use tile_common::math::round_half_up;
use tile_common::{tile2lat, tile2lon, TileCoord};
use tracing::debug;

pub const LAYER_NAME: &str = "contours";

/// Feature ids of a level are offset so negative levels stay positive.
const LEVEL_ID_OFFSET: f64 = 1_000_000.0;

/// Edge midpoint on a 3×3 cell sub-lattice: `[x, y]` with 0 = left/top,
/// 1 = middle, 2 = right/bottom.
type EdgePoint = [u8; 2];

/// Segments per corner code `tl<<3 | tr<<2 | br<<1 | bl`, each `[start, end]`.
///
/// Codes 5 and 10 are saddles and always yield two separate segments.
#[rustfmt::skip]
const CASES: [&[[EdgePoint; 2]]; 16] = [
    &[],
    &[[[1, 2], [0, 1]]],
    &[[[2, 1], [1, 2]]],
    &[[[2, 1], [0, 1]]],
    &[[[1, 0], [2, 1]]],
    &[[[1, 2], [0, 1]], [[1, 0], [2, 1]]],
    &[[[1, 0], [1, 2]]],
    &[[[1, 0], [0, 1]]],
    &[[[0, 1], [1, 0]]],
    &[[[1, 2], [1, 0]]],
    &[[[0, 1], [1, 0]], [[2, 1], [1, 2]]],
    &[[[2, 1], [1, 0]]],
    &[[[0, 1], [2, 1]]],
    &[[[1, 2], [2, 1]]],
    &[[[0, 1], [1, 2]]],
    &[],
];

/// Segments for one corner code.
pub fn cell_segments(code: usize) -> &'static [[EdgePoint; 2]] {
    CASES.get(code).copied().unwrap_or(&[])
}

/// Corner code of a cell; a corner is set when its value is `>= threshold`.
#[inline]
pub fn corner_code(tl: f64, tr: f64, br: f64, bl: f64, threshold: f64) -> usize {
    ((tl >= threshold) as usize) << 3
        | ((tr >= threshold) as usize) << 2
        | ((br >= threshold) as usize) << 1
        | (bl >= threshold) as usize
}

/// Which contour levels to trace.
#[derive(Debug, Clone, PartialEq)]
pub enum Thresholds {
    /// Every multiple of the interval spanned by a cell.
    Interval(f64),
    /// An explicit list of levels.
    Levels(Vec<f64>),
}

/// Sampling geometry of the contour lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourOptions {
    /// Cells per tile side.
    pub resolution: usize,
    /// Cells sampled beyond each tile edge.
    pub buffer: usize,
    /// Tile coordinate extent.
    pub extent: u32,
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            resolution: 128,
            buffer: 1,
            extent: 4096,
        }
    }
}

/// All polylines traced for one level, in tile coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevel {
    pub level: f64,
    pub lines: Vec<Vec<(i32, i32)>>,
}

/// Field values on the contour lattice.
///
/// Lattice point `(c, r)` for `c, r` in `-buffer..resolution + buffer` sits
/// at tile fraction `(c / resolution, r / resolution)`.
#[derive(Debug, Clone)]
pub struct Lattice {
    resolution: usize,
    buffer: usize,
    side: usize,
    values: Vec<f64>,
    mask: Option<Vec<bool>>,
}

impl Lattice {
    /// Wrap pre-sampled values, row-major with `resolution + 2 * buffer` per side.
    pub fn from_values(resolution: usize, buffer: usize, values: Vec<f64>) -> Option<Self> {
        let side = resolution + 2 * buffer;
        if resolution == 0 || values.len() != side * side {
            return None;
        }
        Some(Self {
            resolution,
            buffer,
            side,
            values,
            mask: None,
        })
    }

    /// Sample `grid` over the lattice of `tile`.
    pub fn sample<G: SampleGrid>(
        grid: &G,
        values: &[f32],
        tile: TileCoord,
        options: &ContourOptions,
    ) -> Self {
        let resolution = options.resolution.max(1);
        let buffer = options.buffer;
        let side = resolution + 2 * buffer;
        let n = resolution as f64;

        let lons: Vec<f64> = (0..side)
            .map(|i| tile2lon(tile.x as f64 + (i as f64 - buffer as f64) / n, tile.z))
            .collect();

        let mut field = Vec::with_capacity(side * side);
        for j in 0..side {
            let lat = tile2lat(tile.y as f64 + (j as f64 - buffer as f64) / n, tile.z);
            for &lon in &lons {
                field.push(grid.value_at(values, lat, lon));
            }
        }

        Self {
            resolution,
            buffer,
            side,
            values: field,
            mask: None,
        }
    }

    /// Restrict tracing to cells whose top-left corner passes `clip`.
    pub fn with_clip(mut self, tile: TileCoord, clip: &ClipTester) -> Self {
        let n = self.resolution as f64;
        let offset = self.buffer as f64;
        let mut mask = Vec::with_capacity(self.values.len());
        for j in 0..self.side {
            let lat = tile2lat(tile.y as f64 + (j as f64 - offset) / n, tile.z);
            for i in 0..self.side {
                let lon = tile2lon(tile.x as f64 + (i as f64 - offset) / n, tile.z);
                mask.push(clip.contains(lon, lat));
            }
        }
        self.mask = Some(mask);
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.side + i]
    }

    #[inline]
    fn sampled(&self, i: usize, j: usize) -> bool {
        match &self.mask {
            Some(mask) => mask[j * self.side + i],
            None => true,
        }
    }
}

#[derive(Debug)]
struct Fragment {
    end: usize,
    points: VecDeque<(i32, i32)>,
    state: FragmentState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentState {
    Open,
    Closed,
    Merged,
}

/// Per-level stitching state.
#[derive(Debug, Default)]
struct Stitcher {
    fragments: Vec<Fragment>,
    by_start: HashMap<usize, usize>,
    by_end: HashMap<usize, usize>,
    rings: Vec<usize>,
}

impl Stitcher {
    /// Add one segment whose ends lie on edges `start` and `end`.
    fn add(
        &mut self,
        start: usize,
        end: usize,
        start_point: impl FnOnce() -> (i32, i32),
        end_point: impl FnOnce() -> (i32, i32),
    ) {
        if let Some(f) = self.by_end.remove(&start) {
            if let Some(g) = self.by_start.remove(&end) {
                if f == g {
                    let fragment = &mut self.fragments[f];
                    fragment.points.push_back(end_point());
                    fragment.state = FragmentState::Closed;
                    self.rings.push(f);
                } else {
                    let tail = std::mem::take(&mut self.fragments[g].points);
                    let g_end = self.fragments[g].end;
                    self.fragments[g].state = FragmentState::Merged;

                    let fragment = &mut self.fragments[f];
                    fragment.points.extend(tail);
                    fragment.end = g_end;
                    self.by_end.insert(g_end, f);
                }
            } else {
                let fragment = &mut self.fragments[f];
                fragment.points.push_back(end_point());
                fragment.end = end;
                self.by_end.insert(end, f);
            }
        } else if let Some(f) = self.by_start.remove(&end) {
            let fragment = &mut self.fragments[f];
            fragment.points.push_front(start_point());
            self.by_start.insert(start, f);
        } else {
            let id = self.fragments.len();
            let mut points = VecDeque::with_capacity(8);
            points.push_back(start_point());
            points.push_back(end_point());
            self.fragments.push(Fragment {
                end,
                points,
                state: FragmentState::Open,
            });
            self.by_start.insert(start, id);
            self.by_end.insert(end, id);
        }
    }

    /// Closed rings in closing order, then open fragments in creation order.
    fn into_lines(mut self) -> Vec<Vec<(i32, i32)>> {
        let mut lines = Vec::with_capacity(self.rings.len());
        for &r in &self.rings {
            lines.push(Vec::from(std::mem::take(&mut self.fragments[r].points)));
        }
        for fragment in self.fragments {
            if fragment.state == FragmentState::Open && !fragment.points.is_empty() {
                lines.push(Vec::from(fragment.points));
            }
        }
        lines
    }
}

/// `(b - a) / (c - a)`: where `b` falls between `a` and `c`.
#[inline]
fn ratio(a: f64, b: f64, c: f64) -> f64 {
    (b - a) / (c - a)
}

/// Corner values of the cell whose bottom-right lattice corner is `(x, y)`.
#[derive(Debug, Clone, Copy)]
struct Cell {
    x: f64,
    y: f64,
    tl: f64,
    tr: f64,
    br: f64,
    bl: f64,
}

impl Cell {
    /// Tile position of an edge crossing, interpolated between the edge's corners.
    fn crossing(&self, point: EdgePoint, threshold: f64, scale: f64) -> (i32, i32) {
        let (x, y) = match point {
            [0, _] => (self.x - 1.0, self.y - ratio(self.bl, threshold, self.tl)),
            [2, _] => (self.x, self.y - ratio(self.br, threshold, self.tr)),
            [_, 0] => (self.x - ratio(self.tr, threshold, self.tl), self.y - 1.0),
            _ => (self.x - ratio(self.br, threshold, self.bl), self.y),
        };
        (
            round_half_up(x * scale) as i32,
            round_half_up(y * scale) as i32,
        )
    }
}

/// Key of a level in the stitcher map; interval multiples use their integer
/// multiplier so repeated float additions cannot split a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct LevelKey(i64);

/// Trace isolines across a sampled lattice.
///
/// Cells touching a `NaN` corner are skipped. Levels come back in ascending
/// order; levels without lines are omitted.
pub fn trace_isolines(lattice: &Lattice, thresholds: &Thresholds, extent: u32) -> Vec<ContourLevel> {
    let side = lattice.side;
    let stride = 2 * (side + 1);
    let scale = extent as f64 / lattice.resolution as f64;
    let offset = lattice.buffer as f64;

    let mut levels: HashMap<LevelKey, (f64, Stitcher)> = HashMap::new();

    for j in 1..side {
        for i in 1..side {
            if !lattice.sampled(i - 1, j - 1) {
                continue;
            }
            let cell = Cell {
                x: i as f64 - offset,
                y: j as f64 - offset,
                tl: lattice.at(i - 1, j - 1),
                tr: lattice.at(i, j - 1),
                br: lattice.at(i, j),
                bl: lattice.at(i - 1, j),
            };
            if cell.tl.is_nan() || cell.tr.is_nan() || cell.br.is_nan() || cell.bl.is_nan() {
                continue;
            }
            let min = cell.tl.min(cell.tr).min(cell.br).min(cell.bl);
            let max = cell.tl.max(cell.tr).max(cell.br).max(cell.bl);

            let edge = |point: EdgePoint| {
                (i * 2 + point[0] as usize - 2) + (j * 2 + point[1] as usize - 2) * stride
            };

            let mut visit = |key: LevelKey, threshold: f64| {
                let code = corner_code(cell.tl, cell.tr, cell.br, cell.bl, threshold);
                let segments = cell_segments(code);
                if segments.is_empty() {
                    return;
                }
                let (_, stitcher) = levels
                    .entry(key)
                    .or_insert_with(|| (threshold, Stitcher::default()));
                for &[start, end] in segments {
                    stitcher.add(
                        edge(start),
                        edge(end),
                        || cell.crossing(start, threshold, scale),
                        || cell.crossing(end, threshold, scale),
                    );
                }
            };

            match thresholds {
                Thresholds::Interval(interval) => {
                    if !(*interval > 0.0) {
                        continue;
                    }
                    let first = (min / interval).ceil() as i64;
                    let last = (max / interval).floor() as i64;
                    for k in first..=last {
                        visit(LevelKey(k), k as f64 * interval);
                    }
                }
                Thresholds::Levels(list) => {
                    for (k, &threshold) in list.iter().enumerate() {
                        if threshold >= min && threshold <= max {
                            visit(LevelKey(k as i64), threshold);
                        }
                    }
                }
            }
        }
    }

    let mut out: Vec<ContourLevel> = levels
        .into_values()
        .map(|(level, stitcher)| ContourLevel {
            level,
            lines: stitcher.into_lines(),
        })
        .filter(|l| !l.lines.is_empty())
        .collect();
    out.sort_by(|a, b| a.level.total_cmp(&b.level));
    out
}

/// Sample `grid` for `tile` and trace its isolines.
pub fn generate_contours<G: SampleGrid>(
    grid: &G,
    values: &[f32],
    tile: TileCoord,
    thresholds: &Thresholds,
    options: &ContourOptions,
    clip: Option<&ClipTester>,
) -> Vec<ContourLevel> {
    let mut lattice = Lattice::sample(grid, values, tile, options);
    if let Some(clip) = clip {
        lattice = lattice.with_clip(tile, clip);
    }
    let levels = trace_isolines(&lattice, thresholds, options.extent);

    debug!(
        z = tile.z,
        x = tile.x,
        y = tile.y,
        levels = levels.len(),
        lines = levels.iter().map(|l| l.lines.len()).sum::<usize>(),
        points = levels
            .iter()
            .flat_map(|l| l.lines.iter())
            .map(|line| line.len())
            .sum::<usize>(),
        "traced contours"
    );
    levels
}

/// One LineString feature per traced line, tagged with its level.
pub fn contour_layer(levels: &[ContourLevel], extent: u32) -> Layer {
    let mut layer = Layer::new(LAYER_NAME, extent);
    let mut builder = GeometryBuilder::new();
    for level in levels {
        let id = (LEVEL_ID_OFFSET + level.level) as u64;
        for line in &level.lines {
            builder.line(line);
            layer.push(
                Feature::new(Some(id), GeomType::LineString, builder.finish())
                    .with_property("value", level.level),
            );
        }
    }
    layer
}
