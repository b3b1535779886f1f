//! Index windows over one grid axis.

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` index window along one grid axis.
///
/// Grids address their sample arrays through a pair of ranges ordered
/// `[rows, columns]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionRange {
    pub start: usize,
    pub end: usize,
}

impl DimensionRange {
    /// Create a new range. `end` is raised to `start` if it lies below it.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range covering `0..len`.
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    /// Number of indices in the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// The `[rows, columns]` window covering a whole `nx` x `ny` grid.
pub fn full_ranges(nx: usize, ny: usize) -> [DimensionRange; 2] {
    [DimensionRange::full(ny), DimensionRange::full(nx)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_len() {
        let range = DimensionRange::new(2, 7);
        assert_eq!(range.len(), 5);
        assert!(range.contains(2));
        assert!(!range.contains(7));
    }

    #[test]
    fn test_range_never_inverted() {
        let range = DimensionRange::new(5, 3);
        assert_eq!(range.start, 5);
        assert!(range.is_empty());
    }

    #[test]
    fn test_full_ranges_order() {
        let [rows, cols] = full_ranges(10, 3);
        assert_eq!(rows, DimensionRange::full(3));
        assert_eq!(cols, DimensionRange::full(10));
    }
}
