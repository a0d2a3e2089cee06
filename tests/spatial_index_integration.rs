//! Integration tests for the cell-key spatial index
//!
//! Queries are single-bucket: only points sharing the queried position's cell key come
//! back, so a point a hair across a cell edge is excluded even inside the radius.

use murmuration::core::config::SpatialLookup;
use murmuration::core::types::Vec2;
use murmuration::spatial::{cell_key, SpatialIndex};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Vec2> {
    (-200.0f32..200.0, -200.0f32..200.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn lookups() -> impl Strategy<Value = SpatialLookup> {
    prop_oneof![Just(SpatialLookup::Dense), Just(SpatialLookup::Searched)]
}

#[test]
fn test_adjacent_cell_is_excluded() {
    let mut index = SpatialIndex::new(10.0, SpatialLookup::Searched);
    index.build(&[Vec2::new(9.9, 5.0), Vec2::new(10.6, 5.0)]);

    let query = Vec2::new(10.1, 5.0);
    assert_ne!(index.cell_key(Vec2::new(9.9, 5.0)), index.cell_key(query));
    // 0.2 away but across the edge, so only the same-cell point returns
    assert_eq!(index.query_near(query, 1.0), vec![1]);
}

#[test]
fn test_rebuild_replaces_points() {
    let mut index = SpatialIndex::new(5.0, SpatialLookup::Searched);
    index.build(&[Vec2::new(1.0, 1.0)]);
    assert_eq!(index.query_near(Vec2::new(1.5, 1.5), 2.0), vec![0]);

    index.update(&[Vec2::new(30.0, 30.0)]);
    assert!(index.query_near(Vec2::new(1.5, 1.5), 2.0).is_empty());
    assert_eq!(index.query_near(Vec2::new(31.0, 31.0), 2.0), vec![0]);
}

#[test]
fn test_searched_finds_whole_bucket() {
    let points: Vec<Vec2> = (0..20)
        .map(|i| Vec2::new((i % 5) as f32 * 0.5, (i / 5) as f32 * 0.5))
        .collect();
    let mut index = SpatialIndex::new(10.0, SpatialLookup::Searched);
    index.build(&points);

    let mut found = index.query_near(Vec2::new(1.0, 1.0), 10.0);
    found.sort_unstable();
    assert_eq!(found, (0..20).collect::<Vec<_>>());
}

proptest! {
    #[test]
    fn prop_cell_key_is_deterministic(p in point(), cell_size in 0.5f32..50.0) {
        prop_assert_eq!(cell_key(p, cell_size), cell_key(p, cell_size));
    }

    #[test]
    fn prop_query_is_sound(
        points in prop::collection::vec(point(), 0..120),
        query in point(),
        radius in 0.0f32..60.0,
        cell_size in 1.0f32..40.0,
        lookup in lookups(),
    ) {
        let mut index = SpatialIndex::new(cell_size, lookup);
        index.build(&points);
        let key = cell_key(query, cell_size);

        for idx in index.neighbors(query, radius) {
            prop_assert!(idx < points.len());
            prop_assert_eq!(cell_key(points[idx], cell_size), key);
            prop_assert!(points[idx].distance(query) <= radius);
        }
    }

    #[test]
    fn prop_searched_query_is_complete(
        points in prop::collection::vec(point(), 0..120),
        query in point(),
        radius in 0.0f32..60.0,
        cell_size in 1.0f32..40.0,
    ) {
        let mut index = SpatialIndex::new(cell_size, SpatialLookup::Searched);
        index.build(&points);
        let key = cell_key(query, cell_size);

        let mut found = index.query_near(query, radius);
        found.sort_unstable();
        let expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| cell_key(**p, cell_size) == key && p.distance(query) <= radius)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(found, expected);
    }
}
