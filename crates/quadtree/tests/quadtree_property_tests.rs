use std::collections::BTreeSet;

use proptest::prelude::*;
use quadtree::{Point, QuadTree, Rectangle};

const BOUNDS: Rectangle = Rectangle::new(0.0, 0.0, 64.0, 64.0);

/// Order-independent key for comparing point sets.
fn key(p: Point) -> (u64, u64) {
    (p.x.to_bits(), p.y.to_bits())
}

fn key_set(points: impl IntoIterator<Item = Point>) -> BTreeSet<(u64, u64)> {
    points.into_iter().map(key).collect()
}

/// Points on a coarse grid so that duplicates and midpoint ties are common.
fn grid_point() -> impl Strategy<Value = Point> {
    (0u32..128, 0u32..128).prop_map(|(x, y)| Point::new(x as f64 * 0.5, y as f64 * 0.5))
}

fn any_rect() -> impl Strategy<Value = Rectangle> {
    (-8.0f64..72.0, -8.0f64..72.0, 0.0f64..80.0, 0.0f64..80.0)
        .prop_map(|(x, y, w, h)| Rectangle::new(x, y, x + w, y + h))
}

proptest! {
    #[test]
    fn prop_full_query_returns_inserted_set(
        points in prop::collection::vec(grid_point(), 0..300),
        capacity in 1usize..8,
    ) {
        let mut tree = QuadTree::new(BOUNDS, capacity).unwrap();
        for &p in &points {
            tree.insert(p).unwrap();
        }

        let expected = key_set(points.iter().copied());
        let found = tree.query(&BOUNDS);
        prop_assert_eq!(found.len(), expected.len());
        prop_assert_eq!(key_set(found), expected.clone());
        prop_assert_eq!(key_set(tree.iter()), expected.clone());
        prop_assert_eq!(tree.size(), expected.len());
        prop_assert!(tree.validate_invariants().is_ok());
    }
}

proptest! {
    #[test]
    fn prop_behaves_like_btreeset(
        ops in prop::collection::vec((0u8..3, grid_point()), 0..400),
        capacity in 1usize..6,
    ) {
        let mut tree = QuadTree::new(BOUNDS, capacity).unwrap();
        let mut model = BTreeSet::new();

        for (op, p) in ops {
            match op {
                0 => {
                    let added = tree.insert(p).unwrap();
                    prop_assert_eq!(added, model.insert(key(p)));
                }
                1 => {
                    prop_assert_eq!(tree.remove(p), model.remove(&key(p)));
                }
                2 => {
                    prop_assert_eq!(tree.contains(p), model.contains(&key(p)));
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(tree.size(), model.len());
            prop_assert!(tree.validate_invariants().is_ok());
        }
    }
}

proptest! {
    #[test]
    fn prop_query_matches_linear_scan(
        points in prop::collection::vec(grid_point(), 0..200),
        range in any_rect(),
    ) {
        let mut tree = QuadTree::new(BOUNDS, 3).unwrap();
        tree.extend(points.iter().copied()).unwrap();

        let expected = key_set(points.iter().copied().filter(|p| range.contains(*p)));
        let found = tree.query(&range);
        prop_assert_eq!(found.len(), expected.len());
        prop_assert_eq!(key_set(found), expected);
    }
}

proptest! {
    #[test]
    fn prop_removing_everything_collapses_root(
        points in prop::collection::vec(grid_point(), 1..200),
        capacity in 1usize..6,
        seed in any::<u64>(),
    ) {
        let mut tree = QuadTree::new(BOUNDS, capacity).unwrap();
        tree.extend(points.iter().copied()).unwrap();

        // Remove in an order unrelated to insertion.
        let mut order: Vec<Point> = tree.iter().collect();
        let len = order.len();
        for i in 0..len {
            let j = (seed.wrapping_mul(i as u64 + 1) % len as u64) as usize;
            order.swap(i, j);
        }

        for p in order {
            prop_assert!(tree.remove(p));
            prop_assert!(tree.validate_invariants().is_ok());
        }

        prop_assert_eq!(tree.size(), 0);
        let stats = tree.stats();
        prop_assert_eq!(stats.node_count, 1);
        prop_assert_eq!(stats.leaf_count, 1);
    }
}

proptest! {
    #[test]
    fn prop_insert_is_idempotent(
        p in grid_point(),
        others in prop::collection::vec(grid_point(), 0..50),
    ) {
        let mut tree = QuadTree::new(BOUNDS, 2).unwrap();
        tree.extend(others).unwrap();
        let before = tree.size();
        let first = tree.insert(p).unwrap();
        let second = tree.insert(p).unwrap();

        prop_assert!(!second);
        prop_assert_eq!(tree.size(), before + usize::from(first));
        prop_assert!(tree.contains(p));
    }
}
