//! qtree - run a point workload against a quadtree and dump its nodes

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use quadtree::{Point, QuadTree, QuadTreeError};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{Config, WorkloadConfig};

/// Counters collected while running a workload.
#[derive(Debug, Default, PartialEq, Eq)]
struct WorkloadReport {
    inserted: usize,
    duplicates: usize,
    rejected: usize,
    removed: usize,
    missing: usize,
}

/// Insert a point, logging and counting anything that was not newly added.
fn insert_point(tree: &mut QuadTree, point: Point, report: &mut WorkloadReport) {
    match tree.insert(point) {
        Ok(true) => report.inserted += 1,
        Ok(false) => report.duplicates += 1,
        Err(e @ QuadTreeError::OutOfBounds { .. }) => {
            warn!("Skipping point: {}", e);
            report.rejected += 1;
        }
        Err(e) => warn!("Unexpected insert failure: {}", e),
    }
}

fn run_workload(tree: &mut QuadTree, workload: &WorkloadConfig) -> WorkloadReport {
    let mut report = WorkloadReport::default();

    for &point in &workload.points {
        insert_point(tree, point, &mut report);
    }

    let bounds = tree.bounds();
    let mut rng = StdRng::seed_from_u64(workload.seed);
    for _ in 0..workload.random_points {
        let point = Point::new(
            rng.random_range(bounds.min_x..bounds.max_x),
            rng.random_range(bounds.min_y..bounds.max_y),
        );
        insert_point(tree, point, &mut report);
    }

    for &point in &workload.remove {
        if tree.remove(point) {
            report.removed += 1;
        } else {
            report.missing += 1;
        }
    }

    report
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the node dump on stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("qtree v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_PATH));
    let config = Config::load(&path)
        .with_context(|| format!("failed to load workload from {}", path.display()))?;
    info!("Loaded workload from {}", path.display());
    info!("  Bounds: {}", config.tree.bounds);
    info!("  Capacity: {}", config.tree.capacity);

    let mut tree = QuadTree::from_config(&config.tree).context("invalid [tree] configuration")?;
    let report = run_workload(&mut tree, &config.workload);
    info!(
        inserted = report.inserted,
        duplicates = report.duplicates,
        rejected = report.rejected,
        removed = report.removed,
        missing = report.missing,
        "Workload finished"
    );

    for range in &config.query {
        let hits = tree.query(range);
        info!("Query {}: {} points", range, hits.len());
    }

    tree.validate_invariants().context("quadtree invariants broken after workload")?;
    let stats = tree.stats();
    info!(
        points = tree.size(),
        depth = stats.depth,
        nodes = stats.node_count,
        leaves = stats.leaf_count,
        "Tree stats"
    );

    let mut out = std::io::stdout().lock();
    writeln!(out, "wkt;count;is_leaf")?;
    for node in tree.nodes() {
        writeln!(out, "{node}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadtree::Rectangle;

    fn workload(
        points: &[(f64, f64)],
        random_points: usize,
        remove: &[(f64, f64)],
    ) -> WorkloadConfig {
        WorkloadConfig {
            points: points.iter().copied().map(Point::from).collect(),
            random_points,
            seed: 7,
            remove: remove.iter().copied().map(Point::from).collect(),
        }
    }

    #[test]
    fn test_report_counts() {
        let mut tree = QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0), 2).unwrap();
        let w = workload(
            &[(1.0, 1.0), (1.0, 1.0), (150.0, 1.0), (60.0, 60.0)],
            0,
            &[(1.0, 1.0), (2.0, 2.0)],
        );
        let report = run_workload(&mut tree, &w);
        assert_eq!(
            report,
            WorkloadReport {
                inserted: 2,
                duplicates: 1,
                rejected: 1,
                removed: 1,
                missing: 1,
            }
        );
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn test_random_points_stay_in_bounds() {
        let mut tree = QuadTree::new(Rectangle::new(-5.0, -5.0, 5.0, 5.0), 4).unwrap();
        let report = run_workload(&mut tree, &workload(&[], 500, &[]));
        assert_eq!(report.rejected, 0);
        assert_eq!(report.inserted + report.duplicates, 500);
        assert_eq!(tree.size(), report.inserted);
        assert!(tree.validate_invariants().is_ok());
    }

    #[test]
    fn test_same_seed_same_tree() {
        let bounds = Rectangle::new(0.0, 0.0, 1.0, 1.0);
        let mut a = QuadTree::new(bounds, 3).unwrap();
        let mut b = QuadTree::new(bounds, 3).unwrap();
        run_workload(&mut a, &workload(&[], 200, &[]));
        run_workload(&mut b, &workload(&[], 200, &[]));
        assert!(a.nodes().eq(b.nodes()));
    }
}
