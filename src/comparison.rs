use crate::algorithms::{Algorithm, SearchResult};
use crate::backend::{search_with_fallback, SearchBackend};
use crate::error::Result;
use crate::grid::{Grid, Position};
use crate::statistics::{ComparisonSummary, SearchStats};
use std::time::Instant;
use tracing::{info, warn};

/// One algorithm's outcome on a shared grid snapshot.
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    pub result: SearchResult,
    pub stats: SearchStats,
}

/// Runs a single algorithm through `backend`, timing the call.
pub fn run_one(
    backend: &dyn SearchBackend,
    grid: &Grid,
    start: Position,
    end: Position,
    algorithm: Algorithm,
) -> Result<AlgorithmRun> {
    let started = Instant::now();
    let result = search_with_fallback(backend, grid, start, end, algorithm)?;
    let elapsed = started.elapsed();

    let stats = SearchStats {
        algorithm,
        reached: result.is_reachable(),
        visited: result.visited_count(),
        path_cost: result.path_cost(),
        elapsed,
    };
    Ok(AlgorithmRun {
        algorithm,
        result,
        stats,
    })
}

/// Runs every algorithm against the same grid and endpoints.
pub fn compare(
    backend: &dyn SearchBackend,
    grid: &Grid,
    start: Position,
    end: Position,
) -> Result<Vec<AlgorithmRun>> {
    info!(
        backend = backend.name(),
        rows = grid.rows(),
        cols = grid.cols(),
        walls = grid.wall_count(),
        "running all algorithms"
    );

    let runs = Algorithm::ALL
        .iter()
        .map(|&algorithm| run_one(backend, grid, start, end, algorithm))
        .collect::<Result<Vec<_>>>()?;

    let summary = summarize(&runs);
    if !summary.costs_agree() {
        warn!("algorithms disagree on the shortest path length");
    }
    Ok(runs)
}

pub fn summarize(runs: &[AlgorithmRun]) -> ComparisonSummary {
    ComparisonSummary::new(runs.iter().map(|run| run.stats.clone()).collect())
}
