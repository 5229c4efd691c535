//! Shortest-path search over a [`Grid`].
//!
//! All three algorithms share one exploration loop ([`common::explore`]) and
//! differ only in the [`common::Frontier`] that orders the cells:
//!
//! | Algorithm | Frontier | Priority |
//! |---|---|---|
//! | [`Algorithm::Bfs`] | [`bfs::FifoFrontier`] | insertion order |
//! | [`Algorithm::UniformCost`] | [`dijkstra::CostFrontier`] | distance |
//! | [`Algorithm::Heuristic`] | [`a_star::HeuristicFrontier`] | distance + Manhattan |
//!
//! Equal priorities pop in insertion order, and neighbors are always
//! expanded up, down, left, right, so results are deterministic.

pub mod a_star;
pub mod bfs;
pub mod common;
pub mod dijkstra;
pub mod path;

use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Unweighted breadth-first search
    Bfs,
    /// Uniform-cost search (Dijkstra)
    UniformCost,
    /// Heuristic-guided search (A*) with Manhattan distance
    Heuristic,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bfs, Algorithm::UniformCost, Algorithm::Heuristic];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::UniformCost => "dijkstra",
            Algorithm::Heuristic => "a_star",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "bfs" | "breadth-first" => Ok(Algorithm::Bfs),
            "dijkstra" | "uniform-cost" | "ucs" => Ok(Algorithm::UniformCost),
            "astar" | "a-star" | "heuristic" => Ok(Algorithm::Heuristic),
            other => Err(format!(
                "unknown algorithm '{}', expected bfs, dijkstra or astar",
                other
            )),
        }
    }
}

/// Outcome of one search: the order cells were closed in, and the route.
///
/// `path` is empty exactly when the end cell is unreachable; that is a normal
/// result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub visit_order: Vec<Position>,
    pub path: Vec<Position>,
}

impl SearchResult {
    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of edges on the path, or `None` when no path was found.
    pub fn path_cost(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }

    pub fn visited_count(&self) -> usize {
        self.visit_order.len()
    }

    /// Checks the structural guarantees every search result must satisfy:
    /// the path runs from `start` to `end` through adjacent open cells, and
    /// the visit order holds each open cell at most once.
    pub fn validate(&self, grid: &Grid, start: Position, end: Position) -> Result<()> {
        let mut seen = FxHashSet::default();
        for &cell in &self.visit_order {
            if !grid.is_passable(cell) {
                return Err(Error::InvalidPath(format!(
                    "visited blocked or out-of-bounds cell {}",
                    cell
                )));
            }
            if !seen.insert(cell) {
                return Err(Error::InvalidPath(format!("visited {} twice", cell)));
            }
        }

        let (Some(&first), Some(&last)) = (self.path.first(), self.path.last()) else {
            return Ok(());
        };
        if first != start || last != end {
            return Err(Error::InvalidPath(format!(
                "path runs from {} to {}, expected {} to {}",
                first, last, start, end
            )));
        }
        if let Some(blocked) = self.path.iter().find(|p| !grid.is_passable(**p)) {
            return Err(Error::InvalidPath(format!(
                "path crosses blocked cell {}",
                blocked
            )));
        }
        if let Some(step) = self.path.windows(2).find(|w| !w[0].is_adjacent(w[1])) {
            return Err(Error::InvalidPath(format!(
                "path jumps from {} to {}",
                step[0], step[1]
            )));
        }
        Ok(())
    }
}

/// Runs `algorithm` from `start` to `end` on `grid`.
///
/// Both endpoints must be in bounds and open; anything else is rejected
/// before the search begins. An unreachable end yields an empty path.
pub fn search(
    grid: &Grid,
    start: Position,
    end: Position,
    algorithm: Algorithm,
) -> Result<SearchResult> {
    grid.check_endpoints(start, end)?;

    let result = match algorithm {
        Algorithm::Bfs => common::explore(grid, start, end, bfs::FifoFrontier::new()),
        Algorithm::UniformCost => {
            common::explore(grid, start, end, dijkstra::CostFrontier::new())
        }
        Algorithm::Heuristic => {
            common::explore(grid, start, end, a_star::HeuristicFrontier::new(end))
        }
    };

    debug!(
        %algorithm,
        %start,
        %end,
        visited = result.visited_count(),
        path_cost = ?result.path_cost(),
        "search finished"
    );
    Ok(result)
}
