use crate::algorithms::{self, Algorithm, SearchResult};
use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use pathfinding::prelude::{astar, bfs, dijkstra};
use rustc_hash::FxHashSet;
use tracing::{info, warn};

/// One implementation of the search contract.
///
/// Backends are interchangeable: they must return a valid, optimal path, but
/// the exact visit order may differ between them.
pub trait SearchBackend {
    fn name(&self) -> &'static str;

    fn search(
        &self,
        grid: &Grid,
        start: Position,
        end: Position,
        algorithm: Algorithm,
    ) -> Result<SearchResult>;
}

/// The engine in [`crate::algorithms`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceBackend;

impl SearchBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn search(
        &self,
        grid: &Grid,
        start: Position,
        end: Position,
        algorithm: Algorithm,
    ) -> Result<SearchResult> {
        algorithms::search(grid, start, end, algorithm)
    }
}

/// Backend built on the `pathfinding` crate's `bfs`, `dijkstra` and `astar`.
///
/// The visit order is recorded from successor expansions, so it lists each
/// expanded cell once followed by the end cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryBackend {
    cell_limit: Option<usize>,
}

impl LibraryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse grids with more than `limit` cells.
    pub fn with_cell_limit(limit: usize) -> Self {
        LibraryBackend {
            cell_limit: Some(limit),
        }
    }
}

impl SearchBackend for LibraryBackend {
    fn name(&self) -> &'static str {
        "pathfinding"
    }

    fn search(
        &self,
        grid: &Grid,
        start: Position,
        end: Position,
        algorithm: Algorithm,
    ) -> Result<SearchResult> {
        grid.check_endpoints(start, end)?;
        if let Some(limit) = self.cell_limit {
            if grid.len() > limit {
                return Err(Error::BackendUnavailable {
                    backend: self.name(),
                    reason: format!("{} cells exceeds the limit of {}", grid.len(), limit),
                });
            }
        }

        let mut seen = FxHashSet::default();
        let mut visit_order = Vec::new();
        let mut nbuf = Vec::with_capacity(4);

        // Successors of walls are never asked for: walls are never yielded.
        let mut expand = |p: &Position| -> Vec<Position> {
            if seen.insert(*p) {
                visit_order.push(*p);
            }
            grid.passable_neighbors(*p, &mut nbuf);
            nbuf.clone()
        };

        let path = match algorithm {
            Algorithm::Bfs => bfs(&start, |p| expand(p), |p| *p == end),
            Algorithm::UniformCost => dijkstra(
                &start,
                |p| expand(p).into_iter().map(|n| (n, 1u32)),
                |p| *p == end,
            )
            .map(|(path, _)| path),
            Algorithm::Heuristic => astar(
                &start,
                |p| expand(p).into_iter().map(|n| (n, 1u32)),
                |p| p.manhattan(end),
                |p| *p == end,
            )
            .map(|(path, _)| path),
        };

        if path.is_some() && seen.insert(end) {
            visit_order.push(end);
        }

        let result = SearchResult {
            visit_order,
            path: path.unwrap_or_default(),
        };
        result.validate(grid, start, end)?;
        Ok(result)
    }
}

/// Runs `preferred`, and falls back to the reference engine when it fails.
///
/// Errors about the arguments themselves (bounds, blocked endpoints) are
/// returned as-is, since the reference engine would reject them too.
pub fn search_with_fallback(
    preferred: &dyn SearchBackend,
    grid: &Grid,
    start: Position,
    end: Position,
    algorithm: Algorithm,
) -> Result<SearchResult> {
    match preferred.search(grid, start, end, algorithm) {
        Ok(result) => Ok(result),
        Err(err) if err.is_structural() => Err(err),
        Err(err) => {
            warn!(
                backend = preferred.name(),
                %algorithm,
                error = %err,
                "backend failed, falling back to the reference engine"
            );
            let result = ReferenceBackend.search(grid, start, end, algorithm)?;
            info!(visited = result.visited_count(), "fallback search finished");
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Layout;

    struct BrokenBackend;

    impl SearchBackend for BrokenBackend {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn search(&self, _: &Grid, _: Position, _: Position, _: Algorithm) -> Result<SearchResult> {
            Err(Error::InvalidPath("always fails".to_string()))
        }
    }

    fn maze() -> Layout {
        Layout::parse(
            "S...#.....\n\
             .##.#.###.\n\
             .#..#...#.\n\
             .#.####.#.\n\
             .#......#E",
        )
        .unwrap()
    }

    #[test]
    fn library_backend_matches_reference_path_cost() {
        let layout = maze();
        let (start, end) = (layout.start.unwrap(), layout.end.unwrap());
        for algorithm in Algorithm::ALL {
            let reference = ReferenceBackend
                .search(&layout.grid, start, end, algorithm)
                .unwrap();
            let library = LibraryBackend::new()
                .search(&layout.grid, start, end, algorithm)
                .unwrap();
            assert!(reference.is_reachable());
            assert_eq!(library.path_cost(), reference.path_cost());
            assert_eq!(library.visit_order.first(), Some(&start));
            assert_eq!(library.visit_order.last(), Some(&end));
        }
    }

    #[test]
    fn library_backend_reports_unreachable_as_empty_path() {
        let layout = Layout::parse("S#.\n##.\n..E").unwrap();
        let (start, end) = (layout.start.unwrap(), layout.end.unwrap());
        for algorithm in Algorithm::ALL {
            let result = LibraryBackend::new()
                .search(&layout.grid, start, end, algorithm)
                .unwrap();
            assert!(result.path.is_empty());
            assert_eq!(result.visit_order, vec![start]);
        }
    }

    #[test]
    fn library_backend_handles_start_equal_to_end() {
        let grid = Grid::new(3, 3).unwrap();
        let cell = Position::new(1, 1);
        for algorithm in Algorithm::ALL {
            let result = LibraryBackend::new()
                .search(&grid, cell, cell, algorithm)
                .unwrap();
            assert_eq!(result.path, vec![cell]);
            assert_eq!(result.visit_order, vec![cell]);
        }
    }

    #[test]
    fn cell_limit_makes_library_unavailable() {
        let grid = Grid::new(5, 5).unwrap();
        let err = LibraryBackend::with_cell_limit(10)
            .search(&grid, Position::new(0, 0), Position::new(4, 4), Algorithm::Bfs)
            .unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable { backend: "pathfinding", .. }));
    }

    #[test]
    fn fallback_uses_reference_engine_on_failure() {
        let layout = maze();
        let (start, end) = (layout.start.unwrap(), layout.end.unwrap());
        let expected = ReferenceBackend
            .search(&layout.grid, start, end, Algorithm::Heuristic)
            .unwrap();

        let from_broken =
            search_with_fallback(&BrokenBackend, &layout.grid, start, end, Algorithm::Heuristic)
                .unwrap();
        assert_eq!(from_broken, expected);

        let limited = LibraryBackend::with_cell_limit(1);
        let from_limited =
            search_with_fallback(&limited, &layout.grid, start, end, Algorithm::Heuristic)
                .unwrap();
        assert_eq!(from_limited, expected);
    }

    #[test]
    fn fallback_does_not_mask_bad_arguments() {
        let grid = Grid::new(3, 3).unwrap();
        let err = search_with_fallback(
            &LibraryBackend::new(),
            &grid,
            Position::new(0, 0),
            Position::new(3, 0),
            Algorithm::Bfs,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidBounds { .. }));
    }
}
