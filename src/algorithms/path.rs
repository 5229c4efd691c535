use crate::algorithms::common::NO_PREDECESSOR;
use crate::grid::{Grid, Position};

/// Walks the predecessor map back from `end` to `start` and returns the path
/// in start-to-end order.
///
/// Returns `[start]` when `start == end`, and an empty path when `end` was
/// never reached.
pub fn reconstruct_path(
    grid: &Grid,
    predecessor: &[usize],
    start: usize,
    end: usize,
) -> Vec<Position> {
    if start == end {
        return vec![grid.position(start)];
    }
    if predecessor[end] == NO_PREDECESSOR {
        return Vec::new();
    }

    let mut path = vec![grid.position(end)];
    let mut current = end;
    // A chain can never be longer than the number of cells.
    for _ in 0..predecessor.len() {
        current = predecessor[current];
        if current == NO_PREDECESSOR {
            break;
        }
        path.push(grid.position(current));
        if current == start {
            path.reverse();
            return path;
        }
    }

    debug_assert!(false, "predecessor chain from {} never reached {}", end, start);
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(grid: &Grid, links: &[(Position, Position)]) -> Vec<usize> {
        let mut predecessor = vec![NO_PREDECESSOR; grid.len()];
        for &(cell, from) in links {
            predecessor[grid.index(cell)] = grid.index(from);
        }
        predecessor
    }

    #[test]
    fn start_equal_to_end_is_a_single_cell() {
        let grid = Grid::new(2, 2).unwrap();
        let predecessor = vec![NO_PREDECESSOR; grid.len()];
        assert_eq!(
            reconstruct_path(&grid, &predecessor, 3, 3),
            vec![Position::new(1, 1)]
        );
    }

    #[test]
    fn unreached_end_gives_empty_path() {
        let grid = Grid::new(2, 2).unwrap();
        let predecessor = chain(&grid, &[(Position::new(0, 1), Position::new(0, 0))]);
        assert!(reconstruct_path(&grid, &predecessor, 0, 3).is_empty());
    }

    #[test]
    fn walks_back_and_reverses() {
        let grid = Grid::new(3, 3).unwrap();
        let a = Position::new(0, 0);
        let b = Position::new(0, 1);
        let c = Position::new(1, 1);
        let d = Position::new(2, 1);
        let predecessor = chain(&grid, &[(b, a), (c, b), (d, c)]);
        assert_eq!(
            reconstruct_path(&grid, &predecessor, grid.index(a), grid.index(d)),
            vec![a, b, c, d]
        );
    }

    #[test]
    fn stops_at_start_even_if_it_has_a_predecessor() {
        let grid = Grid::new(1, 3).unwrap();
        let a = Position::new(0, 0);
        let b = Position::new(0, 1);
        let c = Position::new(0, 2);
        // `b` is the start here; the link b -> a must not be followed.
        let predecessor = chain(&grid, &[(b, a), (c, b)]);
        assert_eq!(
            reconstruct_path(&grid, &predecessor, grid.index(b), grid.index(c)),
            vec![b, c]
        );
    }
}
