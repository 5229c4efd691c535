use crate::algorithms::path::reconstruct_path;
use crate::algorithms::SearchResult;
use crate::grid::{Grid, Position};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Distance sentinel for cells that have not been discovered.
pub const UNREACHED: u32 = u32::MAX;

/// Predecessor sentinel: the start cell and undiscovered cells have none.
pub const NO_PREDECESSOR: usize = usize::MAX;

/// Exploration order for the shared search loop.
///
/// A frontier may hold the same cell several times; the loop discards every
/// pop of a cell that is already closed.
pub trait Frontier {
    fn push(&mut self, index: usize, cell: Position, distance: u32);
    fn pop(&mut self) -> Option<usize>;
}

/// Per-run bookkeeping, one slot per grid cell.
pub struct SearchState {
    pub distance: Vec<u32>,
    pub predecessor: Vec<usize>,
    pub visited: Vec<bool>,
    pub visit_order: Vec<Position>,
}

impl SearchState {
    pub fn new(len: usize) -> Self {
        SearchState {
            distance: vec![UNREACHED; len],
            predecessor: vec![NO_PREDECESSOR; len],
            visited: vec![false; len],
            visit_order: Vec::new(),
        }
    }
}

/// Runs one search to completion: closes cells in frontier order until the
/// end cell is closed or the frontier is exhausted.
///
/// Endpoints must already be validated against `grid`.
pub fn explore<F: Frontier>(
    grid: &Grid,
    start: Position,
    end: Position,
    mut frontier: F,
) -> SearchResult {
    let mut state = SearchState::new(grid.len());
    let start_idx = grid.index(start);
    let end_idx = grid.index(end);

    state.distance[start_idx] = 0;
    frontier.push(start_idx, start, 0);

    let mut nbuf = Vec::with_capacity(4);

    while let Some(current) = frontier.pop() {
        // Stale duplicate of an already closed cell.
        if state.visited[current] {
            continue;
        }
        state.visited[current] = true;

        let cell = grid.position(current);
        state.visit_order.push(cell);

        if current == end_idx {
            break;
        }

        let tentative = state.distance[current] + 1;
        grid.passable_neighbors(cell, &mut nbuf);

        for &next in nbuf.iter() {
            let ni = grid.index(next);
            if state.visited[ni] || tentative >= state.distance[ni] {
                continue;
            }
            state.distance[ni] = tentative;
            state.predecessor[ni] = current;
            frontier.push(ni, next, tentative);
        }
    }

    let path = reconstruct_path(grid, &state.predecessor, start_idx, end_idx);
    SearchResult {
        visit_order: state.visit_order,
        path,
    }
}

/// Heap entry ordered by ascending priority, then ascending insertion sequence.
#[derive(Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    priority: u32,
    seq: u64,
    index: usize,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the smallest priority, and
        // the earliest insertion among equal priorities.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue that is stable: equal priorities pop in insertion order.
#[derive(Default)]
pub struct StablePriorityQueue {
    heap: BinaryHeap<QueueEntry>,
    next_seq: u64,
}

impl StablePriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, priority: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueueEntry {
            priority,
            seq,
            index,
        });
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|entry| entry.index)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_queue_pops_lowest_priority_first() {
        let mut queue = StablePriorityQueue::new();
        queue.push(10, 5);
        queue.push(11, 1);
        queue.push(12, 3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(11));
        assert_eq!(queue.pop(), Some(12));
        assert_eq!(queue.pop(), Some(10));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn stable_queue_breaks_ties_by_insertion_order() {
        let mut queue = StablePriorityQueue::new();
        for index in [7, 3, 9, 1] {
            queue.push(index, 2);
        }
        queue.push(42, 1);
        let order: Vec<usize> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(order, vec![42, 7, 3, 9, 1]);
    }

    /// LIFO frontier, only to show the loop is independent of the order.
    struct StackFrontier(Vec<usize>);

    impl Frontier for StackFrontier {
        fn push(&mut self, index: usize, _cell: Position, _distance: u32) {
            self.0.push(index);
        }

        fn pop(&mut self) -> Option<usize> {
            self.0.pop()
        }
    }

    #[test]
    fn explore_closes_each_cell_once() {
        let grid = Grid::new(3, 3).unwrap();
        let result = explore(
            &grid,
            Position::new(0, 0),
            Position::new(2, 2),
            StackFrontier(Vec::new()),
        );
        let mut seen = result.visit_order.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), result.visit_order.len());
        assert_eq!(result.path.first(), Some(&Position::new(0, 0)));
        assert_eq!(result.path.last(), Some(&Position::new(2, 2)));
    }
}
