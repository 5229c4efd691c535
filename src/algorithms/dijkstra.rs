use crate::algorithms::common::{Frontier, StablePriorityQueue};
use crate::grid::Position;

/// Uniform-cost (Dijkstra) frontier ordered by distance from the start.
///
/// Relaxed cells are pushed again rather than decreased in place; the search
/// loop skips the stale entries once the cell is closed.
#[derive(Default)]
pub struct CostFrontier {
    queue: StablePriorityQueue,
}

impl CostFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for CostFrontier {
    fn push(&mut self, index: usize, _cell: Position, distance: u32) {
        self.queue.push(index, distance);
    }

    fn pop(&mut self) -> Option<usize> {
        self.queue.pop()
    }
}
