use crate::algorithms::common::{Frontier, StablePriorityQueue};
use crate::grid::Position;

/// Heuristic-guided (A*) frontier: priority is the distance so far plus the
/// Manhattan distance to the goal.
///
/// Manhattan distance is consistent on a 4-connected unit-cost grid, so the
/// search loop can close cells permanently on first pop. That stops holding
/// once diagonal moves, terrain costs or an inadmissible heuristic appear.
pub struct HeuristicFrontier {
    queue: StablePriorityQueue,
    goal: Position,
}

impl HeuristicFrontier {
    /// Creates a frontier that estimates remaining cost towards `goal`.
    pub fn new(goal: Position) -> Self {
        HeuristicFrontier {
            queue: StablePriorityQueue::new(),
            goal,
        }
    }

    /// Heuristic: Manhattan distance to the goal.
    pub fn estimate(&self, cell: Position) -> u32 {
        cell.manhattan(self.goal)
    }
}

impl Frontier for HeuristicFrontier {
    fn push(&mut self, index: usize, cell: Position, distance: u32) {
        let priority = distance + self.estimate(cell);
        self.queue.push(index, priority);
    }

    fn pop(&mut self) -> Option<usize> {
        self.queue.pop()
    }
}
