use crate::algorithms::common::Frontier;
use crate::grid::Position;
use std::collections::VecDeque;

/// First-in first-out frontier for unweighted breadth-first search.
///
/// Cells come out in non-decreasing distance order because every edge costs 1,
/// so no explicit priority is stored.
#[derive(Default)]
pub struct FifoFrontier {
    queue: VecDeque<usize>,
}

impl FifoFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for FifoFrontier {
    fn push(&mut self, index: usize, _cell: Position, _distance: u32) {
        self.queue.push_back(index);
    }

    fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }
}
