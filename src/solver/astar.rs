use crate::search::astar;
use crate::{solver::GridSolver, Cell, GridModel, Path};

/// A* with the Manhattan distance as heuristic. The heuristic is consistent on a 4-connected
/// uniform-cost grid, so the first time the goal is popped its path is a shortest one. Among
/// nodes of equal estimated cost the one queued first is expanded first.
#[derive(Clone, Copy, Debug, Default)]
pub struct AstarSolver;

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver
    }

    pub fn heuristic(&self, p1: &Cell, p2: &Cell) -> u32 {
        p1.manhattan_distance(p2)
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn search(&self, grid: &GridModel, start: Cell, goal: Cell) -> Option<Path> {
        astar(
            &start,
            |node| grid.neighbours(*node).into_iter().map(|n| (n, 1u32)),
            |node| self.heuristic(node, &goal),
            |node| *node == goal,
        )
        .map(|(path, _cost)| path)
    }
}
