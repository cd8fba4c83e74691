use crate::search::bfs;
use crate::{solver::GridSolver, Cell, GridModel, Path};

/// Uninformed breadth-first search. Cells are finalized in order of their distance from the start
/// and ties are broken by the Up, Down, Left, Right neighbour order.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsSolver;

impl GridSolver for BfsSolver {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn search(&self, grid: &GridModel, start: Cell, goal: Cell) -> Option<Path> {
        bfs(&start, |node| grid.neighbours(*node), |node| *node == goal)
    }
}
