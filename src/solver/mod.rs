use crate::{path_cost, Cell, GridModel, Path};
use log::{debug, info, warn};

pub mod astar;
pub mod bfs;

use astar::AstarSolver;
use bfs::BfsSolver;

/// A shortest-path search on a [GridModel]. Every step costs 1, so any implementation must return
/// a path with the minimal number of cells.
pub trait GridSolver {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Runs the search between two traversable cells. Called only when `start` and `goal` are on
    /// the same connected component.
    fn search(&self, grid: &GridModel, start: Cell, goal: Cell) -> Option<Path>;

    /// Computes a shortest path from the start to the goal of `grid`, or [None] if the goal cannot
    /// be reached.
    fn get_path_single_goal(&self, grid: &GridModel) -> Option<Path> {
        let start = grid.start();
        let goal = grid.goal();
        // Check if start and goal are on the same connected component.
        if grid.unreachable(start, goal) {
            info!("{} is not reachable from {}", goal, start);
            return None;
        }
        let path = self.search(grid, start, goal);
        match &path {
            Some(p) => debug!(
                "{} found a path from {} to {} with {} steps",
                self.name(),
                start,
                goal,
                self.get_path_cost(p)
            ),
            None => warn!(
                "{}: reachable goal {} could not be pathed to, is the component map correct?",
                self.name(),
                goal
            ),
        }
        path
    }

    /// Number of unit steps along the path.
    fn get_path_cost(&self, path: &[Cell]) -> usize {
        path_cost(path)
    }
}

/// Selects which [GridSolver] answers a shortest-path query. Both strategies agree on path length
/// but may pick different paths among several of equal length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Uninformed breadth-first search, see [BfsSolver].
    BreadthFirst,
    /// Manhattan-guided best-first search, see [AstarSolver].
    #[default]
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::BreadthFirst, Strategy::AStar];

    pub fn get_path_single_goal(self, grid: &GridModel) -> Option<Path> {
        match self {
            Strategy::BreadthFirst => BfsSolver.get_path_single_goal(grid),
            Strategy::AStar => AstarSolver.get_path_single_goal(grid),
        }
    }
}
