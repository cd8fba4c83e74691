//! # grid_pathsearch
//!
//! Path discovery on a bounded 4-connected grid with static obstacles. Answers two questions
//! about a [GridModel]: what are all the simple (cycle-free) routes from start to goal, and what is
//! one shortest route. Every step has unit cost.
//!
//! - [enumerate_paths] runs an exhaustive depth-first backtracking search ([PathEnumerator]).
//! - [shortest_path] runs either a breadth-first search or A* with the
//!   [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as heuristic
//!   ([Strategy]). Both return a path of the same length.
//! - [summarize] combines both into a [ResultSet].
//!
//! Neighbours are always generated in the order Up, Down, Left, Right, which makes the order of
//! enumerated paths and the tie-breaks of both searches reproducible. Connected components are
//! computed when the model is built so that unreachable goals are answered without searching.
//!
//! ```
//! use grid_pathsearch::{summarize, Cell, GridModel};
//!
//! // |S  |
//! // | # |
//! // |  G|
//! let grid = GridModel::new(3, 3, [Cell::new(1, 1)], Cell::new(0, 0), Cell::new(2, 2)).unwrap();
//! let result = summarize(&grid);
//! assert_eq!(result.total_paths, 2);
//! assert_eq!(result.shortest_path.map(|p| p.len()), Some(5));
//! ```
mod cell;
pub mod enumerate;
mod error;
mod grid_model;
pub mod search;
pub mod solver;
mod summary;

pub use cell::{Cell, Direction};
pub use enumerate::{EnumerationLimits, EnumerationReport, PathEnumerator, PathSet, Truncation};
pub use error::{ModelError, Result};
pub use grid_model::GridModel;
pub use solver::Strategy;
pub use summary::ResultSet;

/// An ordered sequence of cells from start to goal.
pub type Path = Vec<Cell>;

/// Number of unit steps along a path; the empty path and the single-cell path cost nothing.
pub fn path_cost(path: &[Cell]) -> usize {
    path.len().saturating_sub(1)
}

/// Every simple path from the start to the goal of `grid`, in depth-first discovery order.
pub fn enumerate_paths(grid: &GridModel) -> PathSet {
    PathEnumerator::new().enumerate(grid)
}

/// A shortest path from the start to the goal of `grid` using the given strategy, or [None] if
/// the goal is unreachable.
pub fn shortest_path(grid: &GridModel, strategy: Strategy) -> Option<Path> {
    strategy.get_path_single_goal(grid)
}

/// Path count, first discovered path and an A* shortest path of `grid`.
pub fn summarize(grid: &GridModel) -> ResultSet {
    ResultSet::assemble(grid, &PathEnumerator::new(), Strategy::AStar)
}
