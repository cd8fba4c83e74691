use crate::enumerate::{PathEnumerator, Truncation};
use crate::solver::Strategy;
use crate::{path_cost, GridModel, Path};
use log::debug;
use std::ops::ControlFlow;

/// What a collaborator needs to present a query: how many simple paths exist, the first one found,
/// and a shortest one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub total_paths: usize,
    pub exemplar_path: Option<Path>,
    pub shortest_path: Option<Path>,
    /// Set when `total_paths` is a lower bound because the enumeration hit a limit.
    pub truncated: Option<Truncation>,
}

impl ResultSet {
    /// Counts the paths with `enumerator`, keeping only the first one, and asks `strategy` for a
    /// shortest path.
    pub fn assemble(
        grid: &GridModel,
        enumerator: &PathEnumerator,
        strategy: Strategy,
    ) -> ResultSet {
        let mut exemplar_path = None;
        let report = enumerator.for_each_path(grid, |path| {
            if exemplar_path.is_none() {
                exemplar_path = Some(path.to_vec());
            }
            ControlFlow::Continue(())
        });
        let shortest_path = strategy.get_path_single_goal(grid);
        debug!(
            "{} paths from {} to {}, shortest has {:?} steps",
            report.paths,
            grid.start(),
            grid.goal(),
            shortest_path.as_deref().map(path_cost)
        );
        ResultSet {
            total_paths: report.paths,
            exemplar_path,
            shortest_path,
            truncated: report.truncated,
        }
    }

    /// Number of unit steps of the shortest path.
    pub fn shortest_cost(&self) -> Option<usize> {
        self.shortest_path.as_deref().map(path_cost)
    }

    pub fn is_complete(&self) -> bool {
        self.truncated.is_none()
    }
}
