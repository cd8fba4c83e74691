//! Exhaustive enumeration of simple paths by depth-first backtracking.
//!
//! The search keeps a single path buffer and an explicit stack of frames, one per cell on the
//! current path, each holding the cell's neighbours and a cursor into them. A cell is pushed
//! when a frame advances onto it and popped when its own frame is exhausted, so the order in
//! which paths are discovered is the same as that of the recursive formulation: always expand
//! the first viable neighbour in Up, Down, Left, Right order.
use crate::{Cell, GridModel, Path};
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use log::{debug, info, warn};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::ops::ControlFlow;

/// Budgets for an enumeration. The number of simple paths grows exponentially with the open area
/// of the grid, so callers that need bounded latency should set one of these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnumerationLimits {
    /// Stop once this many paths were found and another one exists.
    pub max_paths: Option<usize>,
    /// Stop before extending the current path for the `max_expansions + 1`-th time.
    pub max_expansions: Option<u64>,
}

impl EnumerationLimits {
    pub fn unlimited() -> EnumerationLimits {
        EnumerationLimits::default()
    }
}

/// Why an enumeration did not visit every path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Truncation {
    PathLimit,
    ExpansionLimit,
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Truncation::PathLimit => write!(f, "path limit reached"),
            Truncation::ExpansionLimit => write!(f, "expansion limit reached"),
        }
    }
}

/// Counters of a finished enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnumerationReport {
    /// Paths handed to the visitor.
    pub paths: usize,
    /// Times the current path was extended by a cell other than the goal.
    pub expansions: u64,
    /// Branches rejected because the goal could not be reached from them.
    pub pruned: u64,
    /// Set when a limit stopped the enumeration before every path was found.
    pub truncated: Option<Truncation>,
}

/// All simple paths found by [PathEnumerator::enumerate], in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathSet {
    paths: Vec<Path>,
    truncated: Option<Truncation>,
}

impl PathSet {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }

    /// The first path discovered, which always took the first viable neighbour.
    pub fn exemplar(&self) -> Option<&Path> {
        self.paths.first()
    }

    /// The earliest discovered path among those with the fewest cells.
    pub fn shortest(&self) -> Option<&Path> {
        self.paths.iter().min_by_key(|p| p.len())
    }

    pub fn contains(&self, path: &[Cell]) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// [None] when the set holds every simple path of the model.
    pub fn truncated(&self) -> Option<Truncation> {
        self.truncated
    }

    pub fn is_complete(&self) -> bool {
        self.truncated.is_none()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Neighbours of one cell on the current path and how many of them were tried.
struct Frame {
    neighbours: SmallVec<[Cell; 4]>,
    next: usize,
}

impl Frame {
    fn new(grid: &GridModel, cell: Cell) -> Frame {
        Frame {
            neighbours: grid.neighbours(cell),
            next: 0,
        }
    }

    fn advance(&mut self) -> Option<Cell> {
        let n = self.neighbours.get(self.next).copied();
        self.next += 1;
        n
    }
}

/// Flood fill used to reject branches from which the goal cannot be reached without crossing the
/// current path. Cells are marked with a per-query stamp so the buffer is never cleared.
struct Reachability {
    seen: Vec<u32>,
    stamp: u32,
    queue: VecDeque<Cell>,
}

impl Reachability {
    fn new(area: usize) -> Reachability {
        Reachability {
            seen: vec![0; area],
            stamp: 0,
            queue: VecDeque::new(),
        }
    }

    fn goal_reachable(&mut self, grid: &GridModel, from: Cell, on_path: &BoolGrid) -> bool {
        let goal = grid.goal();
        if from == goal {
            return true;
        }
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.seen.iter_mut().for_each(|s| *s = 0);
            self.stamp = 1;
        }
        self.queue.clear();
        self.queue.push_back(from);
        self.seen[grid.index(from)] = self.stamp;
        while let Some(cell) = self.queue.pop_front() {
            for n in grid.neighbours(cell) {
                if n == goal {
                    return true;
                }
                let ix = grid.index(n);
                if self.seen[ix] == self.stamp || on_path.get_point(n.point()) {
                    continue;
                }
                self.seen[ix] = self.stamp;
                self.queue.push_back(n);
            }
        }
        false
    }
}

/// Depth-first enumeration of every path from start to goal that visits no cell twice.
#[derive(Clone, Debug)]
pub struct PathEnumerator {
    pub limits: EnumerationLimits,
    /// Skip branches that cannot reach the goal. Does not change which paths are found nor their
    /// order, only how much work it takes.
    pub prune_unreachable: bool,
}

impl Default for PathEnumerator {
    fn default() -> PathEnumerator {
        PathEnumerator {
            limits: EnumerationLimits::unlimited(),
            prune_unreachable: true,
        }
    }
}

impl PathEnumerator {
    pub fn new() -> PathEnumerator {
        PathEnumerator::default()
    }

    pub fn with_limits(limits: EnumerationLimits) -> PathEnumerator {
        PathEnumerator {
            limits,
            ..PathEnumerator::default()
        }
    }

    /// Collects every simple path of the model into a [PathSet].
    pub fn enumerate(&self, grid: &GridModel) -> PathSet {
        let mut paths = Vec::new();
        let report = self.for_each_path(grid, |path| {
            paths.push(path.to_vec());
            ControlFlow::Continue(())
        });
        PathSet {
            paths,
            truncated: report.truncated,
        }
    }

    /// Counts the simple paths of the model without storing them.
    pub fn count_paths(&self, grid: &GridModel) -> EnumerationReport {
        self.for_each_path(grid, |_| ControlFlow::Continue(()))
    }

    /// Calls `visit` with each simple path from start to goal in discovery order. The slice is
    /// only valid for the duration of the call. Returning [ControlFlow::Break] stops the
    /// enumeration.
    pub fn for_each_path<F>(&self, grid: &GridModel, mut visit: F) -> EnumerationReport
    where
        F: FnMut(&[Cell]) -> ControlFlow<()>,
    {
        let start = grid.start();
        let goal = grid.goal();
        let mut report = EnumerationReport::default();
        if grid.unreachable(start, goal) {
            info!("{} is not reachable from {}, no paths to enumerate", goal, start);
            return report;
        }
        let mut path: Path = vec![start];
        if start == goal {
            if self.limits.max_paths == Some(0) {
                report.truncated = Some(Truncation::PathLimit);
                warn!("Enumeration at {} truncated before its only path", start);
                return report;
            }
            report.paths = 1;
            // The only path, so there is nothing left to stop.
            let _ = visit(&path);
            return report;
        }

        let mut on_path = BoolGrid::new(grid.cols(), grid.rows(), false);
        on_path.set_point(start.point(), true);
        let mut reachability = self
            .prune_unreachable
            .then(|| Reachability::new(grid.area()));
        let mut stack = vec![Frame::new(grid, start)];

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.advance(),
                None => break,
            };
            let Some(next) = next else {
                // Every neighbour of the last cell was tried, retract it.
                stack.pop();
                if let Some(cell) = path.pop() {
                    on_path.set_point(cell.point(), false);
                }
                continue;
            };
            if on_path.get_point(next.point()) {
                continue;
            }
            if let Some(reachability) = reachability.as_mut() {
                if !reachability.goal_reachable(grid, next, &on_path) {
                    report.pruned += 1;
                    continue;
                }
            }
            if next == goal {
                if self.limits.max_paths.is_some_and(|max| report.paths >= max) {
                    report.truncated = Some(Truncation::PathLimit);
                    break;
                }
                path.push(next);
                report.paths += 1;
                let flow = visit(&path);
                path.pop();
                if flow.is_break() {
                    break;
                }
                continue;
            }
            if self
                .limits
                .max_expansions
                .is_some_and(|max| report.expansions >= max)
            {
                report.truncated = Some(Truncation::ExpansionLimit);
                break;
            }
            report.expansions += 1;
            path.push(next);
            on_path.set_point(next.point(), true);
            stack.push(Frame::new(grid, next));
        }

        if let Some(truncation) = report.truncated {
            warn!(
                "Enumeration from {} to {} truncated after {} paths: {}",
                start, goal, report.paths, truncation
            );
        }
        debug!(
            "Enumerated {} paths from {} to {} ({} expansions, {} pruned)",
            report.paths, start, goal, report.expansions, report.pruned
        );
        report
    }
}
