use crate::cell::{Cell, Direction};
use crate::error::{ModelError, Result};
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use itertools::Itertools;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// [GridModel] is the immutable description of a search space: a `rows` x `cols` grid, the cells
/// blocked by obstacles ([true] in the [BoolGrid]), and the start and goal of the query.
/// Connected components are computed once using a [UnionFind] so that unreachable goals can be
/// rejected without searching.
#[derive(Clone, Debug)]
pub struct GridModel {
    rows: usize,
    cols: usize,
    grid: BoolGrid,
    obstacle_count: usize,
    start: Cell,
    goal: Cell,
    components: UnionFind<usize>,
}

impl GridModel {
    /// Validates the description and builds the model. Fails if the grid is empty, if start, goal
    /// or any obstacle lies outside the grid, or if start or goal is blocked. An unreachable goal
    /// is not an error.
    pub fn new<I>(rows: usize, cols: usize, obstacles: I, start: Cell, goal: Cell) -> Result<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        if rows == 0 || cols == 0 {
            return Err(ModelError::EmptyGrid { rows, cols });
        }
        // Cells are addressed with i32 coordinates.
        if i32::try_from(rows).is_err() || i32::try_from(cols).is_err() {
            return Err(ModelError::GridTooLarge { rows, cols });
        }
        let mut model = GridModel {
            rows,
            cols,
            grid: BoolGrid::new(cols, rows, false),
            obstacle_count: 0,
            start,
            goal,
            components: UnionFind::new(0),
        };
        if !model.in_bounds(start) {
            return Err(ModelError::StartOutOfBounds(start));
        }
        if !model.in_bounds(goal) {
            return Err(ModelError::GoalOutOfBounds(goal));
        }
        for obstacle in obstacles {
            if !model.in_bounds(obstacle) {
                return Err(ModelError::ObstacleOutOfBounds(obstacle));
            }
            if !model.grid.get_point(obstacle.point()) {
                model.grid.set_point(obstacle.point(), true);
                model.obstacle_count += 1;
            }
        }
        model.check_endpoints()?;
        model.generate_components();
        debug!(
            "Built {}x{} grid with {} obstacles, start {} and goal {}",
            rows, cols, model.obstacle_count, start, goal
        );
        Ok(model)
    }

    /// A model with the same dimensions and obstacles but different endpoints. The connected
    /// components are shared rather than recomputed.
    pub fn with_endpoints(&self, start: Cell, goal: Cell) -> Result<Self> {
        if !self.in_bounds(start) {
            return Err(ModelError::StartOutOfBounds(start));
        }
        if !self.in_bounds(goal) {
            return Err(ModelError::GoalOutOfBounds(goal));
        }
        let model = GridModel {
            start,
            goal,
            ..self.clone()
        };
        model.check_endpoints()?;
        Ok(model)
    }

    fn check_endpoints(&self) -> Result<()> {
        if self.is_blocked(self.start) {
            return Err(ModelError::StartBlocked(self.start));
        }
        if self.is_blocked(self.goal) {
            return Err(ModelError::GoalBlocked(self.goal));
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn start(&self) -> Cell {
        self.start
    }
    pub fn goal(&self) -> Cell {
        self.goal
    }
    pub fn obstacle_count(&self) -> usize {
        self.obstacle_count
    }

    /// The obstacle cells in row-major order.
    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32)
            .cartesian_product(0..self.cols as i32)
            .map(|(row, col)| Cell::new(row, col))
            .filter(|&c| self.is_blocked(c))
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    /// Whether an in-bounds cell is covered by an obstacle. Out-of-bounds cells are not blocked,
    /// they are simply not part of the grid.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.grid.get_point(cell.point())
    }

    /// Whether a robot may stand on the cell.
    pub fn is_traversable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.grid.get_point(cell.point())
    }

    /// Row-major index of an in-bounds cell, used to address per-cell scratch buffers.
    pub(crate) fn index(&self, cell: Cell) -> usize {
        debug_assert!(self.in_bounds(cell));
        cell.row as usize * self.cols + cell.col as usize
    }

    /// Number of cells on the grid.
    pub(crate) fn area(&self) -> usize {
        self.rows * self.cols
    }

    /// The traversable 4-connected neighbours of `cell`, in the fixed order
    /// Up, Down, Left, Right. Search results depend on this order.
    pub fn neighbours(&self, cell: Cell) -> SmallVec<[Cell; 4]> {
        Direction::ALL
            .into_iter()
            .map(|d| cell.step(d))
            .filter(|&n| self.is_traversable(n))
            .collect()
    }

    /// Retrieves the component id a given [Cell] belongs to, or [None] if the cell is blocked or
    /// outside the grid.
    pub fn get_component(&self, cell: Cell) -> Option<usize> {
        self.is_traversable(cell)
            .then(|| self.components.find(self.index(cell)))
    }

    /// Checks if two cells are on the same connected component.
    pub fn reachable(&self, from: Cell, to: Cell) -> bool {
        !self.unreachable(from, to)
    }

    /// Checks if two cells are not on the same connected component. Cells that are outside the
    /// grid or blocked are unreachable from everything.
    pub fn unreachable(&self, from: Cell, to: Cell) -> bool {
        if self.is_traversable(from) && self.is_traversable(to) {
            !self.components.equiv(self.index(from), self.index(to))
        } else {
            true
        }
    }

    /// Checks whether `path` satisfies the path contract for this model: it runs from start to
    /// goal over traversable cells, every consecutive pair is 4-adjacent and no cell repeats.
    pub fn is_valid_path(&self, path: &[Cell]) -> bool {
        match (path.first(), path.last()) {
            (Some(&first), Some(&last)) => {
                first == self.start
                    && last == self.goal
                    && path.iter().all(|&c| self.is_traversable(c))
                    && path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
                    && path.iter().all_unique()
            }
            _ => false,
        }
    }

    /// Generates a new [UnionFind] structure and links up traversable grid neighbours to the
    /// same components.
    fn generate_components(&mut self) {
        self.components = UnionFind::new(self.area());
        for row in 0..self.rows as i32 {
            for col in 0..self.cols as i32 {
                let cell = Cell::new(row, col);
                if !self.is_traversable(cell) {
                    continue;
                }
                let parent_ix = self.index(cell);
                // Up and Left were already linked from the other side.
                for n in [cell.step(Direction::Down), cell.step(Direction::Right)] {
                    if self.is_traversable(n) {
                        let ix = self.index(n);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows as i32 {
            for col in 0..self.cols as i32 {
                let c = Cell::new(row, col);
                let symbol = if c == self.start {
                    'S'
                } else if c == self.goal {
                    'G'
                } else if self.is_blocked(c) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(i32, i32)]) -> Vec<Cell> {
        coords.iter().map(|&c| Cell::from(c)).collect()
    }

    #[test]
    fn rejects_invalid_models() {
        let origin = Cell::new(0, 0);
        assert_eq!(
            GridModel::new(0, 3, [], origin, origin).unwrap_err(),
            ModelError::EmptyGrid { rows: 0, cols: 3 }
        );
        assert_eq!(
            GridModel::new(3, 3, [], Cell::new(3, 0), origin).unwrap_err(),
            ModelError::StartOutOfBounds(Cell::new(3, 0))
        );
        assert_eq!(
            GridModel::new(3, 3, [], origin, Cell::new(0, -1)).unwrap_err(),
            ModelError::GoalOutOfBounds(Cell::new(0, -1))
        );
        assert_eq!(
            GridModel::new(3, 3, cells(&[(1, 3)]), origin, origin).unwrap_err(),
            ModelError::ObstacleOutOfBounds(Cell::new(1, 3))
        );
        assert_eq!(
            GridModel::new(3, 3, cells(&[(0, 0)]), origin, Cell::new(2, 2)).unwrap_err(),
            ModelError::StartBlocked(origin)
        );
        assert_eq!(
            GridModel::new(3, 3, cells(&[(2, 2)]), origin, Cell::new(2, 2)).unwrap_err(),
            ModelError::GoalBlocked(Cell::new(2, 2))
        );
    }

    /// Sizes beyond the i32 coordinate range are rejected before anything is allocated.
    #[test]
    fn rejects_oversized_grids() {
        let origin = Cell::new(0, 0);
        let too_many = i32::MAX as usize + 1;
        assert_eq!(
            GridModel::new(too_many, 1, [], origin, origin).unwrap_err(),
            ModelError::GridTooLarge {
                rows: too_many,
                cols: 1
            }
        );
        assert_eq!(
            GridModel::new(1, too_many, [], origin, origin).unwrap_err(),
            ModelError::GridTooLarge {
                rows: 1,
                cols: too_many
            }
        );
    }

    #[test]
    fn duplicate_obstacles_are_counted_once() {
        let model = GridModel::new(
            2,
            4,
            cells(&[(1, 3), (0, 2), (1, 3)]),
            Cell::new(0, 0),
            Cell::new(1, 0),
        )
        .unwrap();
        assert_eq!(model.obstacle_count(), 2);
        assert_eq!(
            model.obstacles().collect::<Vec<_>>(),
            cells(&[(0, 2), (1, 3)])
        );
    }

    /// Neighbours come out as Up, Down, Left, Right with blocked and outside cells skipped.
    #[test]
    fn neighbour_order() {
        //  ___
        // |.#.|
        // |...|
        // |...|
        //  ___
        let model =
            GridModel::new(3, 3, cells(&[(0, 1)]), Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        assert_eq!(
            model.neighbours(Cell::new(1, 1)).to_vec(),
            cells(&[(2, 1), (1, 0), (1, 2)])
        );
        assert_eq!(
            model.neighbours(Cell::new(0, 0)).to_vec(),
            cells(&[(1, 0)])
        );
        assert_eq!(
            model.neighbours(Cell::new(2, 2)).to_vec(),
            cells(&[(1, 2), (2, 1)])
        );
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        //  ___
        // |.#.|
        // |##.|
        // |...|
        //  ___
        let model = GridModel::new(
            3,
            3,
            cells(&[(0, 1), (1, 0), (1, 1)]),
            Cell::new(0, 0),
            Cell::new(2, 2),
        )
        .unwrap();
        assert!(model.unreachable(Cell::new(0, 0), Cell::new(2, 2)));
        assert!(model.reachable(Cell::new(0, 2), Cell::new(2, 0)));
        assert!(model.unreachable(Cell::new(0, 2), Cell::new(1, 1)));
        assert!(model.unreachable(Cell::new(0, 2), Cell::new(5, 5)));
        assert!(model.get_component(Cell::new(0, 2)).is_some());
        assert_eq!(
            model.get_component(Cell::new(0, 2)),
            model.get_component(Cell::new(2, 0))
        );
        assert_ne!(
            model.get_component(Cell::new(0, 0)),
            model.get_component(Cell::new(2, 2))
        );
        assert_eq!(model.get_component(Cell::new(1, 1)), None);
        assert_eq!(model.get_component(Cell::new(5, 5)), None);
        assert_eq!(model.get_component(Cell::new(-1, 0)), None);
    }

    #[test]
    fn with_endpoints_keeps_layout() {
        let model =
            GridModel::new(3, 3, cells(&[(1, 1)]), Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        let moved = model.with_endpoints(Cell::new(2, 0), Cell::new(0, 2)).unwrap();
        assert_eq!(moved.obstacle_count(), 1);
        assert!(moved.reachable(moved.start(), moved.goal()));
        assert_eq!(
            model.with_endpoints(Cell::new(1, 1), Cell::new(0, 2)).unwrap_err(),
            ModelError::StartBlocked(Cell::new(1, 1))
        );
    }

    #[test]
    fn path_contract() {
        let model =
            GridModel::new(3, 3, cells(&[(1, 1)]), Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        assert!(model.is_valid_path(&cells(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)])));
        // Through the obstacle
        assert!(!model.is_valid_path(&cells(&[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)])));
        // Diagonal step
        assert!(!model.is_valid_path(&cells(&[(0, 0), (1, 0), (2, 1), (2, 2)])));
        // Revisits the start
        assert!(!model.is_valid_path(&cells(&[
            (0, 0),
            (0, 1),
            (0, 0),
            (1, 0),
            (2, 0),
            (2, 1),
            (2, 2)
        ])));
        assert!(!model.is_valid_path(&[]));
    }

    #[test]
    fn display_marks_cells() {
        let model =
            GridModel::new(2, 3, cells(&[(0, 1)]), Cell::new(0, 0), Cell::new(1, 2)).unwrap();
        assert_eq!(format!("{}", model), "S#.\n..G\n");
    }
}
