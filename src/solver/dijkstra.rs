use grid_util::Point;

use crate::solver::GridSolver;

/// Uniform-cost search: the frontier is ordered by distance from the start alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn heuristic(&self, _: &Point, _: &Point) -> i32 {
        0
    }
}
