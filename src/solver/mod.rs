use crate::error::SearchError;
use crate::pathing_grid::{BarrierMap, PathingGrid};
use crate::search::{CancelToken, Search, SearchOutcome};
use grid_util::Point;
use smallvec::SmallVec;

pub mod astar;
pub mod dijkstra;

use astar::{manhattan_distance, AstarSolver};
use dijkstra::DijkstraSolver;

/// A best-first search strategy on the 4-connected grid. Implementors only choose the heuristic;
/// frontier order, tie-breaking and the step-by-step driving are shared through [Search].
pub trait GridSolver {
    /// Estimated remaining cost from `p1` to `p2`. Must not overestimate for the returned paths
    /// to be shortest.
    fn heuristic(&self, p1: &Point, p2: &Point) -> i32;

    /// Unit cost per axis-aligned step.
    fn cost(&self, p1: &Point, p2: &Point) -> i32 {
        manhattan_distance(p1, p2)
    }

    fn successors(&self, barriers: &BarrierMap, node: &Point) -> SmallVec<[(Point, i32); 4]> {
        barriers
            .open_neighbours(node)
            .into_iter()
            .map(|p| (p, self.cost(node, &p)))
            .collect()
    }

    /// Starts a run between the grid's start and end cells.
    fn search(&self, grid: &PathingGrid) -> Result<Search<Self>, SearchError>
    where
        Self: Clone + Sized,
    {
        self.search_with_cancel(grid, CancelToken::new())
    }

    fn search_with_cancel(
        &self,
        grid: &PathingGrid,
        cancel: CancelToken,
    ) -> Result<Search<Self>, SearchError>
    where
        Self: Clone + Sized,
    {
        let (start, goal) = grid.endpoints()?;
        Ok(Search::with_cancel(
            self.clone(),
            grid.barrier_map(),
            start,
            goal,
            cancel,
        ))
    }

    /// Runs a search between the grid's start and end cells to completion.
    fn get_path_single_goal(&self, grid: &PathingGrid) -> Result<SearchOutcome, SearchError>
    where
        Self: Clone + Sized,
    {
        Ok(self.search(grid)?.run())
    }

    /// Total cost of following `path` one cell at a time.
    fn get_path_cost(&self, path: &[Point]) -> i32 {
        path.windows(2).map(|w| self.cost(&w[0], &w[1])).sum()
    }
}

/// The algorithms offered by the visualizer, dispatched at runtime.
#[derive(Clone, Debug, PartialEq)]
pub enum Algorithm {
    Dijkstra(DijkstraSolver),
    Astar(AstarSolver),
}

impl Algorithm {
    /// The algorithm bound to a key press: `d` for Dijkstra, `a` for A*.
    pub fn from_key(key: char) -> Option<Algorithm> {
        match key.to_ascii_lowercase() {
            'd' => Some(Algorithm::Dijkstra(DijkstraSolver)),
            'a' => Some(Algorithm::Astar(AstarSolver::new())),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra(_) => "Dijkstra",
            Algorithm::Astar(_) => "A*",
        }
    }
}

impl GridSolver for Algorithm {
    fn heuristic(&self, p1: &Point, p2: &Point) -> i32 {
        match self {
            Algorithm::Dijkstra(s) => s.heuristic(p1, p2),
            Algorithm::Astar(s) => s.heuristic(p1, p2),
        }
    }
}
