//! # pathfinding_visualizer
//!
//! An interactive grid pathfinding demonstrator. A user places a start cell, an end cell and
//! barriers on a square grid, then watches
//! [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) or
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) explore it one node at a time.
//!
//! Movement is 4-directional with unit cost per step, so the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) is a consistent heuristic
//! and both algorithms return shortest paths. Both are the same best-first search over a frontier
//! ordered by (key, discovery sequence), differing only in the key; the search is driven one
//! [Step](search::Step) at a time so a front end can render every expansion and cancel at will.
//!
//! ```
//! use pathfinding_visualizer::{at, pathing_grid::PathingGrid};
//! use pathfinding_visualizer::solver::{astar::AstarSolver, GridSolver};
//!
//! let grid: PathingGrid = "S....\n.....\n.....\n.....\n....E".parse().unwrap();
//! let outcome = AstarSolver::new().get_path_single_goal(&grid).unwrap();
//! assert_eq!(outcome.path_length(), Some(8));
//! assert_eq!(outcome.path().unwrap().first(), Some(&at(1, 0)));
//! ```
pub mod best_first;
pub mod config;
pub mod error;
pub mod pathing_grid;
pub mod search;
pub mod solver;
pub mod visualizer;

use grid_util::Point;

pub use error::{ConfigError, GridError, SearchError, VisualizerError};
pub use pathing_grid::{CellTag, PathingGrid};
pub use search::{CancelToken, Search, SearchEvent, SearchOutcome, SearchReport, Step};
pub use solver::{astar::AstarSolver, dijkstra::DijkstraSolver, Algorithm, GridSolver};

/// Grid rows (and columns) of the reference configuration.
pub const DEFAULT_ROWS: usize = 50;

/// The grid position of the cell at `row`, `col`.
pub fn at(row: usize, col: usize) -> Point {
    Point::new(col as i32, row as i32)
}
