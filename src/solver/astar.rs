use grid_util::Point;

use crate::solver::GridSolver;

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry): the exact cost of an
/// unobstructed path on the 4-connected grid.
pub fn manhattan_distance(p1: &Point, p2: &Point) -> i32 {
    p1.manhattan_distance(p2)
}

/// Straight-line distance between two cells. Admissible on the 4-connected grid but not used by
/// [AstarSolver], which orders by [manhattan_distance].
pub fn euclidean_distance(p1: &Point, p2: &Point) -> f32 {
    p1.euclidean_distance(p2)
}

/// A* with the Manhattan distance to the end as heuristic.
#[derive(Clone, Debug, PartialEq)]
pub struct AstarSolver {
    /// Multiplies the heuristic. Values above 1 trade path optimality for fewer expansions.
    pub heuristic_factor: f32,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic_factor: 1.0,
        }
    }
}

impl Default for AstarSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GridSolver for AstarSolver {
    /// Just the cost times a heuristic factor.
    fn heuristic(&self, p1: &Point, p2: &Point) -> i32 {
        (self.cost(p1, p2) as f32 * self.heuristic_factor) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at;
    use crate::pathing_grid::PathingGrid;
    use crate::search::SearchOutcome;
    use crate::solver::dijkstra::DijkstraSolver;

    #[test]
    fn distances() {
        assert_eq!(manhattan_distance(&at(0, 0), &at(4, 4)), 8);
        assert_eq!(manhattan_distance(&at(3, 1), &at(1, 2)), 3);
        assert!((euclidean_distance(&at(0, 0), &at(3, 4)) - 5.0).abs() < 1e-6);
    }

    /// Asserts that the optimal 8 step solution is found on an open grid.
    #[test]
    fn solve_open_grid() {
        let grid: PathingGrid = "S....\n.....\n.....\n.....\n....E".parse().unwrap();
        let outcome = AstarSolver::new().get_path_single_goal(&grid).unwrap();
        let path = outcome.path().unwrap();
        assert_eq!(outcome.path_length(), Some(8));
        assert_eq!(
            path,
            &[
                at(1, 0),
                at(2, 0),
                at(3, 0),
                at(4, 0),
                at(4, 1),
                at(4, 2),
                at(4, 3)
            ]
        );
        assert_eq!(outcome.discovered(), 24);
    }

    #[test]
    fn explores_less_than_dijkstra_towards_the_goal() {
        let mut grid = PathingGrid::new(10).unwrap();
        grid.place(at(5, 0));
        grid.place(at(5, 9));
        let astar = AstarSolver::new().get_path_single_goal(&grid).unwrap();
        let dijkstra = DijkstraSolver.get_path_single_goal(&grid).unwrap();
        assert_eq!(astar.path_length(), Some(9));
        assert_eq!(astar.path(), dijkstra.path());
        assert_eq!(astar.discovered(), 27);
        assert_eq!(dijkstra.discovered(), 83);
    }

    #[test]
    fn detour_around_a_wall() {
        let grid: PathingGrid = "S....\n.....\n####.\n.....\n....E".parse().unwrap();
        let outcome = AstarSolver::new().get_path_single_goal(&grid).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                path: vec![
                    at(1, 0),
                    at(1, 1),
                    at(1, 2),
                    at(1, 3),
                    at(1, 4),
                    at(2, 4),
                    at(3, 4)
                ],
                discovered: 13
            }
        );
    }

    /// A pending cell reached more cheaply keeps the key it was queued with, so it is not
    /// expanded earlier and no extra cell is discovered before the end is popped.
    #[test]
    fn improved_pending_cell_keeps_its_key() {
        // |S#    |
        // |   # #|
        // |##    |
        // |   ###|
        // |  #   |
        // |     E|
        let grid: PathingGrid = "S#....\n...#.#\n##....\n...###\n..#...\n.....E"
            .parse()
            .unwrap();
        let path = vec![
            at(1, 0),
            at(1, 1),
            at(1, 2),
            at(2, 2),
            at(3, 2),
            at(3, 1),
            at(4, 1),
            at(5, 1),
            at(5, 2),
            at(5, 3),
            at(5, 4),
        ];
        assert_eq!(
            AstarSolver::new().get_path_single_goal(&grid).unwrap(),
            SearchOutcome::Found {
                path: path.clone(),
                discovered: 24
            }
        );
        assert_eq!(
            DijkstraSolver.get_path_single_goal(&grid).unwrap(),
            SearchOutcome::Found {
                path,
                discovered: 26
            }
        );
    }

    #[test]
    fn inflated_heuristic_still_finds_a_path() {
        let grid: PathingGrid = "S....\n.....\n####.\n.....\n....E".parse().unwrap();
        let solver = AstarSolver {
            heuristic_factor: 2.0,
        };
        assert_eq!(solver.heuristic(&at(0, 0), &at(4, 4)), 16);
        let outcome = solver.get_path_single_goal(&grid).unwrap();
        assert!(outcome.path_length().is_some());
    }
}
