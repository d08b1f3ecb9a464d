//! Fuzzes the search engine on many random grids: a path is found exactly when the end is on the
//! start's connected component, Dijkstra and A* agree on its length, and a failed search has
//! discovered every cell it could reach.
use grid_util::Point;
use pathfinding_visualizer::{
    at, AstarSolver, CellTag, DijkstraSolver, GridSolver, PathingGrid, SearchOutcome,
};
use rand::prelude::*;

fn random_grid(n: usize, rng: &mut StdRng) -> PathingGrid {
    let mut grid = PathingGrid::new(n).unwrap();
    for row in 0..n {
        for col in 0..n {
            if rng.gen_bool(0.4) {
                grid.set_tag(at(row, col), CellTag::Barrier);
            }
        }
    }
    grid.set_tag(at(0, 0), CellTag::Start);
    grid.set_tag(at(n - 1, n - 1), CellTag::End);
    grid.update();
    grid
}

fn assert_valid_path(grid: &PathingGrid, path: &[Point]) {
    let (start, end) = grid.endpoints().unwrap();
    let full: Vec<Point> = std::iter::once(start)
        .chain(path.iter().copied())
        .chain(std::iter::once(end))
        .collect();
    for w in full.windows(2) {
        assert_eq!(w[0].manhattan_distance(&w[1]), 1);
        assert!(!grid.is_barrier(&w[1]));
    }
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..N_GRIDS {
        let grid = random_grid(N, &mut rng);
        let start = at(0, 0);
        let end = at(N - 1, N - 1);
        let reachable = grid.reachable(&start, &end);

        let dijkstra = DijkstraSolver.get_path_single_goal(&grid).unwrap();
        let astar = AstarSolver::new().get_path_single_goal(&grid).unwrap();
        if dijkstra.path().is_some() != reachable {
            println!("{grid}");
        }
        assert_eq!(dijkstra.path().is_some(), reachable);
        assert_eq!(astar.path().is_some(), reachable);
        assert_eq!(dijkstra.path_length(), astar.path_length());

        match (&dijkstra, &astar) {
            (SearchOutcome::Found { path: d, .. }, SearchOutcome::Found { path: a, .. }) => {
                assert_valid_path(&grid, d);
                assert_valid_path(&grid, a);
                assert!(astar.discovered() <= dijkstra.discovered());
            }
            _ => {
                // Dijkstra discovers every reachable cell exactly once. A* can pop a cell before
                // its cost is final and rediscover it later, so it only has a lower bound.
                let explorable = grid.reachable_count(&start) - 1;
                assert_eq!(dijkstra, SearchOutcome::NoPath { discovered: explorable });
                assert!(matches!(
                    astar,
                    SearchOutcome::NoPath { discovered } if discovered >= explorable
                ));
            }
        }
    }
}
