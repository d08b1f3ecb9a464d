use criterion::{criterion_group, criterion_main, Criterion};
use pathfinding_visualizer::{
    at, AstarSolver, CellTag, DijkstraSolver, GridSolver, PathingGrid, DEFAULT_ROWS,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

const N_GRIDS: usize = 20;
const BARRIER_DENSITY: f64 = 0.3;

/// Random grids of the default size with the start and end in opposite corners.
fn random_grids() -> Vec<PathingGrid> {
    let n = DEFAULT_ROWS;
    let mut rng = StdRng::seed_from_u64(0);
    (0..N_GRIDS)
        .map(|_| {
            let mut grid = PathingGrid::new(n).unwrap();
            for p in grid.points().collect::<Vec<_>>() {
                if rng.gen_bool(BARRIER_DENSITY) {
                    grid.set_tag(p, CellTag::Barrier);
                }
            }
            grid.set_tag(at(0, 0), CellTag::Start);
            grid.set_tag(at(n - 1, n - 1), CellTag::End);
            grid.update();
            grid
        })
        .collect()
}

fn bench_solver<S: GridSolver + Clone>(c: &mut Criterion, solver_name: &str, solver: S) {
    let grids = random_grids();
    let reachable = grids
        .iter()
        .filter(|g| g.reachable(&at(0, 0), &at(DEFAULT_ROWS - 1, DEFAULT_ROWS - 1)))
        .count();
    let name = format!("{solver_name}, {N_GRIDS} random {DEFAULT_ROWS}x{DEFAULT_ROWS} ({reachable} solvable)");
    c.bench_function(name.as_str(), |b| {
        b.iter(|| {
            for grid in &grids {
                black_box(solver.get_path_single_goal(grid).unwrap());
            }
        })
    });
}

fn bench_astar(c: &mut Criterion) {
    bench_solver(c, "Astar", AstarSolver::new());
}

fn bench_dijkstra(c: &mut Criterion) {
    bench_solver(c, "Dijkstra", DijkstraSolver);
}

/// Consumes every search event, which is what the animated visualizer does.
fn bench_events(c: &mut Criterion) {
    let grids = random_grids();
    c.bench_function("Astar events", |b| {
        b.iter(|| {
            for grid in &grids {
                black_box(AstarSolver::new().search(grid).unwrap().count());
            }
        })
    });
}

criterion_group!(benches, bench_dijkstra, bench_astar, bench_events);
criterion_main!(benches);
