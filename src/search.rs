use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use grid_util::Point;
use log::debug;
use smallvec::SmallVec;

use crate::best_first::{BestFirst, Relaxation};
use crate::pathing_grid::BarrierMap;
use crate::solver::GridSolver;

/// Cancels a running [Search] from the outside. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How a run ended. `discovered` counts the cells that entered the frontier, the start excluded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `path` lists the cells strictly between start and end, in start-to-end order.
    Found { path: Vec<Point>, discovered: usize },
    NoPath { discovered: usize },
    Cancelled { discovered: usize },
}

impl SearchOutcome {
    pub fn discovered(&self) -> usize {
        match self {
            SearchOutcome::Found { discovered, .. }
            | SearchOutcome::NoPath { discovered }
            | SearchOutcome::Cancelled { discovered } => *discovered,
        }
    }

    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Number of moves from start to end, i.e. one more than the number of interior cells.
    pub fn path_length(&self) -> Option<usize> {
        self.path().map(|p| p.len() + 1)
    }

    /// The user-facing summary of a completed run; cancelled runs have none.
    pub fn report(&self) -> Option<SearchReport> {
        match self {
            SearchOutcome::Cancelled { .. } => None,
            _ => Some(SearchReport {
                discovered: self.discovered(),
                path_length: self.path_length(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub discovered: usize,
    pub path_length: Option<usize>,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Searched: {} nodes", self.discovered)?;
        match self.path_length {
            Some(length) => write!(f, "Path length: {length}"),
            None => write!(f, "Path does not exist"),
        }
    }
}

/// A single visible change produced by a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// The cell entered the frontier.
    Discovered(Point),
    /// The cell was expanded and will not be expanded again.
    Finalized(Point),
    Finished(SearchOutcome),
}

/// Everything that happened while expanding one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    pub node: Point,
    /// Cells that entered the frontier, in neighbour order.
    pub discovered: SmallVec<[Point; 4]>,
    /// False only for the start cell, which keeps its start marking.
    pub finalized: bool,
}

impl Expansion {
    pub fn events(&self) -> impl Iterator<Item = SearchEvent> + '_ {
        self.discovered
            .iter()
            .map(|&p| SearchEvent::Discovered(p))
            .chain(self.finalized.then_some(SearchEvent::Finalized(self.node)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Expanded(Expansion),
    Done(SearchOutcome),
}

/// One run of a [GridSolver] from start to end, advanced one frontier pop per [step](Search::step).
///
/// A `Search` owns a [BarrierMap] snapshot and never touches the grid it was created from; the
/// caller mirrors the produced events on the grid if it wants to show them. It can also be consumed
/// as an [Iterator] of [SearchEvent]s ending with a single [Finished](SearchEvent::Finished).
pub struct Search<S> {
    solver: S,
    barriers: BarrierMap,
    start: Point,
    goal: Point,
    frontier: BestFirst<Point, i32>,
    cancel: CancelToken,
    outcome: Option<SearchOutcome>,
    events: VecDeque<SearchEvent>,
    exhausted: bool,
}

impl<S: GridSolver> Search<S> {
    /// `start` and `goal` must differ, as they do on a [PathingGrid](crate::pathing_grid::PathingGrid).
    pub fn new(solver: S, barriers: BarrierMap, start: Point, goal: Point) -> Search<S> {
        Search::with_cancel(solver, barriers, start, goal, CancelToken::new())
    }

    pub fn with_cancel(
        solver: S,
        barriers: BarrierMap,
        start: Point,
        goal: Point,
        cancel: CancelToken,
    ) -> Search<S> {
        debug_assert_ne!(start, goal, "start and goal must be different cells");
        debug!("Searching from {start} to {goal}");
        Search {
            solver,
            barriers,
            start,
            goal,
            frontier: BestFirst::new(start),
            cancel,
            outcome: None,
            events: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Pops one node from the frontier and relaxes its neighbours. Once the run has ended every
    /// further call returns the same [Done](Step::Done).
    pub fn step(&mut self) -> Step {
        if let Some(outcome) = &self.outcome {
            return Step::Done(outcome.clone());
        }
        let discovered = self.frontier.discovered();
        if self.cancel.is_cancelled() {
            return self.finish(SearchOutcome::Cancelled { discovered });
        }
        let Some((index, node)) = self.frontier.pop() else {
            return self.finish(SearchOutcome::NoPath { discovered });
        };
        if node == self.goal {
            let full = self.frontier.path_to(index);
            let path = match full.as_slice() {
                [_, interior @ .., _] => interior.to_vec(),
                _ => Vec::new(),
            };
            return self.finish(SearchOutcome::Found { path, discovered });
        }

        let mut newly_discovered = SmallVec::new();
        for (successor, move_cost) in self.solver.successors(&self.barriers, &node) {
            let h = self.solver.heuristic(&successor, &self.goal);
            if self.frontier.relax(index, successor, move_cost, h) == Relaxation::Queued {
                newly_discovered.push(successor);
            }
        }
        Step::Expanded(Expansion {
            node,
            discovered: newly_discovered,
            finalized: node != self.start,
        })
    }

    fn finish(&mut self, outcome: SearchOutcome) -> Step {
        debug!(
            "Search from {} to {} finished after {} discoveries",
            self.start,
            self.goal,
            outcome.discovered()
        );
        self.outcome = Some(outcome.clone());
        Step::Done(outcome)
    }

    /// Drives the search to its end without observing the intermediate steps.
    pub fn run(mut self) -> SearchOutcome {
        loop {
            if let Step::Done(outcome) = self.step() {
                return outcome;
            }
        }
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    /// Best known distance from the start to `point`, if the search has reached it.
    pub fn distance(&self, point: &Point) -> Option<i32> {
        self.frontier.distance(point)
    }

    pub fn predecessor(&self, point: &Point) -> Option<Point> {
        self.frontier.predecessor(point).copied()
    }

    pub fn is_pending(&self, point: &Point) -> bool {
        self.frontier.is_pending(point)
    }
}

impl<S: GridSolver> Iterator for Search<S> {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        while self.events.is_empty() {
            if self.exhausted {
                return None;
            }
            match self.step() {
                Step::Expanded(expansion) => self.events.extend(expansion.events()),
                Step::Done(outcome) => {
                    self.exhausted = true;
                    self.events.push_back(SearchEvent::Finished(outcome));
                }
            }
        }
        self.events.pop_front()
    }
}

impl<S: GridSolver> std::iter::FusedIterator for Search<S> {}
