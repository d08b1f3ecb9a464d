//! The interactive shell: turns user commands into grid edits and animated searches.
//!
//! All terminal handling sits behind the [Frontend] trait so the shell logic can be driven by a
//! scripted front end in tests; [terminal::TerminalFrontend] is the real one.

use std::io;
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use grid_util::Point;
use log::{debug, info, warn};
use smallvec::SmallVec;

use crate::config::VisualizerConfig;
use crate::error::VisualizerError;
use crate::pathing_grid::{CellTag, PathingGrid};
use crate::search::{CancelToken, SearchOutcome, Step};
use crate::solver::{Algorithm, GridSolver};

pub mod clock;
pub mod terminal;

use clock::FrameClock;

/// How long the idle loop waits for input before polling again.
pub const IDLE_POLL: Duration = Duration::from_millis(50);

pub const REPORT_TITLE: &str = "Pathfinding stats";
pub const MISSING_ENDPOINTS_TITLE: &str = "Cannot search";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Left click on a cell.
    Place(Point),
    /// Left drag over a cell.
    Paint(Point),
    /// Right click or drag over a cell.
    Erase(Point),
    Run(Algorithm),
    /// Clears the whole grid.
    Reset,
    /// Repaints everything, e.g. after the terminal was resized.
    Redraw,
    Quit,
}

/// Where the grid is shown and user input comes from.
pub trait Frontend {
    /// Repaints every cell of `grid`.
    fn redraw(&mut self, grid: &PathingGrid) -> io::Result<()>;

    /// Repaints only `cells`, which are all in bounds of `grid`.
    fn draw_cells(&mut self, grid: &PathingGrid, cells: &[Point]) -> io::Result<()>;

    /// Shows a message over the grid until the next redraw.
    fn show_message(&mut self, title: &str, body: &str) -> io::Result<()>;

    /// Waits up to `timeout` for the next command. A zero timeout never blocks.
    fn poll_command(&mut self, timeout: Duration) -> io::Result<Option<Command>>;
}

pub struct Visualizer<F> {
    frontend: F,
    grid: PathingGrid,
    config: VisualizerConfig,
    message_shown: bool,
}

impl<F: Frontend> Visualizer<F> {
    pub fn new(frontend: F, grid: PathingGrid, config: VisualizerConfig) -> Visualizer<F> {
        Visualizer {
            frontend,
            grid,
            config,
            message_shown: false,
        }
    }

    pub fn grid(&self) -> &PathingGrid {
        &self.grid
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn into_frontend(self) -> F {
        self.frontend
    }

    /// Draws the grid and handles commands until the user quits.
    pub fn run(&mut self) -> Result<(), VisualizerError> {
        self.frontend.redraw(&self.grid)?;
        loop {
            let Some(command) = self.frontend.poll_command(IDLE_POLL)? else {
                continue;
            };
            if self.handle(command)?.is_break() {
                info!("Quitting");
                return Ok(());
            }
        }
    }

    /// Handles one command from the idle loop. Breaks when the visualizer should exit.
    pub fn handle(&mut self, command: Command) -> Result<ControlFlow<()>, VisualizerError> {
        if self.message_shown && command != Command::Quit {
            // Any input only dismisses an open message.
            self.message_shown = false;
            self.frontend.redraw(&self.grid)?;
            return Ok(ControlFlow::Continue(()));
        }
        match command {
            Command::Place(p) => self.edit(p, |grid, p| {
                grid.place(p);
            })?,
            Command::Paint(p) => self.edit(p, |grid, p| {
                grid.paint(p);
            })?,
            Command::Erase(p) => self.edit(p, PathingGrid::erase)?,
            Command::Reset => {
                self.grid.reset_all();
                self.frontend.redraw(&self.grid)?;
            }
            Command::Redraw => self.frontend.redraw(&self.grid)?,
            Command::Run(algorithm) => return self.run_search(algorithm),
            Command::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    fn edit(
        &mut self,
        point: Point,
        edit: impl FnOnce(&mut PathingGrid, Point),
    ) -> Result<(), VisualizerError> {
        if !self.grid.in_bounds(&point) {
            debug!("Ignoring edit outside the grid at {point}");
            return Ok(());
        }
        edit(&mut self.grid, point);
        self.frontend.draw_cells(&self.grid, &[point])?;
        Ok(())
    }

    fn show_message(&mut self, title: &str, body: &str) -> Result<(), VisualizerError> {
        self.frontend.show_message(title, body)?;
        self.message_shown = true;
        Ok(())
    }

    /// Animates one search, then its path, then shows the report.
    fn run_search(&mut self, algorithm: Algorithm) -> Result<ControlFlow<()>, VisualizerError> {
        let cancel = CancelToken::new();
        let mut search = match algorithm.search_with_cancel(&self.grid, cancel.clone()) {
            Ok(search) => search,
            Err(err) => {
                warn!("Not running {}: {err}", algorithm.name());
                let body = format!("{err}.\nPlace a start and an end cell first.");
                self.show_message(MISSING_ENDPOINTS_TITLE, &body)?;
                return Ok(ControlFlow::Continue(()));
            }
        };
        self.grid.reset_transient();
        self.frontend.redraw(&self.grid)?;

        self.grid.update();
        let (start, goal) = (search.start(), search.goal());
        if self.grid.reachable(&start, &goal) {
            info!("Running {} from {start} to {goal}", algorithm.name());
        } else {
            info!(
                "Running {} from {start} to {goal}, which is unreachable; {} cells to explore",
                algorithm.name(),
                self.grid.reachable_count(&start).saturating_sub(1)
            );
        }

        let mut clock = FrameClock::new(self.config.steps_per_second);
        let outcome = loop {
            match search.step() {
                Step::Expanded(expansion) => {
                    let mut dirty: SmallVec<[Point; 5]> = SmallVec::new();
                    for event in expansion.events() {
                        self.grid.apply(&event);
                    }
                    dirty.extend(expansion.discovered.iter().copied());
                    if expansion.finalized {
                        dirty.push(expansion.node);
                    }
                    self.frontend.draw_cells(&self.grid, &dirty)?;
                    if self.poll_while_busy()? {
                        cancel.cancel();
                    }
                    clock.tick();
                }
                Step::Done(outcome) => break outcome,
            }
        };

        if let SearchOutcome::Found { path, .. } = &outcome {
            self.grid.reset_transient();
            self.frontend.redraw(&self.grid)?;
            if self.draw_path(path)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        let Some(report) = outcome.report() else {
            info!(
                "{} cancelled after {} discoveries",
                algorithm.name(),
                outcome.discovered()
            );
            return Ok(ControlFlow::Break(()));
        };
        info!("{} finished: {}", algorithm.name(), report.to_string().replace('\n', ", "));
        self.show_message(REPORT_TITLE, &report.to_string())?;
        Ok(ControlFlow::Continue(()))
    }

    fn draw_path(&mut self, path: &[Point]) -> Result<ControlFlow<()>, VisualizerError> {
        let delay = self.config.path_delay();
        for &p in path {
            self.grid.set_tag(p, CellTag::Path);
            self.frontend.draw_cells(&self.grid, &[p])?;
            if self.poll_while_busy()? {
                return Ok(ControlFlow::Break(()));
            }
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Drains pending commands without blocking. Returns whether the user asked to quit; other
    /// commands are dropped.
    fn poll_while_busy(&mut self) -> Result<bool, VisualizerError> {
        while let Some(command) = self.frontend.poll_command(Duration::ZERO)? {
            match command {
                Command::Quit => return Ok(true),
                Command::Redraw => self.frontend.redraw(&self.grid)?,
                other => debug!("Ignoring {other:?} while busy"),
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at;
    use std::collections::VecDeque;

    /// Replays `idle` commands from blocking polls and `busy` commands from non-blocking ones,
    /// then quits.
    #[derive(Default)]
    struct Scripted {
        idle: VecDeque<Command>,
        busy: VecDeque<Command>,
        drawn: Vec<Point>,
        redraws: usize,
        messages: Vec<(String, String)>,
    }

    impl Frontend for Scripted {
        fn redraw(&mut self, _: &PathingGrid) -> io::Result<()> {
            self.redraws += 1;
            Ok(())
        }

        fn draw_cells(&mut self, _: &PathingGrid, cells: &[Point]) -> io::Result<()> {
            self.drawn.extend_from_slice(cells);
            Ok(())
        }

        fn show_message(&mut self, title: &str, body: &str) -> io::Result<()> {
            self.messages.push((title.to_owned(), body.to_owned()));
            Ok(())
        }

        fn poll_command(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
            if timeout.is_zero() {
                return Ok(self.busy.pop_front());
            }
            Ok(Some(self.idle.pop_front().unwrap_or(Command::Quit)))
        }
    }

    fn visualizer(rows: usize) -> Visualizer<Scripted> {
        let config = VisualizerConfig {
            steps_per_second: 0,
            path_delay_ms: 0,
            ..VisualizerConfig::default()
        };
        Visualizer::new(
            Scripted::default(),
            PathingGrid::new(rows).unwrap(),
            config,
        )
    }

    #[test]
    fn edits_redraw_only_the_touched_cell() {
        let mut v = visualizer(3);
        for p in [at(0, 0), at(2, 2), at(1, 1)] {
            assert!(v.handle(Command::Place(p)).unwrap().is_continue());
        }
        v.handle(Command::Paint(at(1, 2))).unwrap();
        v.handle(Command::Erase(at(0, 0))).unwrap();
        v.handle(Command::Place(at(5, 5))).unwrap();
        assert_eq!(
            v.frontend().drawn,
            vec![at(0, 0), at(2, 2), at(1, 1), at(1, 2), at(0, 0)]
        );
        assert_eq!(v.grid().tag(&at(1, 1)), CellTag::Barrier);
        assert_eq!(v.grid().start(), None);
        assert_eq!(v.grid().end(), Some(at(2, 2)));
    }

    #[test]
    fn run_without_endpoints_shows_a_message() {
        let mut v = visualizer(3);
        v.handle(Command::Place(at(0, 0))).unwrap();
        let flow = v.handle(Command::Run(Algorithm::from_key('d').unwrap()));
        assert!(flow.unwrap().is_continue());
        let messages = &v.frontend().messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, MISSING_ENDPOINTS_TITLE);
        assert!(messages[0].1.contains("no end cell"));
    }

    #[test]
    fn message_is_dismissed_by_the_next_command() {
        let mut v = visualizer(3);
        v.handle(Command::Run(Algorithm::from_key('a').unwrap()))
            .unwrap();
        let redraws = v.frontend().redraws;
        v.handle(Command::Place(at(0, 0))).unwrap();
        assert_eq!(v.frontend().redraws, redraws + 1);
        assert_eq!(v.grid().start(), None);
        v.handle(Command::Place(at(0, 0))).unwrap();
        assert_eq!(v.grid().start(), Some(at(0, 0)));
    }

    #[test]
    fn found_path_is_drawn_and_reported() {
        let mut v = visualizer(3);
        v.handle(Command::Place(at(0, 0))).unwrap();
        v.handle(Command::Place(at(2, 2))).unwrap();
        v.handle(Command::Run(Algorithm::from_key('d').unwrap()))
            .unwrap();
        let path = [at(1, 0), at(2, 0), at(2, 1)];
        assert!(v.frontend().drawn.ends_with(&path));
        for p in v.grid().points() {
            let expected = if path.contains(&p) {
                CellTag::Path
            } else if p == at(0, 0) {
                CellTag::Start
            } else if p == at(2, 2) {
                CellTag::End
            } else {
                CellTag::Empty
            };
            assert_eq!(v.grid().tag(&p), expected, "at {p}");
        }
        assert_eq!(
            v.frontend().messages,
            vec![(
                REPORT_TITLE.to_owned(),
                "Searched: 8 nodes\nPath length: 4".to_owned()
            )]
        );
    }

    #[test]
    fn quit_during_a_search_cancels_it() {
        let mut v = visualizer(5);
        v.handle(Command::Place(at(0, 0))).unwrap();
        v.handle(Command::Place(at(4, 4))).unwrap();
        v.frontend.busy.push_back(Command::Place(at(2, 2)));
        v.frontend.busy.push_back(Command::Quit);
        let flow = v
            .handle(Command::Run(Algorithm::from_key('d').unwrap()))
            .unwrap();
        assert!(flow.is_break());
        assert!(v.frontend().messages.is_empty());
        assert_eq!(v.grid().tag(&at(2, 2)), CellTag::Empty);
    }
}
