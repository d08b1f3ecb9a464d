//! Crossterm front end: draws the grid with background colours and reads mouse and key input.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use grid_util::Point;
use log::{debug, warn};

use crate::pathing_grid::{CellTag, PathingGrid, MAX_ROWS};
use crate::solver::Algorithm;
use crate::visualizer::{Command, Frontend};

/// Terminal columns per grid cell, which keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;

// Cell positions are converted to `u16` cursor coordinates.
const _: () = assert!(MAX_ROWS * CELL_WIDTH as usize <= u16::MAX as usize);

const HELP: &str = "left: start, end, walls  right: erase  d: Dijkstra  a: A*  r: reset  q: quit";

const START: Color = Color::Rgb { r: 255, g: 0, b: 255 };
const END: Color = Color::Rgb { r: 199, g: 21, b: 133 };
const VISITED: Color = Color::Rgb { r: 39, g: 174, b: 96 };
const EMPTY: Color = Color::Rgb { r: 26, g: 26, b: 26 };
const BARRIER: Color = Color::Rgb { r: 0, g: 0, b: 0 };
const PATH: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const GRID_LINE: Color = Color::Rgb { r: 31, g: 31, b: 31 };
const TEXT: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const MESSAGE: Color = Color::Rgb { r: 60, g: 60, b: 60 };

/// The two characters, foreground and background of a cell. Frontier cells are drawn as a
/// ring on an empty background, the rest as solid blocks.
fn cell_style(tag: CellTag) -> (&'static str, Color, Color) {
    match tag {
        CellTag::Empty => ("\u{b7} ", GRID_LINE, EMPTY),
        CellTag::Barrier => ("  ", BARRIER, BARRIER),
        CellTag::Start => ("  ", START, START),
        CellTag::End => ("  ", END, END),
        CellTag::Visited => ("  ", VISITED, VISITED),
        CellTag::Frontier => ("()", VISITED, EMPTY),
        CellTag::Path => ("  ", PATH, PATH),
    }
}

/// The grid cell under a terminal position, if any.
fn cell_at(column: u16, row: u16, rows: usize) -> Option<Point> {
    let col = usize::from(column / CELL_WIDTH);
    let row = usize::from(row);
    (col < rows && row < rows).then(|| Point::new(col as i32, row as i32))
}

/// Translates a terminal event into a [Command] for a grid of `rows` rows.
pub fn to_command(event: Event, rows: usize) -> Option<Command> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('r') => Some(Command::Reset),
            KeyCode::Char(c) => Algorithm::from_key(c).map(Command::Run),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => {
            let point = cell_at(column, row, rows)?;
            match kind {
                MouseEventKind::Down(MouseButton::Left) => Some(Command::Place(point)),
                MouseEventKind::Drag(MouseButton::Left) => Some(Command::Paint(point)),
                MouseEventKind::Down(MouseButton::Right)
                | MouseEventKind::Drag(MouseButton::Right) => Some(Command::Erase(point)),
                _ => None,
            }
        }
        Event::Resize(..) => Some(Command::Redraw),
        _ => None,
    }
}

/// Owns the terminal while alive: raw mode, the alternate screen and mouse capture are restored
/// when it is dropped.
pub struct TerminalFrontend {
    stdout: Stdout,
    rows: usize,
}

impl TerminalFrontend {
    pub fn open(rows: usize) -> io::Result<TerminalFrontend> {
        let (width, height) = terminal::size()?;
        let needed_width = rows.saturating_mul(usize::from(CELL_WIDTH));
        if usize::from(width) < needed_width || usize::from(height) <= rows {
            warn!(
                "Terminal is {width}x{height} but a {rows} row grid needs {needed_width}x{}",
                rows + 1
            );
        }
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;
        debug!("Terminal opened for a {rows} row grid");
        Ok(TerminalFrontend { stdout, rows })
    }

    fn queue_cell(&mut self, grid: &PathingGrid, point: &Point) -> io::Result<()> {
        let (glyph, fg, bg) = cell_style(grid.tag(point));
        queue!(
            self.stdout,
            cursor::MoveTo(point.x as u16 * CELL_WIDTH, point.y as u16),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            Print(glyph)
        )
    }
}

impl Frontend for TerminalFrontend {
    fn redraw(&mut self, grid: &PathingGrid) -> io::Result<()> {
        queue!(self.stdout, ResetColor, terminal::Clear(ClearType::All))?;
        for point in grid.points() {
            self.queue_cell(grid, &point)?;
        }
        queue!(
            self.stdout,
            ResetColor,
            cursor::MoveTo(0, grid.size() as u16),
            Print(HELP)
        )?;
        self.stdout.flush()
    }

    fn draw_cells(&mut self, grid: &PathingGrid, cells: &[Point]) -> io::Result<()> {
        for point in cells {
            self.queue_cell(grid, point)?;
        }
        queue!(self.stdout, ResetColor)?;
        self.stdout.flush()
    }

    fn show_message(&mut self, title: &str, body: &str) -> io::Result<()> {
        let mut lines = vec![title, ""];
        lines.extend(body.lines());
        lines.extend(["", "press any key"]);
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let grid_width = self.rows * usize::from(CELL_WIDTH);
        let left = grid_width.saturating_sub(inner + 4) / 2;
        let top = self.rows.saturating_sub(lines.len() + 2) / 2;

        queue!(self.stdout, SetForegroundColor(TEXT), SetBackgroundColor(MESSAGE))?;
        let blank = " ".repeat(inner + 4);
        queue!(self.stdout, cursor::MoveTo(left as u16, top as u16), Print(&blank))?;
        for (i, line) in lines.iter().enumerate() {
            queue!(
                self.stdout,
                cursor::MoveTo(left as u16, (top + i + 1) as u16),
                Print(format!("  {line:<inner$}  "))
            )?;
        }
        queue!(
            self.stdout,
            cursor::MoveTo(left as u16, (top + lines.len() + 1) as u16),
            Print(&blank),
            ResetColor
        )?;
        self.stdout.flush()
    }

    fn poll_command(&mut self, timeout: Duration) -> io::Result<Option<Command>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(to_command(event::read()?, self.rows))
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            ResetColor,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
