use core::fmt;
use std::str::FromStr;

use grid_util::{BoolGrid, Grid, Point, SimpleGrid};
use itertools::Itertools;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::{GridError, SearchError};
use crate::search::SearchEvent;

/// Largest supported number of rows. Keeps every cell addressable by a terminal cursor.
pub const MAX_ROWS: usize = 4096;

/// Classification of a single cell. [Visited](CellTag::Visited), [Frontier](CellTag::Frontier)
/// and [Path](CellTag::Path) are written by a search run and are cleared before the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellTag {
    #[default]
    Empty,
    Barrier,
    Start,
    End,
    Visited,
    Frontier,
    Path,
}

impl CellTag {
    pub fn is_transient(self) -> bool {
        matches!(self, CellTag::Visited | CellTag::Frontier | CellTag::Path)
    }

    pub fn is_endpoint(self) -> bool {
        matches!(self, CellTag::Start | CellTag::End)
    }

    /// Character used by the [Display](fmt::Display) and [FromStr] representations of a grid.
    pub fn glyph(self) -> char {
        match self {
            CellTag::Empty => '.',
            CellTag::Barrier => '#',
            CellTag::Start => 'S',
            CellTag::End => 'E',
            CellTag::Visited => 'x',
            CellTag::Frontier => 'o',
            CellTag::Path => '*',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<CellTag> {
        match glyph {
            '.' => Some(CellTag::Empty),
            '#' => Some(CellTag::Barrier),
            'S' => Some(CellTag::Start),
            'E' => Some(CellTag::End),
            'x' => Some(CellTag::Visited),
            'o' => Some(CellTag::Frontier),
            '*' => Some(CellTag::Path),
            _ => None,
        }
    }
}

/// Offsets of the 4-neighbourhood in enumeration order: up, down, left, right.
const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// The in-bounds up/down/left/right neighbours of `point` on `grid`. Diagonals are never included,
/// which keeps the Manhattan distance a consistent heuristic.
pub fn cardinal_neighbours<T: Copy, G: Grid<T>>(grid: &G, point: &Point) -> SmallVec<[Point; 4]> {
    CARDINAL_OFFSETS
        .iter()
        .map(|&(dx, dy)| Point::new(point.x + dx, point.y + dy))
        .filter(|&p| grid.point_in_bounds(p))
        .collect()
}

/// Immutable passability snapshot of a [PathingGrid]. A search owns one for its whole run so the
/// grid itself stays free to be re-tagged for visualization.
#[derive(Clone, Debug)]
pub struct BarrierMap {
    blocked: BoolGrid,
}

impl BarrierMap {
    pub fn size(&self) -> usize {
        self.blocked.width()
    }

    pub fn is_open(&self, point: &Point) -> bool {
        self.blocked.point_in_bounds(*point) && !self.blocked.get_point(*point)
    }

    /// Traversable 4-neighbours of `point`, in the order of [cardinal_neighbours].
    pub fn open_neighbours(&self, point: &Point) -> SmallVec<[Point; 4]> {
        cardinal_neighbours(&self.blocked, point)
            .into_iter()
            .filter(|&p| !self.blocked.get_point(p))
            .collect()
    }
}

/// Square grid of [CellTag]s together with the current start and end cells. Connected components of
/// the open cells are maintained in a [UnionFind] so reachability can be answered without a search.
///
/// Points use `x` as the column index and `y` as the row index.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    tags: SimpleGrid<CellTag>,
    start: Option<Point>,
    end: Option<Point>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl PathingGrid {
    /// Creates an `n`×`n` grid of [Empty](CellTag::Empty) cells.
    pub fn new(n: usize) -> Result<PathingGrid, GridError> {
        if n == 0 {
            return Err(GridError::EmptyGrid);
        }
        if n > MAX_ROWS {
            return Err(GridError::TooLarge {
                rows: n,
                max: MAX_ROWS,
            });
        }
        let mut grid = PathingGrid {
            tags: SimpleGrid::new(n, n, CellTag::Empty),
            start: None,
            end: None,
            components: UnionFind::new(n * n),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Number of rows, which is also the number of columns.
    pub fn size(&self) -> usize {
        self.tags.width()
    }

    pub fn in_bounds(&self, point: &Point) -> bool {
        self.tags.point_in_bounds(*point)
    }

    pub fn get_ix_point(&self, point: &Point) -> usize {
        debug_assert!(self.in_bounds(point), "{point} is outside the grid");
        self.tags.get_ix_point(point)
    }

    /// Every cell, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let n = self.size() as i32;
        (0..n).flat_map(move |y| (0..n).map(move |x| Point::new(x, y)))
    }

    pub fn tag(&self, point: &Point) -> CellTag {
        debug_assert!(self.in_bounds(point), "{point} is outside the grid");
        self.tags.get_point(*point)
    }

    pub fn is_barrier(&self, point: &Point) -> bool {
        self.tag(point) == CellTag::Barrier
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Start and end of the next search, or which of the two is missing.
    pub fn endpoints(&self) -> Result<(Point, Point), SearchError> {
        let start = self.start.ok_or(SearchError::MissingStart)?;
        let end = self.end.ok_or(SearchError::MissingEnd)?;
        Ok((start, end))
    }

    /// In-bounds up/down/left/right neighbours of `point`, barriers included.
    pub fn neighbours(&self, point: &Point) -> SmallVec<[Point; 4]> {
        cardinal_neighbours(&self.tags, point)
    }

    /// Updates the tag of a cell. At most one cell is ever tagged [Start](CellTag::Start) and at most
    /// one [End](CellTag::End): tagging a second one returns the previous cell to
    /// [Empty](CellTag::Empty), and re-tagging the current start or end cell forgets it.
    ///
    /// Joins newly connected components and flags the components as dirty if they are
    /// (potentially) broken apart into multiple.
    pub fn set_tag(&mut self, point: Point, tag: CellTag) {
        let ix = self.get_ix_point(&point);
        let old = self.tags.get_point(point);
        if old == tag {
            return;
        }
        match old {
            CellTag::Start => self.start = None,
            CellTag::End => self.end = None,
            _ => {}
        }
        let previous = match tag {
            CellTag::Start => self.start.replace(point),
            CellTag::End => self.end.replace(point),
            _ => None,
        };
        if let Some(previous) = previous {
            self.tags.set_point(previous, CellTag::Empty);
        }
        self.tags.set_point(point, tag);

        if tag == CellTag::Barrier {
            self.components_dirty = true;
        } else if old == CellTag::Barrier {
            for n in self.neighbours(&point) {
                if !self.is_barrier(&n) {
                    self.components.union(ix, self.get_ix_point(&n));
                }
            }
        }
    }

    /// Left click: places the start, then the end, then toggles barriers on any other cell.
    /// Returns the resulting tag of the cell.
    pub fn place(&mut self, point: Point) -> CellTag {
        self.click(point, true)
    }

    /// Left drag: like [place](Self::place) but only ever adds barriers, so dragging across
    /// cells paints a wall instead of flickering it on and off.
    pub fn paint(&mut self, point: Point) -> CellTag {
        self.click(point, false)
    }

    fn click(&mut self, point: Point, toggle: bool) -> CellTag {
        let tag = self.tag(&point);
        if self.start.is_none() && tag != CellTag::End {
            self.set_tag(point, CellTag::Start);
        } else if self.end.is_none() && tag != CellTag::Start {
            self.set_tag(point, CellTag::End);
        } else if !tag.is_endpoint() {
            let next = if toggle && tag == CellTag::Barrier {
                CellTag::Empty
            } else {
                CellTag::Barrier
            };
            self.set_tag(point, next);
        }
        self.tag(&point)
    }

    /// Right click: clears the cell, dropping its start or end role.
    pub fn erase(&mut self, point: Point) {
        self.set_tag(point, CellTag::Empty);
    }

    /// Clears every [Visited](CellTag::Visited), [Frontier](CellTag::Frontier) and
    /// [Path](CellTag::Path) tag, leaving start, end and barriers untouched.
    pub fn reset_transient(&mut self) {
        for tag in self.tags.values.iter_mut().filter(|t| t.is_transient()) {
            *tag = CellTag::Empty;
        }
    }

    /// Returns every cell to [Empty](CellTag::Empty) and forgets the start and end.
    pub fn reset_all(&mut self) {
        self.tags.values.fill(CellTag::Empty);
        self.start = None;
        self.end = None;
        self.generate_components();
    }

    /// Snapshot of which cells a search may enter.
    pub fn barrier_map(&self) -> BarrierMap {
        let n = self.size();
        let mut blocked = BoolGrid::new(n, n, false);
        for point in self.points().filter(|p| self.is_barrier(p)) {
            blocked.set_point(point, true);
        }
        BarrierMap { blocked }
    }

    /// Mirrors a search event on the grid: discovered cells become
    /// [Frontier](CellTag::Frontier) and finalized cells [Visited](CellTag::Visited). The start and
    /// end cells keep their tags.
    pub fn apply(&mut self, event: &SearchEvent) {
        let (point, tag) = match event {
            SearchEvent::Discovered(p) => (p, CellTag::Frontier),
            SearchEvent::Finalized(p) => (p, CellTag::Visited),
            SearchEvent::Finished(_) => return,
        };
        if !self.tag(point).is_endpoint() {
            self.set_tag(*point, tag);
        }
    }

    pub fn mark_path(&mut self, path: &[Point]) {
        for p in path {
            if !self.tag(p).is_endpoint() {
                self.set_tag(*p, CellTag::Path);
            }
        }
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.get_ix_point(point))
    }

    /// Checks if start and goal are open cells on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        self.in_bounds(start)
            && self.in_bounds(goal)
            && !self.is_barrier(start)
            && !self.is_barrier(goal)
            && self
                .components
                .equiv(self.get_ix_point(start), self.get_ix_point(goal))
    }

    /// Number of open cells on the component of `point`, `point` included.
    pub fn reachable_count(&self, point: &Point) -> usize {
        if !self.in_bounds(point) || self.is_barrier(point) {
            return 0;
        }
        let component = self.get_component(point);
        self.points()
            .filter(|p| !self.is_barrier(p) && self.get_component(p) == component)
            .count()
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            debug!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open neighbours to the same components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.tags.values.len());
        self.components_dirty = false;
        for point in self.points() {
            if self.is_barrier(&point) {
                continue;
            }
            let ix = self.get_ix_point(&point);
            // Right and down suffice, the other two directions are covered by the neighbour.
            for n in [Point::new(point.x + 1, point.y), Point::new(point.x, point.y + 1)] {
                if self.in_bounds(&n) && !self.is_barrier(&n) {
                    self.components.union(ix, self.get_ix_point(&n));
                }
            }
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.tags.values.chunks(self.size()) {
            writeln!(f, "{}", row.iter().map(|t| t.glyph()).join(""))?;
        }
        Ok(())
    }
}

impl FromStr for PathingGrid {
    type Err = GridError;

    /// Parses the [Display](fmt::Display) format: one line per row, blank lines ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let mut grid = PathingGrid::new(lines.len())?;
        for (y, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != lines.len() {
                return Err(GridError::Parse {
                    row: y,
                    reason: format!("expected {} cells, found {width}", lines.len()),
                });
            }
            for (x, glyph) in line.chars().enumerate() {
                let tag = CellTag::from_glyph(glyph).ok_or_else(|| GridError::Parse {
                    row: y,
                    reason: format!("unknown cell '{glyph}'"),
                })?;
                let duplicate = match tag {
                    CellTag::Start => grid.start.is_some(),
                    CellTag::End => grid.end.is_some(),
                    _ => false,
                };
                if duplicate {
                    return Err(GridError::Parse {
                        row: y,
                        reason: format!("more than one '{glyph}' cell"),
                    });
                }
                grid.set_tag(Point::new(x as i32, y as i32), tag);
            }
        }
        grid.update();
        Ok(grid)
    }
}
