use crate::error::{Endpoint, Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Manhattan (L1) distance between two positions.
    pub fn manhattan(&self, other: Position) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }

    /// True when the two positions share an edge.
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parses `"row,col"`, tolerating surrounding whitespace and parentheses.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (row, col) = trimmed
            .split_once(',')
            .ok_or_else(|| format!("expected 'row,col', got '{}'", s))?;
        let row = row
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid row '{}': {}", row.trim(), e))?;
        let col = col
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid column '{}': {}", col.trim(), e))?;
        Ok(Position { row, col })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

/// Rectangular grid of open and walled cells, stored row-major.
///
/// The engine only ever reads a grid; the editing helpers (`set_wall`,
/// `toggle_wall`, `randomize_walls`) exist for the layer that prepares the
/// snapshot before a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid);
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(Error::GridTooLarge { rows, cols })?;
        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::Open; len],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Packed `row * cols + col` key. The caller guarantees `pos` is in bounds.
    #[inline]
    pub fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    #[inline]
    pub fn position(&self, index: usize) -> Position {
        Position {
            row: index / self.cols,
            col: index % self.cols,
        }
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Out-of-bounds positions are never passable.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Open)
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }

    /// Fills `buf` with the in-bounds neighbors of `pos` in the fixed order
    /// up, down, left, right. The order decides every tie-break downstream.
    pub fn neighbors(&self, pos: Position, buf: &mut Vec<Position>) {
        buf.clear();
        if pos.row > 0 {
            buf.push(Position::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.rows {
            buf.push(Position::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            buf.push(Position::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.cols {
            buf.push(Position::new(pos.row, pos.col + 1));
        }
    }

    /// Like [`Grid::neighbors`] but drops walls.
    pub fn passable_neighbors(&self, pos: Position, buf: &mut Vec<Position>) {
        self.neighbors(pos, buf);
        buf.retain(|n| self.cells[self.index(*n)] == Cell::Open);
    }

    pub fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::InvalidBounds {
                position: pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Rejects endpoints that are out of bounds, then endpoints that are walls.
    pub fn check_endpoints(&self, start: Position, end: Position) -> Result<()> {
        self.check_bounds(start)?;
        self.check_bounds(end)?;
        for (role, position) in [(Endpoint::Start, start), (Endpoint::End, end)] {
            if !self.is_passable(position) {
                return Err(Error::BlockedEndpoint { role, position });
            }
        }
        Ok(())
    }

    pub fn set_wall(&mut self, pos: Position, wall: bool) -> Result<()> {
        self.check_bounds(pos)?;
        let idx = self.index(pos);
        self.cells[idx] = if wall { Cell::Wall } else { Cell::Open };
        Ok(())
    }

    /// Flips a cell between open and wall, returning the new state.
    pub fn toggle_wall(&mut self, pos: Position) -> Result<Cell> {
        self.check_bounds(pos)?;
        let idx = self.index(pos);
        self.cells[idx] = match self.cells[idx] {
            Cell::Open => Cell::Wall,
            Cell::Wall => Cell::Open,
        };
        Ok(self.cells[idx])
    }

    /// Re-rolls every cell as a wall with probability `density`, leaving the
    /// cells in `keep_clear` open. A density that is not a number leaves the
    /// grid fully open.
    pub fn randomize_walls<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        density: f64,
        keep_clear: &[Position],
    ) {
        let density = if density.is_nan() {
            0.0
        } else {
            density.clamp(0.0, 1.0)
        };
        for idx in 0..self.cells.len() {
            let pos = self.position(idx);
            self.cells[idx] = if keep_clear.contains(&pos) || !rng.gen_bool(density) {
                Cell::Open
            } else {
                Cell::Wall
            };
        }
    }

    /// Text rendering of the grid with a search overlay.
    ///
    /// Legend: S=Start, E=End, #=Wall, *=Path, o=Visited, .=Open
    pub fn render(
        &self,
        start: Option<Position>,
        end: Option<Position>,
        visited: &[Position],
        path: &[Position],
    ) -> String {
        let mut overlay = vec![None; self.cells.len()];
        for &p in visited.iter().filter(|p| self.contains(**p)) {
            overlay[self.index(p)] = Some('o');
        }
        for &p in path.iter().filter(|p| self.contains(**p)) {
            overlay[self.index(p)] = Some('*');
        }

        let mut out = String::new();
        out.push_str("   ");
        for col in 0..self.cols {
            let _ = write!(out, "{:2}", col % 10);
        }
        out.push('\n');

        for row in 0..self.rows {
            let _ = write!(out, "{:2} ", row);
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                let idx = self.index(pos);
                let ch = if Some(pos) == start {
                    'S'
                } else if Some(pos) == end {
                    'E'
                } else if let Some(mark) = overlay[idx] {
                    mark
                } else {
                    match self.cells[idx] {
                        Cell::Wall => '#',
                        Cell::Open => '.',
                    }
                };
                out.push(' ');
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

/// A grid parsed from text together with any endpoints marked in it.
#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: Grid,
    pub start: Option<Position>,
    pub end: Option<Position>,
}

impl Layout {
    /// Parses the ASCII layout format: `.` open, `#` wall, `S` start, `E` end.
    /// Blank lines are skipped; all rows must have the same width.
    pub fn parse(text: &str) -> Result<Self> {
        let mut cells = Vec::new();
        let mut cols = None;
        let mut rows = 0;
        let mut start = None;
        let mut end = None;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = line_no + 1;
            let width = line.chars().count();
            match cols {
                None => cols = Some(width),
                Some(expected) if expected != width => {
                    return Err(Error::Parse {
                        line: line_no,
                        reason: format!("expected {} columns, found {}", expected, width),
                    });
                }
                Some(_) => {}
            }

            for (col, ch) in line.chars().enumerate() {
                let pos = Position::new(rows, col);
                let cell = match ch {
                    '.' => Cell::Open,
                    '#' => Cell::Wall,
                    'S' | 'E' => {
                        let slot = if ch == 'S' { &mut start } else { &mut end };
                        if slot.replace(pos).is_some() {
                            return Err(Error::Parse {
                                line: line_no,
                                reason: format!("more than one '{}' marker", ch),
                            });
                        }
                        Cell::Open
                    }
                    other => {
                        return Err(Error::Parse {
                            line: line_no,
                            reason: format!("unexpected character '{}'", other),
                        });
                    }
                };
                cells.push(cell);
            }
            rows += 1;
        }

        let Some(cols) = cols else {
            return Err(Error::Parse {
                line: 0,
                reason: "layout contains no rows".to_string(),
            });
        };

        let mut grid = Grid::new(rows, cols)?;
        grid.cells = cells;
        Ok(Layout { grid, start, end })
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Layout::parse(s).map(|layout| layout.grid)
    }
}

/// Maps `pos` from a `from` sized grid onto a `to` sized grid proportionally,
/// clamped to the new bounds. Dimensions are `(rows, cols)`.
pub fn rescale(pos: Position, from: (usize, usize), to: (usize, usize)) -> Position {
    let scale = |value: usize, old: usize, new: usize| -> usize {
        if old == 0 || new == 0 {
            return 0;
        }
        let scaled = (value as f64 * new as f64 / old as f64).round() as usize;
        scaled.min(new - 1)
    };
    Position {
        row: scale(pos.row, from.0, to.0),
        col: scale(pos.col, from.1, to.1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_grid_is_rejected() {
        assert_eq!(Grid::new(0, 4), Err(Error::EmptyGrid));
        assert_eq!(Grid::new(4, 0), Err(Error::EmptyGrid));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let rows = usize::MAX / 2 + 1;
        assert_eq!(
            Grid::new(rows, 4),
            Err(Error::GridTooLarge { rows, cols: 4 })
        );
        assert!(Error::GridTooLarge { rows, cols: 4 }.is_structural());
    }

    #[test]
    fn neighbors_follow_up_down_left_right() {
        let grid = Grid::new(3, 3).unwrap();
        let mut buf = Vec::new();
        grid.neighbors(Position::new(1, 1), &mut buf);
        assert_eq!(
            buf,
            vec![
                Position::new(0, 1),
                Position::new(2, 1),
                Position::new(1, 0),
                Position::new(1, 2),
            ]
        );

        grid.neighbors(Position::new(0, 0), &mut buf);
        assert_eq!(buf, vec![Position::new(1, 0), Position::new(0, 1)]);

        grid.neighbors(Position::new(2, 2), &mut buf);
        assert_eq!(buf, vec![Position::new(1, 2), Position::new(2, 1)]);
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        let grid = Grid::new(1, 1).unwrap();
        let mut buf = vec![Position::new(9, 9)];
        grid.neighbors(Position::new(0, 0), &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn passable_neighbors_skip_walls() {
        let grid: Grid = ".#.\n...\n.#.".parse().unwrap();
        let mut buf = Vec::new();
        grid.passable_neighbors(Position::new(1, 1), &mut buf);
        assert_eq!(buf, vec![Position::new(1, 0), Position::new(1, 2)]);
    }

    #[test]
    fn index_round_trips_through_position() {
        let grid = Grid::new(4, 7).unwrap();
        let pos = Position::new(3, 5);
        assert_eq!(grid.index(pos), 26);
        assert_eq!(grid.position(26), pos);
    }

    #[test]
    fn check_endpoints_reports_bounds_before_walls() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_wall(Position::new(0, 0), true).unwrap();

        assert_eq!(
            grid.check_endpoints(Position::new(0, 0), Position::new(5, 5)),
            Err(Error::InvalidBounds {
                position: Position::new(5, 5),
                rows: 2,
                cols: 2
            })
        );
        assert_eq!(
            grid.check_endpoints(Position::new(0, 0), Position::new(1, 1)),
            Err(Error::BlockedEndpoint {
                role: Endpoint::Start,
                position: Position::new(0, 0)
            })
        );
        assert!(grid
            .check_endpoints(Position::new(1, 0), Position::new(1, 1))
            .is_ok());
    }

    #[test]
    fn toggle_wall_flips_and_rejects_out_of_bounds() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert_eq!(grid.toggle_wall(Position::new(1, 1)), Ok(Cell::Wall));
        assert!(!grid.is_passable(Position::new(1, 1)));
        assert_eq!(grid.toggle_wall(Position::new(1, 1)), Ok(Cell::Open));
        assert!(grid.toggle_wall(Position::new(2, 0)).is_err());
    }

    #[test]
    fn randomize_walls_keeps_endpoints_open() {
        let mut grid = Grid::new(10, 10).unwrap();
        let keep = [Position::new(0, 0), Position::new(9, 9)];
        let mut rng = StdRng::seed_from_u64(7);
        grid.randomize_walls(&mut rng, 1.0, &keep);
        assert_eq!(grid.wall_count(), 98);
        assert!(keep.iter().all(|p| grid.is_passable(*p)));

        grid.randomize_walls(&mut rng, 0.0, &keep);
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn randomize_walls_tolerates_out_of_range_density() {
        let mut grid = Grid::new(6, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        grid.randomize_walls(&mut rng, f64::NAN, &[]);
        assert_eq!(grid.wall_count(), 0);
        grid.randomize_walls(&mut rng, f64::INFINITY, &[]);
        assert_eq!(grid.wall_count(), 36);
        grid.randomize_walls(&mut rng, -2.5, &[]);
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn layout_parses_markers() {
        let layout = Layout::parse("S.#\n..E\n").unwrap();
        assert_eq!(layout.grid.rows(), 2);
        assert_eq!(layout.grid.cols(), 3);
        assert_eq!(layout.start, Some(Position::new(0, 0)));
        assert_eq!(layout.end, Some(Position::new(1, 2)));
        assert!(!layout.grid.is_passable(Position::new(0, 2)));
        assert!(layout.grid.is_passable(Position::new(1, 2)));
    }

    #[test]
    fn layout_rejects_bad_input() {
        assert!(matches!(
            Layout::parse("...\n.."),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Layout::parse("S.S"),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            Layout::parse(".x."),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(Layout::parse("\n\n"), Err(Error::Parse { .. })));
    }

    #[test]
    fn position_parses_from_pair() {
        assert_eq!("3,4".parse::<Position>(), Ok(Position::new(3, 4)));
        assert_eq!(" (10, 2) ".parse::<Position>(), Ok(Position::new(10, 2)));
        assert!("3".parse::<Position>().is_err());
        assert!("a,1".parse::<Position>().is_err());
    }

    #[test]
    fn rescale_is_proportional_and_clamped() {
        assert_eq!(
            rescale(Position::new(10, 5), (20, 30), (40, 60)),
            Position::new(20, 10)
        );
        assert_eq!(
            rescale(Position::new(19, 29), (20, 30), (8, 8)),
            Position::new(7, 7)
        );
    }

    #[test]
    fn render_marks_overlay() {
        let grid: Grid = "...\n.#.".parse().unwrap();
        let text = grid.render(
            Some(Position::new(0, 0)),
            Some(Position::new(1, 2)),
            &[Position::new(0, 1), Position::new(1, 0)],
            &[Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    0 1 2");
        assert_eq!(lines[1], " 0  S * *");
        assert_eq!(lines[2], " 1  o # E");
    }
}
