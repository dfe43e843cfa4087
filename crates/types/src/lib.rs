//! Core types module - snapshot data model and layout constants
//!
//! This module defines the data a game peer pushes to the viewer and the fixed
//! geometry of the drawing surface. All types are plain data with no external
//! dependencies, so they can be used by the wire protocol, the renderer and
//! the tests alike.
//!
//! # Surface Layout
//!
//! The drawing surface is a fixed 600x500 pixel canvas. The board is drawn
//! from the top-left corner; the side panel starts at `PANEL_X`.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `CELL_SIZE` | 20 | Edge of one grid square in pixels |
//! | `SURFACE_WIDTH` | 600 | Canvas width |
//! | `SURFACE_HEIGHT` | 500 | Canvas height |
//! | `PANEL_X` | 420 | Left edge of the side panel |
//! | `PREVIEW_CELLS` | 4 | Edge of the next/hold preview box in cells |
//!
//! # Side Panel
//!
//! | Item | Position (x, y) |
//! |------|-----------------|
//! | `Score: N` | (420, 50) |
//! | `Level: N` | (420, 100) |
//! | `High Score: N` | (420, 150) |
//! | `Next:` label / cells | (420, 200) / (420, 210) |
//! | `Hold:` label / cells | (420, 320) / (420, 330) |
//!
//! Text positions are baselines.
//!
//! # Examples
//!
//! ```
//! use tetris_view_types::{CellColor, Grid, Rgb, Shape};
//!
//! let red = Rgb::from_hex("#F00000").unwrap();
//! assert_eq!(red, Rgb::new(0xF0, 0, 0));
//!
//! let grid = Grid::from_rows(vec![
//!     vec![CellColor::Empty, CellColor::Filled(red)],
//!     vec![CellColor::Empty, CellColor::Empty],
//! ])
//! .unwrap();
//! assert_eq!((grid.width(), grid.height()), (2, 2));
//!
//! let shape = Shape::from_rows(vec![vec![true, false], vec![true, true]]).unwrap();
//! assert_eq!(shape.filled().count(), 3);
//! ```

use std::fmt;

/// Edge of one grid square in pixels
pub const CELL_SIZE: u32 = 20;

/// Drawing surface width in pixels (board area + side panel)
pub const SURFACE_WIDTH: u32 = 600;

/// Drawing surface height in pixels
pub const SURFACE_HEIGHT: u32 = 500;

/// Left edge of the side panel; the board must fit to the left of it
pub const PANEL_X: i32 = 420;

/// Preview boxes are `PREVIEW_CELLS` x `PREVIEW_CELLS` cells
pub const PREVIEW_CELLS: usize = 4;

/// UI text size in pixels
pub const UI_FONT_PX: u32 = 20;

/// Baselines of the three UI lines, in draw order
pub const SCORE_TEXT_POS: (i32, i32) = (PANEL_X, 50);
pub const LEVEL_TEXT_POS: (i32, i32) = (PANEL_X, 100);
pub const HIGH_SCORE_TEXT_POS: (i32, i32) = (PANEL_X, 150);

pub const NEXT_LABEL_POS: (i32, i32) = (PANEL_X, 200);
pub const NEXT_PREVIEW_ANCHOR: (i32, i32) = (PANEL_X, 210);
pub const HOLD_LABEL_POS: (i32, i32) = (PANEL_X, 320);
pub const HOLD_PREVIEW_ANCHOR: (i32, i32) = (PANEL_X, 330);

/// Outline drawn around every filled square
pub const BORDER_COLOR: Rgb = Rgb::new(0x80, 0x80, 0x80);

/// Fill used for empty grid cells
pub const EMPTY_COLOR: Rgb = Rgb::new(0, 0, 0);

/// Colour the whole surface is cleared to
pub const CLEAR_COLOR: Rgb = Rgb::new(0, 0, 0);

pub const TEXT_COLOR: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

/// Default peer host
pub const DEFAULT_HOST: &str = "localhost";

/// Default peer port
pub const DEFAULT_PORT: u16 = 8765;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (case-insensitive, leading `#` required)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_view_types::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#fff"), Some(Rgb::new(255, 255, 255)));
    /// assert_eq!(Rgb::from_hex("#00F0F0"), Some(Rgb::new(0, 0xF0, 0xF0)));
    /// assert_eq!(Rgb::from_hex("00F0F0"), None);
    /// assert_eq!(Rgb::from_hex("#12345"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 16 + v;
                }
                Some(Self::new(out[0], out[1], out[2]))
            }
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    pub fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// One grid cell: empty, or occupied with a fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    #[default]
    Empty,
    Filled(Rgb),
}

impl CellColor {
    /// Black is the peer's marker for an empty cell.
    pub fn from_rgb(rgb: Rgb) -> Self {
        if rgb.is_black() {
            CellColor::Empty
        } else {
            CellColor::Filled(rgb)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellColor::Empty)
    }

    /// Color used to paint this cell.
    pub fn fill(&self) -> Rgb {
        match self {
            CellColor::Empty => EMPTY_COLOR,
            CellColor::Filled(rgb) => *rgb,
        }
    }
}

/// Reason a row-major matrix was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// No rows, or rows with no columns.
    Empty,
    /// A row whose length differs from the first row.
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "matrix has no cells"),
            GridError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells, expected {} like the first row",
                row, found, expected
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Flatten rows into a row-major vec, checking they all share one width.
fn flatten_rows<T>(rows: Vec<Vec<T>>) -> Result<(usize, usize, Vec<T>), GridError> {
    let height = rows.len();
    let width = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut cells = Vec::with_capacity(width * height);
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != width {
            return Err(GridError::Ragged {
                row: i,
                expected: width,
                found: row.len(),
            });
        }
        cells.extend(row);
    }
    Ok((width, height, cells))
}

/// Rectangular board of cell colors, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellColor>,
}

impl Grid {
    /// Build a grid from rows. At least one row and one column are required
    /// and every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<CellColor>>) -> Result<Self, GridError> {
        let (width, height, cells) = flatten_rows(rows)?;
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A `width` x `height` grid of empty cells.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellColor::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (columns, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<CellColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, cell: CellColor) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    /// Board-relative bounds check for signed coordinates.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Iterate `(x, y, cell)` row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellColor)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i % self.width, i / self.width, *c))
    }
}

/// Rectangular boolean matrix describing which cells of a piece are solid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Build a shape from rows. An empty shape (`[]`) is allowed and draws
    /// nothing; ragged rows are refused.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GridError> {
        let (width, height, cells) = flatten_rows(rows)?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height && self.cells[row * self.width + col]
    }

    /// Iterate `(col, row)` of solid cells, row by row.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, solid)| **solid)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }
}

/// A shape placed on the board with a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub color: Rgb,
}

/// Complete visible game state at one instant.
///
/// `next_piece` and `hold_piece` are optional: peers omit them (or send
/// `null`) before a next piece is known or while nothing is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Grid,
    pub current_piece: Piece,
    pub next_piece: Option<Piece>,
    pub hold_piece: Option<Piece>,
    pub score: i64,
    pub level: i64,
    pub high_score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_fits_default_board_and_panel() {
        // 10x20 board at 20px = 200x400, left of the panel and inside the canvas.
        assert!(10 * CELL_SIZE as i32 <= PANEL_X);
        assert!(20 * CELL_SIZE <= SURFACE_HEIGHT);

        let preview_px = PREVIEW_CELLS as i32 * CELL_SIZE as i32;
        assert!(NEXT_PREVIEW_ANCHOR.1 + preview_px <= HOLD_LABEL_POS.1);
        assert!(HOLD_PREVIEW_ANCHOR.1 + preview_px <= SURFACE_HEIGHT as i32);
        assert!(PANEL_X + preview_px <= SURFACE_WIDTH as i32);
    }

    #[test]
    fn black_cells_are_empty() {
        assert_eq!(CellColor::from_rgb(Rgb::new(0, 0, 0)), CellColor::Empty);
        assert_eq!(
            CellColor::from_rgb(Rgb::new(1, 0, 0)),
            CellColor::Filled(Rgb::new(1, 0, 0))
        );
        assert_eq!(CellColor::Empty.fill(), EMPTY_COLOR);
    }

    #[test]
    fn grid_rejects_ragged_and_empty_rows() {
        let c = CellColor::Empty;
        assert_eq!(
            Grid::from_rows(vec![vec![c, c], vec![c]]),
            Err(GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(Grid::from_rows(vec![]), Err(GridError::Empty));
        assert_eq!(Grid::from_rows(vec![vec![], vec![]]), Err(GridError::Empty));
    }

    #[test]
    fn grid_iterates_row_major() {
        let red = CellColor::Filled(Rgb::new(255, 0, 0));
        let mut grid = Grid::empty(3, 2);
        grid.set(2, 1, red);

        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], (0, 0, CellColor::Empty));
        assert_eq!(cells[3], (0, 1, CellColor::Empty));
        assert_eq!(cells[5], (2, 1, red));
        assert!(grid.contains(2, 1));
        assert!(!grid.contains(3, 0));
        assert!(!grid.contains(0, -1));
    }

    #[test]
    fn shape_lists_only_solid_cells() {
        let shape = Shape::from_rows(vec![vec![false, true, false], vec![true, true, true]])
            .unwrap();
        let filled: Vec<_> = shape.filled().collect();
        assert_eq!(filled, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert!(!shape.is_filled(0, 0));
        assert!(!shape.is_filled(5, 5));

        let empty = Shape::from_rows(vec![]).unwrap();
        assert_eq!(empty.filled().count(), 0);
    }

    #[test]
    fn rgb_displays_as_hex() {
        assert_eq!(Rgb::new(0xF0, 0xA0, 0).to_string(), "#F0A000");
    }
}
