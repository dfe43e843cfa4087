//! SnapshotRenderer: paints a `Snapshot` onto a [`Surface`].
//!
//! This module is pure (no I/O). Every redraw is a full replace: the surface
//! is cleared and everything is painted again in a fixed order, so later
//! calls may overlap earlier ones.

use crate::surface::{Rect, Surface, TextStyle};
use crate::types::{
    Grid, Piece, Rgb, Snapshot, BORDER_COLOR, CELL_SIZE, HIGH_SCORE_TEXT_POS, HOLD_LABEL_POS,
    HOLD_PREVIEW_ANCHOR, LEVEL_TEXT_POS, NEXT_LABEL_POS, NEXT_PREVIEW_ANCHOR, PREVIEW_CELLS,
    SCORE_TEXT_POS, TEXT_COLOR, UI_FONT_PX,
};

/// Where a preview box and its label go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSlot {
    pub label: &'static str,
    pub label_pos: (i32, i32),
    pub anchor: (i32, i32),
}

pub const NEXT_SLOT: PreviewSlot = PreviewSlot {
    label: "Next:",
    label_pos: NEXT_LABEL_POS,
    anchor: NEXT_PREVIEW_ANCHOR,
};

pub const HOLD_SLOT: PreviewSlot = PreviewSlot {
    label: "Hold:",
    label_pos: HOLD_LABEL_POS,
    anchor: HOLD_PREVIEW_ANCHOR,
};

/// Stateless snapshot painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotRenderer {
    /// Edge of one square in pixels.
    cell: u32,
    border: Rgb,
    text: TextStyle,
}

impl Default for SnapshotRenderer {
    fn default() -> Self {
        Self {
            cell: CELL_SIZE,
            border: BORDER_COLOR,
            text: TextStyle {
                color: TEXT_COLOR,
                size_px: UI_FONT_PX,
            },
        }
    }
}

impl SnapshotRenderer {
    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    /// Clear the surface and paint `snap`: grid, current piece, next preview,
    /// hold preview, UI text.
    pub fn redraw<S: Surface + ?Sized>(&self, surface: &mut S, snap: &Snapshot) {
        surface.clear();
        self.draw_grid(surface, &snap.grid);
        self.draw_piece(surface, &snap.current_piece, &snap.grid);
        self.draw_next_piece(surface, snap.next_piece.as_ref());
        self.draw_hold_piece(surface, snap.hold_piece.as_ref());
        self.draw_ui(surface, snap.score, snap.level, snap.high_score);
    }

    /// One fill + outline per grid cell, row-major. Empty cells use the
    /// empty fill.
    pub fn draw_grid<S: Surface + ?Sized>(&self, surface: &mut S, grid: &Grid) {
        for (x, y, cell) in grid.cells() {
            self.draw_square(surface, (0, 0), x as i32, y as i32, cell.fill());
        }
    }

    /// Solid cells of `piece` at its board position. Cells that land outside
    /// `grid`, or whose position does not fit in an `i32`, are skipped.
    pub fn draw_piece<S: Surface + ?Sized>(&self, surface: &mut S, piece: &Piece, grid: &Grid) {
        for (col, row) in piece.shape.filled() {
            let (Some(x), Some(y)) = (offset(piece.x, col), offset(piece.y, row)) else {
                continue;
            };
            if grid.contains(x, y) {
                self.draw_square(surface, (0, 0), x, y, piece.color);
            }
        }
    }

    pub fn draw_next_piece<S: Surface + ?Sized>(&self, surface: &mut S, piece: Option<&Piece>) {
        self.draw_preview(surface, NEXT_SLOT, piece);
    }

    pub fn draw_hold_piece<S: Surface + ?Sized>(&self, surface: &mut S, piece: Option<&Piece>) {
        self.draw_preview(surface, HOLD_SLOT, piece);
    }

    /// Label, then the piece's solid cells at the slot anchor. The piece's
    /// own x/y are ignored; cells beyond the preview box are skipped.
    pub fn draw_preview<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        slot: PreviewSlot,
        piece: Option<&Piece>,
    ) {
        let (lx, ly) = slot.label_pos;
        surface.fill_text(lx, ly, slot.label, self.text);

        let Some(piece) = piece else {
            return;
        };
        for (col, row) in piece.shape.filled() {
            if col < PREVIEW_CELLS && row < PREVIEW_CELLS {
                self.draw_square(surface, slot.anchor, col as i32, row as i32, piece.color);
            }
        }
    }

    /// Score, level and high score, one line each, in that order.
    pub fn draw_ui<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        score: i64,
        level: i64,
        high_score: i64,
    ) {
        let lines = [
            (SCORE_TEXT_POS, format!("Score: {}", score)),
            (LEVEL_TEXT_POS, format!("Level: {}", level)),
            (HIGH_SCORE_TEXT_POS, format!("High Score: {}", high_score)),
        ];
        for ((x, y), text) in lines {
            surface.fill_text(x, y, &text, self.text);
        }
    }

    fn draw_square<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        origin: (i32, i32),
        cx: i32,
        cy: i32,
        color: Rgb,
    ) {
        let size = self.cell as i32;
        let rect = Rect::square(origin.0 + cx * size, origin.1 + cy * size, self.cell);
        surface.fill_rect(rect, color);
        surface.stroke_rect(rect, self.border);
    }
}

fn offset(base: i32, cells: usize) -> Option<i32> {
    base.checked_add(i32::try_from(cells).ok()?)
}
