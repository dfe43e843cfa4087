//! CanvasView: maps a [`PixelCanvas`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! One terminal cell covers `PX_PER_COL` x `PX_PER_ROW` canvas pixels and
//! shows two of them through an upper half block: the top half samples the
//! pixel at (+5, +5), the bottom half the pixel at (+5, +15). With 20 px grid
//! squares that makes every square 2 columns wide and 1 row tall, which
//! roughly matches terminal glyph aspect ratio.

use crate::canvas::PixelCanvas;
use crate::fb::{Cell, CellStyle, FrameBuffer};
use crate::surface::Surface;
use crate::types::Rgb;

pub const PX_PER_COL: u32 = 10;
pub const PX_PER_ROW: u32 = 20;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Connection state shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Open,
    Closed,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Connecting => "connecting",
            LinkState::Open => "connected",
            LinkState::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    pub link: LinkState,
    pub frames: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasView;

impl CanvasView {
    /// Terminal size needed to show the whole canvas.
    pub fn required_size(canvas: &PixelCanvas) -> (u16, u16) {
        let cols = canvas.width().div_ceil(PX_PER_COL);
        let rows = canvas.height().div_ceil(PX_PER_ROW);
        (
            cols.min(u16::MAX as u32) as u16,
            rows.min(u16::MAX as u32) as u16,
        )
    }

    /// Render the canvas into an existing framebuffer, centred in the
    /// viewport. Parts that do not fit are clipped.
    pub fn render_into(
        &self,
        canvas: &PixelCanvas,
        status: Option<&StatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let (cols, rows) = Self::required_size(canvas);
        let start_x = viewport.width.saturating_sub(cols) / 2;
        let start_y = viewport.height.saturating_sub(rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let px = (col as u32 * PX_PER_COL + PX_PER_COL / 2) as i32;
                let py = (row as u32 * PX_PER_ROW) as i32;
                let top = sample(canvas, px, py + PX_PER_ROW as i32 / 4);
                let bottom = sample(canvas, px, py + PX_PER_ROW as i32 * 3 / 4);
                fb.set(
                    start_x.saturating_add(col),
                    start_y.saturating_add(row),
                    Cell::half_block(top, bottom),
                );
            }
        }

        for run in canvas.texts() {
            let Some((col, row)) = text_cell(run.x, run.y, run.style.size_px) else {
                continue;
            };
            fb.put_str(
                start_x.saturating_add(col),
                start_y.saturating_add(row),
                &run.text,
                run.style.color,
                true,
                None,
            );
        }

        if let Some(status) = status {
            self.draw_status_line(fb, status, viewport);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        canvas: &PixelCanvas,
        status: Option<&StatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(canvas, status, viewport, &mut fb);
        fb
    }

    fn draw_status_line(&self, fb: &mut FrameBuffer, status: &StatusView, viewport: Viewport) {
        if viewport.height == 0 {
            return;
        }
        let y = viewport.height - 1;
        let line = format!(
            " {} | frames {} | rejected {} | q to quit",
            status.link.as_str(),
            status.frames,
            status.rejected
        );
        let style = CellStyle::default();
        let fg = match status.link {
            LinkState::Open => Rgb::new(100, 220, 120),
            LinkState::Connecting => Rgb::new(240, 220, 80),
            LinkState::Closed => Rgb::new(220, 80, 80),
        };
        for x in 0..viewport.width {
            fb.set(x, y, Cell { ch: ' ', style });
        }
        fb.put_str(0, y, &line, fg, false, Some(style.bg));
    }
}

fn sample(canvas: &PixelCanvas, x: i32, y: i32) -> Rgb {
    canvas.pixel(x, y).unwrap_or_else(|| canvas.background())
}

/// Terminal cell of a text run's first glyph. The text row is the one whose
/// span holds the middle of the glyph box above the baseline.
fn text_cell(x: i32, baseline: i32, size_px: u32) -> Option<(u16, u16)> {
    let mid = baseline - (size_px / 2) as i32;
    if x < 0 || mid < 0 {
        return None;
    }
    let col = x as u32 / PX_PER_COL;
    let row = mid as u32 / PX_PER_ROW;
    Some((col.min(u16::MAX as u32) as u16, row.min(u16::MAX as u32) as u16))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::HALF_BLOCK;
    use crate::surface::{Rect, TextStyle};

    #[test]
    fn default_canvas_needs_60_by_25() {
        let canvas = PixelCanvas::default();
        assert_eq!(CanvasView::required_size(&canvas), (60, 25));
    }

    #[test]
    fn square_maps_to_two_half_block_columns() {
        let mut canvas = PixelCanvas::new(40, 40);
        let red = Rgb::new(240, 0, 0);
        canvas.fill_rect(Rect::square(20, 20, 20), red);

        let fb = CanvasView.render(&canvas, None, Viewport::new(4, 2));
        let black = canvas.background();
        for x in 2..4 {
            let cell = fb.get(x, 1).unwrap();
            assert_eq!(cell.ch, HALF_BLOCK);
            assert_eq!((cell.style.fg, cell.style.bg), (red, red));
        }
        let cell = fb.get(1, 1).unwrap();
        assert_eq!((cell.style.fg, cell.style.bg), (black, black));
    }

    #[test]
    fn text_runs_land_on_their_row_and_column() {
        let mut canvas = PixelCanvas::default();
        let style = TextStyle {
            color: Rgb::new(255, 255, 255),
            size_px: 20,
        };
        canvas.fill_text(420, 50, "Score: 10", style);
        canvas.fill_text(420, 150, "High Score: 100", style);

        let fb = CanvasView.render(&canvas, None, Viewport::new(60, 25));
        let row: String = fb.row_text(2).chars().skip(42).collect();
        assert!(row.starts_with("Score: 10"));
        assert!(fb.row_text(7).contains("High Score: 100"));
    }

    #[test]
    fn canvas_is_centred_and_status_uses_last_row() {
        let canvas = PixelCanvas::new(20, 20);
        let status = StatusView {
            link: LinkState::Closed,
            frames: 3,
            rejected: 1,
        };
        let fb = CanvasView.render(&canvas, Some(&status), Viewport::new(40, 5));

        // 2x1 cells centred: x = (40-2)/2 = 19, y = (5-1)/2 = 2.
        assert_eq!(fb.get(19, 2).unwrap().ch, HALF_BLOCK);
        assert_eq!(fb.get(18, 2).unwrap().ch, ' ');
        let last = fb.row_text(4);
        assert!(last.contains("closed"));
        assert!(last.contains("frames 3"));
        assert!(last.contains("rejected 1"));
    }
}
