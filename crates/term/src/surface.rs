//! Drawing surface abstraction.
//!
//! The snapshot renderer only talks to a [`Surface`]: clear, filled and
//! outlined rectangles, and text. [`RecordingSurface`] keeps the calls as a
//! list of [`DrawOp`]s so draw order and coordinates can be asserted.

use crate::types::Rgb;

/// Pixel rectangle. `x`/`y` may be negative; surfaces clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Axis-aligned square of edge `size` at (`x`, `y`).
    pub const fn square(x: i32, y: i32, size: u32) -> Self {
        Self::new(x, y, size, size)
    }
}

/// Font settings for [`Surface::fill_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub color: Rgb,
    pub size_px: u32,
}

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reset the whole surface to its background.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// One pixel outline along the inside edge of `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: Rgb);

    /// Draw `text` with its baseline at `y`, starting at `x`.
    fn fill_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear,
    Fill { rect: Rect, color: Rgb },
    Stroke { rect: Rect, color: Rgb },
    Text {
        x: i32,
        y: i32,
        text: String,
        style: TextStyle,
    },
}

impl DrawOp {
    pub fn is_fill(&self) -> bool {
        matches!(self, DrawOp::Fill { .. })
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self, DrawOp::Stroke { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Surface that records calls instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn fills(&self) -> impl Iterator<Item = (Rect, Rgb)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill { rect, color } => Some((*rect, *color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(DrawOp::text)
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::Stroke { rect, color });
    }

    fn fill_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            style,
        });
    }
}
