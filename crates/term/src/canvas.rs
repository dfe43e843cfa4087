//! Pixel canvas: the drawing surface snapshots are painted onto.
//!
//! Rectangles go into an RGB pixel buffer. Text is kept as a separate layer
//! of [`TextRun`]s because the terminal presenter prints glyphs rather than
//! rasterising them.

use crate::surface::{Rect, Surface, TextStyle};
use crate::types::{Rgb, CLEAR_COLOR, SURFACE_HEIGHT, SURFACE_WIDTH};

/// Text placed on the canvas, baseline at (`x`, `y`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    background: Rgb,
    pixels: Vec<Rgb>,
    texts: Vec<TextRun>,
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, CLEAR_COLOR)
    }

    pub fn with_background(width: u32, height: u32, background: Rgb) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            background,
            pixels: vec![background; len],
            texts: Vec::new(),
        }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    /// Clip `rect` to the canvas; `None` if nothing is left.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(rect.x).max(0);
        let y0 = i64::from(rect.y).max(0);
        let x1 = (i64::from(rect.x) + i64::from(rect.w)).min(i64::from(self.width));
        let y1 = (i64::from(rect.y) + i64::from(rect.h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn paint_span(&mut self, y: u32, x0: u32, x1: u32, color: Rgb) {
        let row = (y as usize) * (self.width as usize);
        self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
    }
}

impl Surface for PixelCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
        self.texts.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            self.paint_span(y, x0, x1, color);
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb) {
        if rect.w == 0 || rect.h == 0 {
            return;
        }
        let right = rect.x + rect.w as i32 - 1;
        let bottom = rect.y + rect.h as i32 - 1;
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, bottom, rect.w, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color);
        self.fill_rect(Rect::new(right, rect.y, 1, rect.h), color);
    }

    fn fill_text(&mut self, x: i32, y: i32, text: &str, style: TextStyle) {
        self.texts.push(TextRun {
            x,
            y,
            text: text.to_string(),
            style,
        });
    }
}
