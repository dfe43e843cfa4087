//! Protocol module - JSON snapshot messages pushed by the game peer
//!
//! Each WebSocket text frame carries one JSON object:
//!
//! ```text
//! {"grid":[["#000000", ...], ...],
//!  "current_piece":{"shape":[[1,1],[1,1]],"x":4,"y":0,"color":"#F0F000"},
//!  "next_piece":{"shape":[[1,1,1,1]],"color":"#00F0F0"},
//!  "hold_piece":null,
//!  "score":150,"level":0,"high_score":900}
//! ```
//!
//! Decoding happens in two steps: serde maps the text onto loose wire structs,
//! then `into_snapshot` validates them into the strict [`Snapshot`] model.
//! Anything that would leave the drawing undefined (ragged rows, unknown
//! colors, missing fields) is a [`PayloadError`].

use std::fmt;

use serde::Deserialize;

use crate::types::{CellColor, Grid, GridError, Piece, Rgb, Shape, Snapshot};

/// A color as sent on the wire: a CSS-like string or an `[r, g, b]` triplet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireColor {
    Text(String),
    Triplet([u8; 3]),
}

impl WireColor {
    fn describe(&self) -> String {
        match self {
            WireColor::Text(s) => s.clone(),
            WireColor::Triplet([r, g, b]) => format!("[{}, {}, {}]", r, g, b),
        }
    }
}

/// A shape cell: `true`/`false` or an integer where non-zero is solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireFlag {
    Bool(bool),
    Int(i64),
}

impl WireFlag {
    pub fn is_set(self) -> bool {
        match self {
            WireFlag::Bool(b) => b,
            WireFlag::Int(n) => n != 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePiece {
    pub shape: Vec<Vec<WireFlag>>,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub color: WireColor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSnapshot {
    pub grid: Vec<Vec<Option<WireColor>>>,
    pub current_piece: WirePiece,
    #[serde(default)]
    pub next_piece: Option<WirePiece>,
    #[serde(default)]
    pub hold_piece: Option<WirePiece>,
    pub score: i64,
    pub level: i64,
    pub high_score: i64,
}

/// Which piece of a snapshot a piece-level error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceSlot {
    Current,
    Next,
    Hold,
}

impl PieceSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceSlot::Current => "current_piece",
            PieceSlot::Next => "next_piece",
            PieceSlot::Hold => "hold_piece",
        }
    }
}

/// Why an inbound message could not become a [`Snapshot`].
#[derive(Debug)]
pub enum PayloadError {
    /// Not JSON, or JSON that does not match the snapshot schema.
    Json(serde_json::Error),
    /// Binary frame that is not UTF-8 text.
    NotText,
    /// A grid cell color that is not a recognised color.
    GridColor { x: usize, y: usize, value: String },
    /// Grid is empty or ragged.
    Grid(GridError),
    /// Piece color that is not a recognised color, or the empty marker.
    PieceColor { slot: PieceSlot, value: String },
    /// Piece shape is ragged.
    Shape { slot: PieceSlot, err: GridError },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Json(e) => write!(f, "invalid snapshot json: {}", e),
            PayloadError::NotText => write!(f, "binary frame is not utf-8 text"),
            PayloadError::GridColor { x, y, value } => {
                write!(f, "grid cell ({}, {}) has unknown color {:?}", x, y, value)
            }
            PayloadError::Grid(e) => write!(f, "invalid grid: {}", e),
            PayloadError::PieceColor { slot, value } => {
                write!(f, "{} has unusable color {:?}", slot.as_str(), value)
            }
            PayloadError::Shape { slot, err } => {
                write!(f, "{} has invalid shape: {}", slot.as_str(), err)
            }
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayloadError::Json(e) => Some(e),
            PayloadError::Grid(e) => Some(e),
            PayloadError::Shape { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(e: serde_json::Error) -> Self {
        PayloadError::Json(e)
    }
}

/// Parse a color string.
///
/// Accepts `#RGB`, `#RRGGBB`, `rgb(r, g, b)` and a handful of names. The
/// empty markers (`""`, `"empty"`, `"none"`) and black map to
/// [`CellColor::Empty`]. Returns `None` for anything unrecognised.
pub fn parse_color(s: &str) -> Option<CellColor> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("empty") || s.eq_ignore_ascii_case("none") {
        return Some(CellColor::Empty);
    }
    if s.starts_with('#') {
        return Rgb::from_hex(s).map(CellColor::from_rgb);
    }
    if let Some(rgb) = parse_rgb_function(s) {
        return Some(CellColor::from_rgb(rgb));
    }
    named_color(s).map(CellColor::from_rgb)
}

fn parse_rgb_function(s: &str) -> Option<Rgb> {
    let lower = s.to_ascii_lowercase();
    let inner = lower.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb::new(r, g, b))
}

fn named_color(s: &str) -> Option<Rgb> {
    let rgb = match s.to_ascii_lowercase().as_str() {
        "black" => Rgb::new(0, 0, 0),
        "white" => Rgb::new(255, 255, 255),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        "red" => Rgb::new(240, 0, 0),
        "green" => Rgb::new(0, 240, 0),
        "blue" => Rgb::new(0, 0, 240),
        "cyan" => Rgb::new(0, 240, 240),
        "yellow" => Rgb::new(240, 240, 0),
        "orange" => Rgb::new(240, 160, 0),
        "purple" => Rgb::new(160, 0, 240),
        "magenta" => Rgb::new(240, 0, 240),
        _ => return None,
    };
    Some(rgb)
}

fn wire_cell_color(color: &WireColor) -> Option<CellColor> {
    match color {
        WireColor::Text(s) => parse_color(s),
        WireColor::Triplet([r, g, b]) => Some(CellColor::from_rgb(Rgb::new(*r, *g, *b))),
    }
}

impl WirePiece {
    fn into_piece(self, slot: PieceSlot) -> Result<Piece, PayloadError> {
        let color = match wire_cell_color(&self.color) {
            Some(CellColor::Filled(rgb)) => rgb,
            _ => {
                return Err(PayloadError::PieceColor {
                    slot,
                    value: self.color.describe(),
                })
            }
        };
        let rows = self
            .shape
            .into_iter()
            .map(|row| row.into_iter().map(WireFlag::is_set).collect())
            .collect();
        let shape = Shape::from_rows(rows).map_err(|err| PayloadError::Shape { slot, err })?;
        Ok(Piece {
            shape,
            x: self.x,
            y: self.y,
            color,
        })
    }
}

impl WireSnapshot {
    /// Validate the loose wire form into a [`Snapshot`].
    pub fn into_snapshot(self) -> Result<Snapshot, PayloadError> {
        let mut rows = Vec::with_capacity(self.grid.len());
        for (y, wire_row) in self.grid.into_iter().enumerate() {
            let mut row = Vec::with_capacity(wire_row.len());
            for (x, cell) in wire_row.into_iter().enumerate() {
                let color = match cell {
                    None => CellColor::Empty,
                    Some(c) => wire_cell_color(&c).ok_or_else(|| PayloadError::GridColor {
                        x,
                        y,
                        value: c.describe(),
                    })?,
                };
                row.push(color);
            }
            rows.push(row);
        }
        let grid = Grid::from_rows(rows).map_err(PayloadError::Grid)?;

        let current_piece = self.current_piece.into_piece(PieceSlot::Current)?;
        let next_piece = self
            .next_piece
            .map(|p| p.into_piece(PieceSlot::Next))
            .transpose()?;
        let hold_piece = self
            .hold_piece
            .map(|p| p.into_piece(PieceSlot::Hold))
            .transpose()?;

        Ok(Snapshot {
            grid,
            current_piece,
            next_piece,
            hold_piece,
            score: self.score,
            level: self.level,
            high_score: self.high_score,
        })
    }
}

/// Parse one inbound message into a validated [`Snapshot`].
pub fn parse_snapshot(json: &str) -> Result<Snapshot, PayloadError> {
    let wire: WireSnapshot = serde_json::from_str(json)?;
    wire.into_snapshot()
}
