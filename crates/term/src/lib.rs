//! Terminal "snapshot renderer" module.
//!
//! Snapshots are painted onto a [`Surface`] by the [`SnapshotRenderer`]. The
//! usual surface is a [`PixelCanvas`], which [`CanvasView`] maps into a
//! character [`FrameBuffer`] of half-block pixels that [`TerminalRenderer`]
//! flushes with crossterm.
//!
//! Goals:
//! - Keep drawing pure and testable (record calls with [`RecordingSurface`])
//! - Always repaint the whole surface per snapshot
//! - Keep terminal I/O at the edge, behind a framebuffer

pub mod canvas;
pub mod draw;
pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod surface;

pub use tetris_view_types as types;

pub use canvas::{PixelCanvas, TextRun};
pub use draw::{PreviewSlot, SnapshotRenderer, HOLD_SLOT, NEXT_SLOT};
pub use fb::{Cell, CellStyle, FrameBuffer};
pub use game_view::{CanvasView, LinkState, StatusView, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, TerminalRenderer};
pub use surface::{DrawOp, Rect, RecordingSurface, Surface, TextStyle};
