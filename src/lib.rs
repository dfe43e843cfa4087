//! Tetris snapshot viewer (workspace facade crate).
//!
//! The game runs in an external peer. This crate listens to the peer's
//! snapshot feed and redraws the whole picture for every snapshot.
//!
//! - [`adapter`]: WebSocket client and snapshot protocol
//! - [`term`]: surfaces, the snapshot renderer and terminal output
//! - [`types`]: data model and layout constants
//! - [`session`]: per-connection state and event handling
//! - [`app`]: terminal and headless run loops

pub use tetris_view_adapter as adapter;
pub use tetris_view_term as term;
pub use tetris_view_types as types;

pub mod app;
pub mod logging;
pub mod session;

pub use session::{Outcome, Session, SessionError};
