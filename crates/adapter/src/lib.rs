//! Adapter module - snapshot feed over a WebSocket
//!
//! This module connects the viewer to the external game peer. The peer owns
//! all game logic; the viewer only listens.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: Client connects to `ws://{host}:{port}` (default: localhost:8765)
//! 2. **Streaming**: Peer sends one text frame per state change, each a full JSON snapshot
//! 3. **Silence**: Client never sends application messages
//! 4. **Close**: Either side closes; the client does not reconnect
//!
//! # Events
//!
//! The client task reports everything as a [`ClientEvent`]:
//!
//! - **Opened**: handshake done
//! - **Snapshot**: a decoded, validated [`types::Snapshot`]
//! - **Malformed**: the frame was not a valid snapshot (skipped)
//! - **TransportError**: connect or read failure
//! - **Closed**: always the last event
//!
//! # Environment Variables
//!
//! - `TETRIS_VIEW_HOST`: Peer host (default: "localhost")
//! - `TETRIS_VIEW_PORT`: Peer port (default: 8765)
//! - `TETRIS_VIEW_WIRE_LOG`: Append inbound frames to this file (JSONL)
//!
//! # Implementation
//!
//! - Uses **tokio** + **tokio-tungstenite** for the connection
//! - [`runtime::Adapter`] owns the runtime and hands events to a sync loop
//! - See [`protocol`] for the snapshot schema and validation
//! - [`feed`] replays recorded frames, standing in for a game peer

pub mod client;
pub mod feed;
pub mod protocol;
pub mod runtime;

pub use tetris_view_types as types;

pub use client::{decode_text, run_client, ClientConfig};
pub use protocol::{parse_color, parse_snapshot, PayloadError, PieceSlot};
pub use runtime::{Adapter, ClientEvent};
