//! Viewer session: one surface, one renderer, one connection's worth of
//! events.
//!
//! A [`Session`] is constructed once per connection and fed every
//! [`ClientEvent`] in arrival order. It decides whether a snapshot may be
//! drawn, redraws the surface when it may, and logs connection lifecycle.
//! Rejected snapshots never touch the surface, so the previous frame stays
//! visible.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::adapter::ClientEvent;
use crate::term::{LinkState, SnapshotRenderer, StatusView, Surface};
use crate::types::{Snapshot, PANEL_X};

/// Why a decoded snapshot was not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Grid dimensions differ from the first snapshot of the session.
    DimensionsChanged {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Grid does not fit in the board area of the surface.
    GridTooLarge {
        dims: (usize, usize),
        max: (usize, usize),
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DimensionsChanged { expected, found } => write!(
                f,
                "grid is {}x{}, session started with {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            SessionError::GridTooLarge { dims, max } => write!(
                f,
                "grid {}x{} does not fit the board area (max {}x{})",
                dims.0, dims.1, max.0, max.1
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// What handling an event did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The surface was cleared and repainted.
    Redrawn,
    /// The surface is untouched.
    Unchanged,
}

pub struct Session<S: Surface> {
    surface: S,
    renderer: SnapshotRenderer,
    grid_dims: Option<(usize, usize)>,
    link: LinkState,
    frames: u64,
    rejected: u64,
}

impl<S: Surface> Session<S> {
    pub fn new(surface: S) -> Self {
        Self::with_renderer(surface, SnapshotRenderer::default())
    }

    pub fn with_renderer(surface: S, renderer: SnapshotRenderer) -> Self {
        Self {
            surface,
            renderer,
            grid_dims: None,
            link: LinkState::Connecting,
            frames: 0,
            rejected: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn link(&self) -> LinkState {
        self.link
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Grid dimensions pinned by the first accepted snapshot.
    pub fn grid_dims(&self) -> Option<(usize, usize)> {
        self.grid_dims
    }

    pub fn status(&self) -> StatusView {
        StatusView {
            link: self.link,
            frames: self.frames,
            rejected: self.rejected,
        }
    }

    /// Largest grid (columns, rows) that fits left of the side panel.
    pub fn max_grid(&self) -> (usize, usize) {
        let cell = self.renderer.cell_size().max(1);
        let cols = (PANEL_X.max(0) as u32 / cell) as usize;
        let rows = (self.surface.height() / cell) as usize;
        (cols, rows)
    }

    /// Handle one event to completion.
    pub fn handle_event(&mut self, event: ClientEvent) -> Outcome {
        if self.link == LinkState::Closed {
            debug!(event = event.kind(), "event after close ignored");
            return Outcome::Unchanged;
        }

        match event {
            ClientEvent::Opened => {
                info!("connection established");
                self.link = LinkState::Open;
                Outcome::Unchanged
            }
            ClientEvent::Snapshot(snap) => match self.apply(&snap) {
                Ok(()) => Outcome::Redrawn,
                Err(e) => {
                    self.rejected += 1;
                    warn!(error = %e, "snapshot rejected; keeping previous frame");
                    Outcome::Unchanged
                }
            },
            ClientEvent::Malformed(e) => {
                self.rejected += 1;
                warn!(error = %e, "malformed message; keeping previous frame");
                Outcome::Unchanged
            }
            ClientEvent::TransportError(reason) => {
                error!(%reason, "connection error");
                Outcome::Unchanged
            }
            ClientEvent::Closed => {
                info!(frames = self.frames, rejected = self.rejected, "connection closed");
                self.link = LinkState::Closed;
                Outcome::Unchanged
            }
        }
    }

    /// Validate `snap` against the session, then repaint the surface.
    ///
    /// Validation happens before the surface is cleared: a rejected snapshot
    /// leaves the previous frame intact.
    pub fn apply(&mut self, snap: &Snapshot) -> Result<(), SessionError> {
        let dims = snap.grid.dimensions();
        let max = self.max_grid();
        if dims.0 > max.0 || dims.1 > max.1 {
            return Err(SessionError::GridTooLarge { dims, max });
        }
        if let Some(expected) = self.grid_dims {
            if expected != dims {
                return Err(SessionError::DimensionsChanged {
                    expected,
                    found: dims,
                });
            }
        }

        self.renderer.redraw(&mut self.surface, snap);
        self.grid_dims = Some(dims);
        self.frames += 1;
        debug!(
            frame = self.frames,
            score = snap.score,
            level = snap.level,
            "snapshot drawn"
        );
        Ok(())
    }
}
