//! Run loops.
//!
//! Both loops are single-threaded: the WebSocket task runs on the adapter's
//! runtime, but every event is handled on the calling thread, one at a time,
//! to completion.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::info;

use crate::adapter::{Adapter, ClientConfig, ClientEvent};
use crate::logging::{LogTarget, DEFAULT_LOG_FILE};
use crate::session::{Outcome, Session};
use crate::term::{CanvasView, FrameBuffer, PixelCanvas, TerminalRenderer, Viewport};

/// How long to wait for a key before checking the event channel again.
const INPUT_POLL: Duration = Duration::from_millis(16);

/// Everything `main` needs, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub headless: bool,
    pub log_target: LogTarget,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let client = ClientConfig::from_lookup(&lookup);
        let headless = lookup("TETRIS_VIEW_HEADLESS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let log_path = lookup("TETRIS_VIEW_LOG_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let log_target = match (log_path, headless) {
            (Some(path), _) => LogTarget::File(PathBuf::from(path)),
            (None, true) => LogTarget::Stderr,
            (None, false) => LogTarget::File(PathBuf::from(DEFAULT_LOG_FILE)),
        };

        Self {
            client,
            headless,
            log_target,
        }
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(url = %config.client.url(), headless = config.headless, "starting viewer");
    if config.headless {
        run_headless(config.client)
    } else {
        run_terminal(config.client)
    }
}

/// Check if key should end the session.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn run_terminal(client: ClientConfig) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = terminal_loop(&mut term, client);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn terminal_loop(term: &mut TerminalRenderer, client: ClientConfig) -> Result<()> {
    let mut adapter = Adapter::start(client)?;
    let mut session = Session::new(PixelCanvas::default());
    let view = CanvasView;
    let mut fb = FrameBuffer::new(0, 0);

    present(term, &view, &session, &mut fb)?;

    loop {
        if event::poll(INPUT_POLL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press && should_quit(key) => {
                    info!("quit requested");
                    return Ok(());
                }
                Event::Resize(..) => {
                    term.invalidate();
                    present(term, &view, &session, &mut fb)?;
                }
                _ => {}
            }
        }

        // Each event is handled and shown before the next one is taken.
        while let Some(ev) = adapter.try_recv() {
            session.handle_event(ev);
            present(term, &view, &session, &mut fb)?;
        }
    }
}

fn present(
    term: &mut TerminalRenderer,
    view: &CanvasView,
    session: &Session<PixelCanvas>,
    fb: &mut FrameBuffer,
) -> Result<()> {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let status = session.status();
    view.render_into(session.surface(), Some(&status), Viewport::new(w, h), fb);
    term.present(fb)
}

fn run_headless(client: ClientConfig) -> Result<()> {
    let mut adapter = Adapter::start(client)?;
    let mut session = Session::new(PixelCanvas::default());

    while let Some(ev) = adapter.recv_blocking() {
        let closed = matches!(ev, ClientEvent::Closed);
        if session.handle_event(ev) == Outcome::Redrawn {
            info!(frame = session.frames(), "frame drawn");
        }
        if closed {
            break;
        }
    }

    info!(
        frames = session.frames(),
        rejected = session.rejected(),
        "session finished"
    );
    Ok(())
}
