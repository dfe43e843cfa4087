//! Tetris snapshot viewer (default binary).
//!
//! Connects to the game peer (`TETRIS_VIEW_HOST`/`TETRIS_VIEW_PORT`, default
//! localhost:8765) and redraws every snapshot in the terminal. Press `q` to
//! quit. Set `TETRIS_VIEW_HEADLESS=1` to run without a terminal UI.

use anyhow::Result;

use tetris_view::app::{self, AppConfig};
use tetris_view::logging;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    logging::init(&config.log_target)?;
    app::run(config)
}
