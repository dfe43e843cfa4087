//! Replay a JSONL file of snapshots to any viewer that connects.
//!
//! Usage: `snapshot-feed <file.jsonl> [port] [interval_ms]`

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::net::TcpListener;

use tetris_view::adapter::feed;
use tetris_view::logging::{self, LogTarget};
use tetris_view::types::DEFAULT_PORT;

const DEFAULT_INTERVAL_MS: u64 = 500;

struct Args {
    path: String,
    port: u16,
    interval: Duration,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let Some(path) = args.next() else {
        bail!("usage: snapshot-feed <file.jsonl> [port] [interval_ms]");
    };
    let port = match args.next() {
        Some(p) => p.parse().with_context(|| format!("invalid port: {}", p))?,
        None => DEFAULT_PORT,
    };
    let interval_ms = match args.next() {
        Some(ms) => ms
            .parse()
            .with_context(|| format!("invalid interval: {}", ms))?,
        None => DEFAULT_INTERVAL_MS,
    };
    Ok(Args {
        path,
        port,
        interval: Duration::from_millis(interval_ms),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init(&LogTarget::Stderr)?;
    let args = parse_args(std::env::args().skip(1))?;

    let text = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("failed to read {}", args.path))?;
    let frames = feed::load_frames(&text);
    if frames.is_empty() {
        bail!("{} contains no frames", args.path);
    }

    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    feed::serve(listener, Arc::new(frames), args.interval).await
}
