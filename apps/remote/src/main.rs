use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use remote_core::{RemoteEvent, RemoteSession};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

mod config;
mod frames;

use config::{load_config, CliOverrides};
use frames::feed_frames;

/// Gesture-driven playback remote.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the control service.
    #[arg(long)]
    control_url: Option<String>,
    /// Config file; defaults to ./remote.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Classifier frames, one probability vector per line ("-" for stdin).
    #[arg(long)]
    frames: Option<String>,
    /// Delay between consecutive frames read from `--frames`.
    #[arg(long, default_value_t = 100)]
    frame_interval_ms: u64,
    #[arg(long)]
    width: Option<f32>,
    #[arg(long)]
    height: Option<f32>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            control_url: self.control_url.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), &args.overrides())?;
    info!(
        control_url = %config.control_url,
        width = config.display.width,
        height = config.display.height,
        "starting gesture remote"
    );
    let session = RemoteSession::connect(config).context("failed to set up control client")?;
    let logger = tokio::spawn(log_events(session.subscribe()));
    session.start().await;

    let run = async {
        if let Some(source) = args.frames.as_deref() {
            let pace = Duration::from_millis(args.frame_interval_ms);
            feed_frames(&session, source, pace).await?;
        }
        info!("press Ctrl-C to stop");
        std::future::pending::<Result<()>>().await
    };

    let outcome = tokio::select! {
        result = run => result,
        signal = tokio::signal::ctrl_c() => signal.context("failed to listen for Ctrl-C"),
    };

    session.shutdown();
    logger.abort();
    outcome
}

async fn log_events(mut rx: broadcast::Receiver<RemoteEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => log_event(&event),
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "event logger lagging"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn log_event(event: &RemoteEvent) {
    match event {
        RemoteEvent::Status(text) => info!(status = %text),
        RemoteEvent::TrackShown(track) => info!(
            title = %track.title,
            artist = %track.artist,
            album_image = ?track.album_image,
            "now playing"
        ),
        RemoteEvent::TrackCleared => info!("nothing playing"),
        RemoteEvent::WordsReplaced(words) => info!(words = words.len(), "lyrics loaded"),
        RemoteEvent::CommandAccepted(command) => debug!(%command, "command accepted"),
        RemoteEvent::Predictions(labelled) => trace!(?labelled, "predictions"),
        RemoteEvent::WordMoved { index, position } => {
            trace!(index, x = position.x, y = position.y, "word moved")
        }
    }
}
