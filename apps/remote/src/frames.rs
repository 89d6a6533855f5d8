use std::time::Duration;

use anyhow::Context;
use remote_core::RemoteSession;
use tokio::{
    fs::File,
    io::{self, AsyncBufRead, AsyncBufReadExt, BufReader},
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

/// Parses one line of classifier output: floats separated by whitespace or
/// commas, or a JSON array. Blank lines and `#` comments yield `None`.
pub fn parse_frame(line: &str) -> anyhow::Result<Option<Vec<f32>>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line.starts_with('[') {
        let values: Vec<f32> = serde_json::from_str(line).context("invalid JSON frame")?;
        return Ok(Some(values));
    }
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f32>()
                .with_context(|| format!("invalid probability '{token}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map(Some)
}

async fn open(source: &str) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if source == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(source)
        .await
        .with_context(|| format!("failed to open frame source '{source}'"))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Feeds every frame from `source` ("-" for stdin) into the session, one per
/// `pace`. Malformed lines are logged and skipped.
pub async fn feed_frames(
    session: &RemoteSession,
    source: &str,
    pace: Duration,
) -> anyhow::Result<()> {
    let mut lines = open(source).await?.lines();
    let mut ticker = interval(pace.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut line_no = 0usize;
    let mut fed = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let probabilities = match parse_frame(&line) {
            Ok(Some(probabilities)) => probabilities,
            Ok(None) => continue,
            Err(error) => {
                warn!(line = line_no, error = %format!("{error:#}"), "skipping malformed frame");
                continue;
            }
        };

        ticker.tick().await;
        match session.on_frame(&probabilities) {
            Ok(accepted) if !accepted.is_empty() => {
                debug!(line = line_no, ?accepted, "frame dispatched commands");
            }
            Ok(_) => {}
            Err(error) => warn!(line = line_no, %error, "frame rejected"),
        }
        fed += 1;
    }

    info!(source, frames = fed, "frame source exhausted");
    Ok(())
}
