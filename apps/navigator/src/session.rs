use anyhow::{Context, Result};
use futures::StreamExt;
use mvp_core::{Location, PlaceManager, Surface, Transition};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const QUIT_COMMANDS: [&str; 2] = ["quit", "exit"];

/// Handles the current location, then assigns every input line as a new
/// location and waits for its transition before reading the next one.
/// Returns the transitions in the order they ran.
pub async fn drive<S, R>(
    manager: &mut PlaceManager<S>,
    location: &dyn Location,
    input: R,
) -> Result<Vec<Transition>>
where
    S: Surface,
    R: AsyncBufRead + Unpin,
{
    let mut changes = location.changes();
    let mut transitions = Vec::new();

    if let Some(raw) = changes.next().await {
        transitions.push(manager.handle_location(&raw));
    }

    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read location from input")?
    {
        let line = line.trim();
        if QUIT_COMMANDS.contains(&line) {
            debug!("quit requested");
            break;
        }

        location.assign(line);
        let Some(raw) = changes.next().await else {
            break;
        };
        transitions.push(manager.handle_location(&raw));
    }

    Ok(transitions)
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
