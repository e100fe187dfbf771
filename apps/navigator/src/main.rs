use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use mvp_core::{
    Content, HistoryLocation, PlaceManager, PlaceRequest, PresenterRegistry, Transition,
};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod fruits;
mod session;
mod terminal;

use config::load_settings;
use terminal::TerminalSurface;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "navigator.toml")]
    config: PathBuf,
    /// Location the session starts at, e.g. `#banana;ripe=yes`.
    #[arg(long, default_value = "")]
    start: String,
    /// Locations to visit in order. Read from stdin, one per line, when empty.
    locations: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let default_place = settings.default_place_request()?;
    let mut registry = PresenterRegistry::new();
    fruits::register_all(&mut registry);

    let title = settings.not_found_title.clone();
    let location = Arc::new(HistoryLocation::new(&args.start));
    let mut manager = PlaceManager::new_with_dependencies(
        default_place,
        registry,
        TerminalSurface::stdout(),
        location.clone(),
        Box::new(move |place: &PlaceRequest| {
            Content::from_blocks([title.clone(), format!("{} not found", place.token())])
        }),
    );

    let transitions = if args.locations.is_empty() {
        let stdin = BufReader::new(tokio::io::stdin());
        session::drive(&mut manager, &*location, stdin).await?
    } else {
        let script = args.locations.join("\n");
        session::drive(&mut manager, &*location, script.as_bytes()).await?
    };

    let not_found = transitions
        .iter()
        .filter(|t| matches!(t, Transition::NotFound { .. }))
        .count();
    info!(
        transitions = transitions.len(),
        not_found,
        last_place = %manager.current_place_request(),
        "session finished"
    );

    Ok(())
}
