mod error;
mod logging;
mod report;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use timegrid_core::config::load_config;
use timegrid_layout::event::EventItem;
use timegrid_layout::provider::CalendarProvider;
use timegrid_rfc::rfc::datetime::parse;

use crate::error::{AppError, AppResult};
use crate::report::LayoutReport;

/// Lays out a JSON list of calendar events for a date window and prints the result.
#[derive(Parser, Debug, Clone)]
#[command(name = "timegrid", version)]
struct Args {
    /// JSON file holding an array of event definitions
    events_path: PathBuf,
    /// First instant of the window, RFC 3339 or a local date-time in the configured zone
    min_date: String,
    /// Last instant of the window
    max_date: String,
}

fn read_events(path: &Path) -> AppResult<Vec<EventItem>> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadEvents {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(serde_json::from_str(&text)?)
}

fn main() -> anyhow::Result<()> {
    let filter_handle = logging::init();

    let args = Args::parse();

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    logging::apply_level(&filter_handle, &config.logging.level);

    let events = read_events(&args.events_path)?;
    tracing::info!(count = events.len(), path = %args.events_path.display(), "Events loaded");

    let mut provider = CalendarProvider::new(config.layout).map_err(AppError::from)?;
    let zone = provider.time_zone();

    let min_date_unix = parse(args.min_date.as_str(), zone)
        .context("Invalid min date")?
        .timestamp_millis();
    let max_date_unix = parse(args.max_date.as_str(), zone)
        .context("Invalid max date")?
        .timestamp_millis();

    provider
        .notify_data_changed(&events, min_date_unix, max_date_unix)
        .map_err(AppError::from)?;

    let report = LayoutReport::from_provider(&provider);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
