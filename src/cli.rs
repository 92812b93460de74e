use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::model::SessionConfig;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "lap-timer-cli",
    version,
    about = "Keyboard-driven lap timer with a terminal UI"
)]
pub struct Cli {
    /// Session name stamped on exports (defaults to Session_<timestamp> at save time)
    #[arg(long)]
    pub session_name: Option<String>,

    /// Directory for exported session files (defaults to the user documents directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Display refresh interval
    #[arg(long, default_value = "100ms")]
    pub tick_interval: humantime::Duration,

    /// Start the timer immediately on launch instead of waiting for Space
    #[arg(long)]
    pub start_on_launch: bool,
}

pub fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);

    #[cfg(feature = "tui")]
    return crate::tui::run(cfg);

    #[cfg(not(feature = "tui"))]
    {
        let _ = cfg;
        anyhow::bail!("built without the `tui` feature; no interactive frontend available")
    }
}

/// Build a `SessionConfig` from CLI arguments. The local UTC offset is
/// resolved once here, before any other thread exists.
pub fn build_config(args: &Cli) -> SessionConfig {
    SessionConfig {
        session_name: args.session_name.clone(),
        output_dir: args.output_dir.clone(),
        tick_interval: Duration::from(args.tick_interval),
        start_on_launch: args.start_on_launch,
        utc_offset: time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC),
    }
}
