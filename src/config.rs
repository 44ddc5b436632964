//! Command-line surface of the `term-desktop` binary and its validated form.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::constants::{DEFAULT_POLL_MS, Metrics};
use crate::dispatch::WindowKind;
use crate::error::DesktopError;

#[derive(Parser, Debug)]
#[command(
    name = "term-desktop",
    version = env!("CARGO_PKG_VERSION"),
    about = "A desktop with floating windows, a taskbar and a launcher, inside your terminal"
)]
pub struct Cli {
    /// Window kinds to open at startup, in order. May be repeated.
    #[arg(long = "open", value_name = "KIND", value_enum)]
    pub open: Vec<WindowKind>,

    /// Event poll interval in milliseconds.
    #[arg(long = "poll-ms", value_name = "MS", default_value_t = DEFAULT_POLL_MS)]
    pub poll_ms: u64,

    /// Write log output to this file instead of the Debug Log window.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Start with mouse capture disabled.
    #[arg(long = "no-mouse")]
    pub no_mouse: bool,
}

#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub metrics: Metrics,
    pub startup_windows: Vec<WindowKind>,
    pub poll_interval: Duration,
    pub log_file: Option<PathBuf>,
    pub mouse_capture: bool,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            metrics: Metrics::cells(),
            startup_windows: vec![WindowKind::About],
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            log_file: None,
            mouse_capture: true,
        }
    }
}

impl TryFrom<&Cli> for DesktopConfig {
    type Error = DesktopError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(1..=1000).contains(&cli.poll_ms) {
            return Err(DesktopError::InvalidConfig(
                "poll-ms must be between 1 and 1000".to_string(),
            ));
        }
        let startup_windows = if cli.open.is_empty() {
            vec![WindowKind::About]
        } else {
            cli.open.clone()
        };
        Ok(Self {
            metrics: Metrics::cells(),
            startup_windows,
            poll_interval: Duration::from_millis(cli.poll_ms),
            log_file: cli.log_file.clone(),
            mouse_capture: !cli.no_mouse,
        })
    }
}
