//! sortinghat: announces wedding guests as they badge in
//!
//! Reads tags from a USB RFID badge reader that types like a keyboard,
//! looks each tag up in the guest registry and prints the path of the
//! guest's audio file on stdout, one per line, for a player to pick up.
//!
//! Components:
//! - Device discovery via evdev (first device named like "rfid")
//! - Tag reader thread holding the device grabbed exclusively
//! - Sorting controller resolving tags against the registry
//!
//! Diagnostics go to stderr; stdout carries audio paths only.

mod cli;
mod config;
mod device;
mod events;
mod lifecycle;
mod reader;
mod registry;
mod sorter;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::Config;
use crate::device::EvdevSource;
use crate::events::ReaderEvent;
use crate::lifecycle::ShutdownSignal;
use crate::reader::TagListener;
use crate::registry::GuestRegistry;
use crate::sorter::{ControllerError, SortingController};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "sortinghat starting");

    // Load configuration
    let config = Config::from_cli(cli)?;
    let registry = GuestRegistry::load(&config.tags_file)
        .with_context(|| format!("failed to load guests from {}", config.tags_file.display()))?;
    info!(guests = registry.len(), ?config.audio_dir, "configuration loaded");
    if registry.is_empty() {
        warn!(path = %config.tags_file.display(), "tags file lists no guests");
    }

    // Locate the reader
    let source = match &config.device {
        Some(path) => EvdevSource::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?,
        None => match device::find() {
            Some(source) => source,
            None => bail!("no input device with \"rfid\" in its name"),
        },
    };
    info!(path = %source.path().display(), name = source.name(), "using reader");

    // Tag reader -> sorting controller
    let (reader_tx, reader_rx) = mpsc::channel::<ReaderEvent>(32);

    let listener = TagListener::new(reader_tx);
    listener.start(source).context("failed to grab reader")?;
    info!("tag listener started");

    let mut controller = SortingController::new(registry, config.audio_dir, std::io::stdout());
    let mut shutdown = ShutdownSignal::new().context("failed to register signal handlers")?;

    let result = tokio::select! {
        result = controller.run(reader_rx) => result,
        _ = shutdown.wait() => {
            info!("shutdown signal received");
            Ok(())
        }
    };

    // Cleanup
    info!("shutting down...");
    listener.stop();

    // Reported once, by anyhow on exit.
    exit_status(result)?;

    info!("sortinghat stopped");
    Ok(())
}

/// Turn the controller's result into the process result
fn exit_status(result: Result<(), ControllerError>) -> Result<()> {
    result.context("sorting stopped")
}
