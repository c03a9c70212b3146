//! Rover Dashboard console - Main entry point
//!
//! Runs the dashboard headless against a live backend. Operator actions are
//! read from stdin, one per line; telemetry is written to the log.
//!
//! Stdin is read on a plain thread that is never joined, so an interrupt
//! ends the process even while a read is pending.

mod console;
mod log_surface;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rover_core::TelemetrySnapshot;
use rover_dashboard::{
    elements, load_config, Dashboard, HttpClient, JsonFileStorage, MemoryStorage, Storage, UiEvent,
    SNAPSHOT_PATH,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use console::ConsoleCommand;
use log_surface::LogSurface;

#[derive(Parser, Debug)]
#[command(name = "rover-dash")]
#[command(about = "Headless operator console for the rover dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "rover.toml")]
    config: PathBuf,

    /// Backend base URL, overrides the configuration file
    #[arg(short, long)]
    backend: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Fetch a single snapshot, print it and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Rover dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = load_config(&args.config)?;

    // Override backend URL if specified
    if let Some(backend) = args.backend {
        config.backend.url = backend;
    }

    let client = HttpClient::new(&config.backend.url, config.backend.timeout())?;

    info!(
        backend = %client.base_url(),
        delta_ms = config.poll.delta_interval_ms,
        snapshot_ms = config.poll.snapshot_interval_ms,
        "Configuration loaded"
    );

    if args.once {
        // Single snapshot mode
        let body = client
            .fetch(SNAPSHOT_PATH)
            .await
            .ok_or_else(|| anyhow!("No snapshot from {}", client.url(SNAPSHOT_PATH)))?;
        let snapshot: TelemetrySnapshot =
            serde_json::from_value(body).context("Backend sent a malformed snapshot")?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    // Open persisted UI state
    let storage: Box<dyn Storage> = match JsonFileStorage::open(&config.storage.path) {
        Ok(storage) => {
            info!(path = %storage.path().display(), "UI state file opened");
            Box::new(storage)
        }
        Err(e) => {
            warn!(
                path = %config.storage.path,
                error = %e,
                "Cannot open UI state file, navigation will not persist"
            );
            Box::new(MemoryStorage::new())
        }
    };

    let mut dashboard = Dashboard::new(&config, LogSurface::new(), Arc::new(client), storage);

    // Console input
    let (tx, rx) = mpsc::channel(32);
    std::thread::Builder::new()
        .name("console".to_string())
        .spawn(move || forward_lines(std::io::stdin().lock(), &tx))
        .context("Failed to start console reader")?;

    tokio::select! {
        _ = dashboard.run(rx) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
        }
    }

    let status = dashboard.status();
    info!(
        mode = ?status.mode,
        route = %status.route,
        recording = status.recording,
        agents = status.agents,
        last_snapshot = ?status.last_snapshot_at,
        "Session ended"
    );
    info!(
        velocity = %dashboard.surface().memory().text(elements::SPEEDOMETER),
        "Last readout"
    );

    Ok(())
}

/// Forward console lines as dashboard events until EOF, `quit`, or the
/// dashboard going away. Blocks the calling thread.
fn forward_lines(reader: impl BufRead, events: &mpsc::Sender<UiEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                break;
            }
        };

        match console::parse_line(&line) {
            Ok(Some(ConsoleCommand::Event(event))) => {
                if events.blocking_send(event).is_err() {
                    break;
                }
            }
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(None) => {}
            Err(e) => warn!(input = %line.trim(), error = %e, "Ignoring console input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_core::Mode;
    use rover_dashboard::Action;
    use std::io::Cursor;

    #[test]
    fn test_forward_lines_stops_at_quit() {
        let (tx, mut rx) = mpsc::channel(8);
        let input = Cursor::new("mode drive/manual\nbogus line here\n\nkey w\nquit\nkey s\n");

        forward_lines(input, &tx);

        assert_eq!(
            rx.try_recv().unwrap(),
            UiEvent::Action(Action::SelectMode(Mode::Manual))
        );
        assert_eq!(rx.try_recv().unwrap(), UiEvent::KeyDown("w".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forward_lines_stops_when_dashboard_is_gone() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        // Returns instead of reading further
        forward_lines(Cursor::new("key w\nkey s\n"), &tx);
    }
}
