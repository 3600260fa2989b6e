//! drilldown - Follow JSON navigation specs down to a playable stream
//!
//! # Usage
//!
//! ```bash
//! # Browse specs on disk
//! drilldown specs/index.json
//!
//! # Browse a remote service with debug logging in ./tmp/drilldown.log
//! drilldown --space remote --remote-url https://specs.example.com/ -v index.json
//! ```

use anyhow::Result;
use clap::Parser;

use drilldown::cli::{Cli, ExitCode};
use drilldown::config::{Config, SessionConfig};
use drilldown::logging;
use drilldown::navigator::{Navigator, Outcome};
use drilldown::player::LocalPlayer;
use drilldown::ui::TerminalSelector;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    run(cli).await.into()
}

/// Run one navigation session and return its exit code
async fn run(cli: Cli) -> ExitCode {
    let session = match session_config(&cli) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::InvalidArgs;
        }
    };

    if let Err(e) = logging::init(&session) {
        eprintln!(
            "Error: could not open log in {}: {}",
            session.work_dir.display(),
            e
        );
        return ExitCode::Error;
    }
    log::info!("drilldown starting in {} space at {}", session.space, cli.url);

    let player = LocalPlayer::new(session.player_command.clone());
    if !player.is_available().await {
        log::warn!("Player '{}' was not found on PATH", player.command());
    }

    let mut navigator = Navigator::from_config(&session, TerminalSelector::new(), player);

    match navigator.run(&cli.url).await {
        Ok(outcome) => {
            match &outcome {
                Outcome::Played { path } => println!("Played {}", path.display()),
                Outcome::Aborted => eprintln!("Aborted"),
                Outcome::Done => {}
            }
            log::info!("Session ended: {:?}", outcome);
            ExitCode::from(&outcome)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(&e)
        }
    }
}

/// Config file (explicit path or default location) with flags on top
fn session_config(cli: &Cli) -> Result<SessionConfig> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    cli.session_config(&config)
}
