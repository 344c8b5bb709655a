use std::env::var;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Result as EyreResult, WrapErr};
use round_logic::{GameConfig, SeededRng};
use rps_peer::{play_match, Medium};
use tracing::info;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{registry, EnvFilter};

/// Play Rock-Paper-Scissors between two in-process peers
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Rounds to play before the host disconnects
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    rounds: u32,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for codenames and choices; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> EyreResult<()> {
    setup()?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            GameConfig::from_json(&json)
                .wrap_err_with(|| format!("invalid configuration in {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    let mut rng = match args.seed {
        Some(seed) => SeededRng::from_u64(seed),
        None => SeededRng::new(&rand::random()),
    };

    info!(service = %config.service_id, topology = %config.topology, rounds = args.rounds, "starting match");

    let medium = Medium::spawn();
    let report = play_match(&medium, &config, args.rounds, &mut rng).await?;

    for result in &report.rounds {
        info!(round = result.round + 1, "{} ({})", result.status_text(), result.score_text());
    }
    match &report.summary {
        Some(summary) => info!(
            host = %report.host,
            guest = %report.guest,
            rounds = summary.rounds_played,
            "final score {} : {}",
            summary.local_score,
            summary.remote_score,
        ),
        None => info!(host = %report.host, guest = %report.guest, "match ended without a summary"),
    }

    Ok(())
}

fn setup() -> EyreResult<()> {
    let directives = match var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => "rps_peer=info,round_logic=info".to_owned(),
    };

    registry()
        .with(EnvFilter::builder().parse(directives)?)
        .with(layer())
        .init();

    Ok(())
}
