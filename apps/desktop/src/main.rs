mod config;
mod render;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{ladder_view, match_history_view, player_stats_view, ApiClient};
use list_view::Phase;
use shared::domain::{MatchId, Record};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ladder-view", about = "Browse the ranked ladder backend")]
struct Cli {
    /// TOML settings file; defaults to ./ladder.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ladder {
        #[arg(long)]
        ascending: bool,
        #[arg(long)]
        tier: Option<String>,
    },
    Stats {
        #[arg(long)]
        ascending: bool,
    },
    Matches {
        puuid: Option<String>,
        #[arg(long = "expand", value_name = "MATCH_ID")]
        expand: Vec<String>,
        #[arg(long)]
        expand_all: bool,
    },
    Ping {
        #[arg(long)]
        test_num: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    init_tracing(&settings.log_filter);

    let api = Arc::new(ApiClient::with_timeout(
        &settings.api_base_url,
        settings.request_timeout(),
    )?);
    info!(api = %api.base_url(), "ladder-view starting");

    let (output, phase) = run(cli.command, api, &settings.asset_base_url).await?;
    println!("{output}");
    Ok(exit_code_for(phase))
}

/// Runs one command against the backend and returns the rendered text with
/// the phase the view settled in.
async fn run(
    command: Command,
    api: Arc<ApiClient>,
    asset_base_url: &str,
) -> Result<(String, Phase)> {
    let rendered = match command {
        Command::Ladder { ascending, tier } => {
            let view = ladder_view(api, tier.as_deref());
            let snapshot = view.initialize(None).await?;
            if ascending && snapshot.phase == Phase::Ready {
                view.toggle_sort().await?;
            }
            let snapshot = view.snapshot().await;
            view.retire().await;
            (
                render::render_ladder(&snapshot, asset_base_url),
                snapshot.phase,
            )
        }
        Command::Stats { ascending } => {
            let view = player_stats_view(api);
            let snapshot = view.initialize(None).await?;
            if ascending && snapshot.phase == Phase::Ready {
                view.toggle_sort().await?;
            }
            let snapshot = view.snapshot().await;
            view.retire().await;
            (render::render_player_stats(&snapshot), snapshot.phase)
        }
        Command::Matches {
            puuid,
            expand,
            expand_all,
        } => {
            let view = match_history_view(api);
            let snapshot = view.initialize(puuid.as_deref()).await?;
            if snapshot.phase == Phase::Ready {
                let mut targets: Vec<MatchId> =
                    expand.iter().map(|id| MatchId::from(id.as_str())).collect();
                if expand_all {
                    targets.extend(snapshot.items.iter().map(Record::key));
                }
                for key in targets {
                    if view.snapshot().await.is_expanded(&key) {
                        continue;
                    }
                    if !view.toggle_expand(&key).await? {
                        warn!(match_id = %key, "match is not in this history");
                    }
                }
            }
            let snapshot = view.snapshot().await;
            view.retire().await;
            (render::render_match_history(&snapshot), snapshot.phase)
        }
        Command::Ping { test_num } => match api.test_message(test_num).await {
            Ok(reply) => (reply.message, Phase::Ready),
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "backend probe failed");
                (format!("Error: {}", err.user_message()), Phase::Error)
            }
        },
    };
    Ok(rendered)
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code_for(phase: Phase) -> ExitCode {
    if phase == Phase::Error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
