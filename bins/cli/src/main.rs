//! Rounds CLI
//!
//! Settles rounds from JSON files or from the live service.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rounds_client::dto::LoginRequest;
use rounds_client::{ApiClient, RoundsApi, SessionManager};
use rounds_core::ledger::{LedgerService, RoundSummary, Settlement, compute_aggregate_rounds_view};
use rounds_core::round::{Round, RoundError};
use rounds_core::stats::{LeaderboardEntry, LeaderboardMetric, LeaderboardSort, SortOrder, StatsService};
use rounds_shared::{AppConfig, AppError};
use rounds_shared::types::{PageRequest, RoundId, UserId};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scorekeeping for game rounds")]
struct Cli {
    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Settle a round stored as JSON.
    Settle {
        /// Round file.
        file: PathBuf,
        /// Show the round from this user's point of view.
        #[arg(long)]
        viewer: Option<String>,
    },
    /// Fetch a round from the service and settle it.
    Show {
        /// Round id.
        round_id: String,
    },
    /// List the signed-in user's rounds.
    Mine {
        /// Page to fetch (0-based).
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Rounds per page.
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Rank everyone in the signed-in user's rounds.
    Leaderboard {
        /// Ranking key.
        #[arg(long, value_enum, default_value_t = RankBy::Score)]
        by: RankBy,
        /// Lowest first.
        #[arg(long)]
        asc: bool,
        /// Rounds to include, newest first.
        #[arg(long, default_value_t = 50)]
        size: u32,
    },
    /// Log in with a one-time code.
    Login {
        /// Login code.
        #[arg(long, env = "ROUNDS_LOGIN_CODE")]
        code: String,
        /// Display name for first login.
        #[arg(long)]
        nickname: Option<String>,
    },
    /// Forget the stored session.
    Logout,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RankBy {
    Score,
    WinRate,
}

impl From<RankBy> for LeaderboardMetric {
    fn from(by: RankBy) -> Self {
        match by {
            RankBy::Score => Self::Score,
            RankBy::WinRate => Self::WinRate,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

/// Prints a failure with the stable code of the first typed error in the chain.
fn report(err: &anyhow::Error) {
    let code = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<AppError>()
            .map(AppError::error_code)
            .or_else(|| cause.downcast_ref::<RoundError>().map(RoundError::error_code))
    });
    match code {
        Some(code) => eprintln!("error [{code}]: {err:#}"),
        None => eprintln!("error: {err:#}"),
    }
    if err
        .chain()
        .any(|cause| cause.downcast_ref::<AppError>().is_some_and(AppError::requires_login))
    {
        eprintln!("hint: run `rounds login` to sign in again");
    }
}

async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match cli.command {
        Command::Settle { file, viewer } => settle_file(&file, viewer.map(UserId::new), cli.json),
        Command::Show { round_id } => {
            let api = connect(&config).await?;
            let round = api.load_round(&RoundId::new(round_id)).await?;
            let viewer = api.client().session().current_user().await.map(|u| u.user_id);
            print_settlement(&round, &LedgerService::settle(&round), viewer.as_ref(), cli.json)
        }
        Command::Mine { page, size } => {
            let api = connect(&config).await?;
            let user = signed_in_user(&api).await?;
            let listing = api.my_rounds(&PageRequest::new(page, size)).await?;
            let mut rounds = Vec::with_capacity(listing.content.len());
            for info in &listing.content {
                rounds.push(api.load_round(&info.round_id).await?);
            }
            let summaries = compute_aggregate_rounds_view(&rounds, &user);
            print_summaries(&summaries, cli.json)?;
            if !cli.json && !rounds.is_empty() {
                let stats = StatsService::user_statistics(&rounds, &user);
                println!(
                    "games {} (won {}, lost {}, drawn {}), win rate {}%, total {}, per round {}",
                    stats.games_played,
                    stats.games_won,
                    stats.games_lost,
                    stats.games_drawn,
                    stats.win_rate_percent(),
                    stats.total,
                    stats.average_per_round()
                );
            }
            if listing.has_next && !cli.json {
                println!("(more on page {})", page.saturating_add(1));
            }
            Ok(())
        }
        Command::Leaderboard { by, asc, size } => {
            let api = connect(&config).await?;
            signed_in_user(&api).await?;
            let listing = api.my_rounds(&PageRequest::new(0, size)).await?;
            let mut rounds = Vec::with_capacity(listing.content.len());
            for info in &listing.content {
                rounds.push(api.load_round(&info.round_id).await?);
            }
            let sort = LeaderboardSort {
                metric: by.into(),
                order: if asc { SortOrder::Asc } else { SortOrder::Desc },
            };
            print_leaderboard(&StatsService::leaderboard(&rounds, &sort), cli.json)
        }
        Command::Login { code, nickname } => {
            let api = connect(&config).await?;
            let session = api.login(&LoginRequest { code, nickname }).await?;
            println!("Logged in as {}", session.user.user_id);
            Ok(())
        }
        Command::Logout => {
            let session = SessionManager::load(config.session.storage_path.clone()).await;
            session.clear().await?;
            println!("Logged out");
            Ok(())
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<RoundsApi> {
    let session = Arc::new(SessionManager::load(config.session.storage_path.clone()).await);
    let client = ApiClient::new(&config.api, session)?;
    info!(base_url = %config.api.base_url, "Using rounds service");
    Ok(RoundsApi::new(client))
}

async fn signed_in_user(api: &RoundsApi) -> Result<UserId, AppError> {
    api.client()
        .session()
        .current_user()
        .await
        .map(|u| u.user_id)
        .ok_or_else(|| AppError::Unauthorized("not logged in".to_string()))
}

fn settle_file(path: &Path, viewer: Option<UserId>, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let round: Round = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid round", path.display()))?;
    round
        .roster
        .validate()
        .with_context(|| format!("Roster in {} is invalid", path.display()))?;

    let settlement = LedgerService::settle(&round);
    print_settlement(&round, &settlement, viewer.as_ref(), json)
}

fn print_settlement(
    round: &Round,
    settlement: &Settlement,
    viewer: Option<&UserId>,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(settlement)?);
        return Ok(());
    }

    println!("{} ({}) - {} games", round.name, round.status, settlement.record_count);
    for balance in &settlement.balances {
        let name = balance
            .participant
            .display_name
            .as_deref()
            .unwrap_or(balance.participant.id.as_str());
        let marker = if viewer.is_some_and(|v| balance.participant.id == *v) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {name:<16} {:<12} {:>8}",
            balance.participant.role.as_str(),
            balance.running_total.to_string()
        );
    }
    if settlement.turnover > 0 {
        println!("  table board turnover: {}", settlement.turnover);
    }
    for warning in &settlement.warnings {
        println!("  warning [{}]: {warning}", warning.code());
    }
    Ok(())
}

fn print_summaries(summaries: &[RoundSummary], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summaries)?);
        return Ok(());
    }
    if summaries.is_empty() {
        println!("No rounds yet");
        return Ok(());
    }
    for summary in summaries {
        let role = if summary.is_creator { "creator" } else { "player" };
        let has_totals = summary.status.shows_totals() || summary.record_count > 0;
        let total = summary
            .viewer_total
            .filter(|_| has_totals)
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        println!(
            "{:<12} {:<20} {:<12} {:<8} games {:>3}  you {:>8}",
            summary.round_id.as_str(),
            summary.name,
            summary.status.as_str(),
            role,
            summary.record_count,
            total
        );
    }
    Ok(())
}

fn print_leaderboard(entries: &[LeaderboardEntry], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No rounds yet");
        return Ok(());
    }
    for entry in entries {
        let stats = &entry.statistics;
        let name = entry.display_name.as_deref().unwrap_or(stats.user_id.as_str());
        println!(
            "{:>3}. {name:<16} {:>8}  win rate {:>3}%  rounds {:>3}",
            entry.rank,
            stats.total.to_string(),
            stats.win_rate_percent(),
            stats.rounds_played
        );
    }
    Ok(())
}
