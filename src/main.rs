use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubepilot_checkpoint_store::{CheckpointStore, JsonFileStore};
use tubepilot_cli::{AgentSession, ConsoleNotifier, SessionOutcome, SimBrowser};
use tubepilot_agent_core::{GeminiPlanner, Planner, RuleBasedPlanner};
use tubepilot_plan_executor::{ExecutorConfig, PlanExecutor, ResumptionLoader};
use tubepilot_platform_api::{ApiAdapters, DataApiClient, StaticTokenProvider};

#[derive(Parser)]
#[command(name = "tubepilot", version, about = "Conversational video platform agent")]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Shortcut for --log-level debug
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interpret a natural-language command and execute the resulting plan
    Run {
        /// The command, e.g. "play despacito and like it"
        command: String,

        #[command(flatten)]
        connection: ConnectionArgs,

        /// Keep resuming across simulated navigations until the plan ends
        #[arg(long)]
        follow: bool,
    },
    /// Replay a pending checkpoint left by a previous run
    Resume {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// Show whether a checkpoint is pending
    Status {
        /// Path of the checkpoint state file
        #[arg(long)]
        state_file: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ConnectionArgs {
    /// OAuth bearer token for the platform's Data API
    #[arg(long, env = "TUBEPILOT_ACCESS_TOKEN")]
    access_token: String,

    /// API key for the model-backed planner; omit to use the rule-based one
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_key: Option<String>,

    /// Path of the checkpoint state file
    #[arg(long)]
    state_file: Option<PathBuf>,
}

fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { level };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    Ok(())
}

fn state_file_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let base = dirs::data_dir().context("no data directory on this platform")?;
    Ok(base.join("tubepilot").join("state.json"))
}

fn open_checkpoints(state_file: Option<PathBuf>) -> Result<CheckpointStore> {
    let path = state_file_path(state_file)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let store = JsonFileStore::open(&path)
        .with_context(|| format!("opening state file {}", path.display()))?;
    info!(path = %path.display(), "checkpoint state file");
    Ok(CheckpointStore::new(Arc::new(store)))
}

fn build_session(connection: ConnectionArgs) -> Result<AgentSession> {
    let checkpoints = open_checkpoints(connection.state_file)?;

    let browser = Arc::new(SimBrowser::default());
    let notifier = Arc::new(ConsoleNotifier);

    let tokens = Arc::new(StaticTokenProvider::new(connection.access_token));
    let api = Arc::new(DataApiClient::new(tokens));
    let adapters = Arc::new(ApiAdapters::new(api, browser.clone(), browser.clone()));

    let planner: Arc<dyn Planner> = match connection.gemini_key {
        Some(key) if !key.is_empty() => Arc::new(GeminiPlanner::new(key)),
        _ => Arc::new(RuleBasedPlanner::new()),
    };

    let config = ExecutorConfig::default();
    let executor = Arc::new(PlanExecutor::new(
        adapters,
        checkpoints.clone(),
        browser,
        notifier.clone(),
        config.clone(),
    ));
    let loader = ResumptionLoader::new(
        executor.clone(),
        checkpoints,
        notifier.clone(),
        config,
    );

    Ok(AgentSession::new(planner, executor, loader, notifier))
}

async fn run_command(session: &AgentSession, command: &str, follow: bool) -> Result<()> {
    // A leftover checkpoint from an interrupted run goes first, like a page
    // activation would.
    if session.activate().await.is_some() {
        info!("replayed a leftover checkpoint before the new command");
    }

    let outcome = session.handle_command(command).await?;
    let SessionOutcome::Executed(mut summary) = outcome else {
        return Ok(());
    };

    while follow && summary.navigation_pending {
        // The simulated navigation completed instantly; re-activate as the
        // next page would.
        match session.activate().await {
            Some(next) => summary = next,
            None => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.debug)?;

    match cli.command {
        Command::Run {
            command,
            connection,
            follow,
        } => {
            let session = build_session(connection)?;
            run_command(&session, &command, follow).await?;
        }
        Command::Resume { connection } => {
            let session = build_session(connection)?;
            match session.activate().await {
                Some(summary) => info!(message = %summary.message, "resumed"),
                None => println!("Nothing to resume."),
            }
        }
        Command::Status { state_file } => {
            let checkpoints = open_checkpoints(state_file)?;
            match checkpoints.load().await? {
                Some(checkpoint) => println!(
                    "Checkpoint pending: step {} of {}.",
                    checkpoint.next_index + 1,
                    checkpoint.steps.len()
                ),
                None => println!("No checkpoint pending."),
            }
        }
    }
    Ok(())
}
