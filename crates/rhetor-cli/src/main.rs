use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rhetor")]
#[command(about = "Rhetor - timed debate practice against an AI opponent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available challenges
    List {
        /// Filter by difficulty (easy, medium, hard)
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Run a practice session
    Practice {
        /// Challenge id (see `rhetor list`)
        challenge_id: String,
        /// Use the Gemini API opponent (requires GEMINI_API_KEY)
        #[arg(long)]
        remote: bool,
        /// Preparation countdown in seconds
        #[arg(long, default_value_t = 60)]
        prep_secs: u32,
        /// Rounds in the exchange
        #[arg(long, default_value_t = 4)]
        rounds: u32,
    },
    /// Show cumulative progress
    Progress {
        /// Clear all progress
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { difficulty } => commands::list::run(difficulty.as_deref()).await?,
        Commands::Practice {
            challenge_id,
            remote,
            prep_secs,
            rounds,
        } => commands::practice::run(&challenge_id, remote, prep_secs, rounds).await?,
        Commands::Progress { reset } => commands::progress::run(reset).await?,
    }

    Ok(())
}
