use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fitsync::cli::commands;

#[derive(Parser)]
#[command(name = "fitsync")]
#[command(
    author,
    version,
    about = "Mirror fitness activities and sleep into a workspace database",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an alternate configuration file
    #[arg(short, long, global = true, env = "FITSYNC_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync data into the workspace database
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Archive duplicate activity records
    Dedup {
        /// Report duplicates without archiving them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum SyncCommands {
    /// Sync exercise activities
    Activities {
        /// Number of activities to fetch
        #[arg(short, long, default_value = "1000")]
        limit: u32,
        /// Archive duplicates before importing
        #[arg(long)]
        dedup: bool,
        /// Plan only, don't write
        #[arg(long)]
        dry_run: bool,
    },
    /// Sync sleep sessions
    Sleep {
        /// Date (YYYY-MM-DD), defaults to a trailing window
        #[arg(short, long)]
        date: Option<String>,
        /// Number of trailing days to sync when no date is given
        #[arg(long, default_value = "7")]
        days: u32,
        /// Plan only, don't write
        #[arg(long)]
        dry_run: bool,
    },
    /// Sync duplicates, activities and sleep in one run
    All {
        /// Number of activities to fetch
        #[arg(short, long, default_value = "1000")]
        limit: u32,
        /// Number of trailing sleep days to sync
        #[arg(long, default_value = "7")]
        days: u32,
        /// Plan only, don't write
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> fitsync::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync { command } => match command {
            SyncCommands::Activities {
                limit,
                dedup,
                dry_run,
            } => commands::sync_activities(cli.config, limit, dedup, dry_run).await,
            SyncCommands::Sleep {
                date,
                days,
                dry_run,
            } => commands::sync_sleep(cli.config, date, days, dry_run).await,
            SyncCommands::All {
                limit,
                days,
                dry_run,
            } => commands::sync_all(cli.config, limit, days, dry_run).await,
        },
        Commands::Dedup { dry_run } => commands::dedup(cli.config, dry_run).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", fitsync::error::format_user_error(&e));
        std::process::exit(1);
    }

    Ok(())
}
