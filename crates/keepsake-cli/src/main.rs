//! Keepsake CLI - command-line client for the Keepsake memory journal.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Keepsake CLI - sign up, sign in, and save memory capsules.
#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Keepsake CLI for accounts and memory capsules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (email code verification included)
    Signup,

    /// Sign in with email and password
    Signin,

    /// Manage memory capsules
    Capsule {
        #[command(subcommand)]
        command: CapsuleCommands,
    },
}

#[derive(Subcommand)]
enum CapsuleCommands {
    /// Save a new memory capsule
    Create {
        /// Capsule title
        #[arg(long)]
        title: String,

        /// What happened
        #[arg(long)]
        description: String,

        /// Where it happened
        #[arg(long)]
        location: Option<String>,

        /// Capture date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Session token for backend auth
        #[arg(long, env = "KEEPSAKE_SESSION_TOKEN", hide_env_values = true)]
        token: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = Config::new();
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Signup => commands::signup(&config).await,
        Commands::Signin => commands::signin(&config).await,
        Commands::Capsule { command } => match command {
            CapsuleCommands::Create {
                title,
                description,
                location,
                date,
                tags,
                notes,
                token,
            } => {
                commands::capsule_create(
                    &config,
                    &token,
                    title,
                    description,
                    location,
                    date,
                    tags,
                    notes,
                )
                .await
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
