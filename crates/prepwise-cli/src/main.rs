//! prepwise CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "prepwise",
    version,
    about = "Rule-based interview practice evaluation"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and evaluate submissions
    Evaluate {
        /// Submission JSON file or directory of them
        #[arg(long)]
        submission: PathBuf,

        /// Question bank file or directory (defaults to the configured bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Directory to write report files to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Persist sessions and evaluations to the store
        #[arg(long)]
        save: bool,

        /// Max concurrent evaluations
        #[arg(long)]
        parallelism: Option<usize>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Show completed interviews from the store
    History {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Entries per page
        #[arg(long)]
        limit: Option<usize>,

        /// Only interviews scoring at least this many correct answers
        #[arg(long)]
        min_score: Option<u32>,

        /// Only interviews on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Only interviews on or before this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Show the most recent interviews instead of a page
        #[arg(long)]
        recent: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config, question bank, and submission
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "prepwise=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            submission,
            bank,
            format,
            output,
            save,
            parallelism,
        } => {
            commands::evaluate::execute(
                submission,
                bank,
                format,
                output,
                save,
                parallelism,
                cli.config,
            )
            .await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::History {
            page,
            limit,
            min_score,
            since,
            until,
            recent,
            format,
        } => {
            commands::history::execute(
                page, limit, min_score, since, until, recent, format, cli.config,
            )
            .await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
