//! quizrace CLI — the user-facing command-line interface.

use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use quizrace_core::FatalError;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizrace", version, about = "Timed quiz runner for CSV question files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a timed quiz on the terminal
    Run {
        /// CSV file with `question,answer` rows
        #[arg(long)]
        problems: Option<PathBuf>,

        /// Time limit in seconds
        #[arg(long)]
        limit: Option<u64>,

        /// Seed for the question shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Treat the first CSV row as a header
        #[arg(long)]
        has_headers: bool,

        /// CSV field delimiter
        #[arg(long)]
        delimiter: Option<char>,

        /// Directory to write a JSON report into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report format on stdout: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question file without starting a quiz
    Validate {
        /// CSV file with `question,answer` rows
        #[arg(long)]
        problems: PathBuf,

        /// Treat the first CSV row as a header
        #[arg(long)]
        has_headers: bool,

        /// CSV field delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,
    },

    /// Create a starter config and question file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quizrace=info,quizrace_core=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            problems,
            limit,
            seed,
            has_headers,
            delimiter,
            output,
            format,
            config,
        } => {
            commands::run::execute(commands::run::RunArgs {
                problems,
                limit,
                seed,
                has_headers,
                delimiter,
                output,
                format,
                config,
            })
            .await
        }
        Commands::Validate {
            problems,
            has_headers,
            delimiter,
        } => commands::validate::execute(problems, has_headers, delimiter),
        Commands::Init => commands::init::execute(),
    };

    let code = match result {
        Ok(()) => 0,
        Err(e) => match e.downcast_ref::<FatalError>() {
            Some(fatal) => {
                eprintln!("Fatal: {fatal}");
                fatal.exit_code()
            }
            None => {
                eprintln!("Error: {e:#}");
                1
            }
        },
    };

    // The stdin reader thread cannot be cancelled; exiting here keeps runtime
    // shutdown from waiting on it after the timer ends a session.
    let _ = std::io::stdout().flush();
    process::exit(code);
}
