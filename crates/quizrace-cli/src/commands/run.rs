//! The `quizrace run` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::BufReader;

use quizrace_core::config::load_config_from;
use quizrace_core::model::{QuestionBank, QuestionRecord};
use quizrace_core::session::{Finisher, ProgressReporter, Session};
use quizrace_core::SessionReport;

/// Remaining-time marks at which the console prints a warning.
const TIME_WARNINGS: [u64; 3] = [60, 30, 10];

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_session_start(&self, total_questions: usize, time_limit_secs: u64) {
        eprintln!("quizrace — {total_questions} questions, {time_limit_secs}s on the clock\n");
    }

    fn on_tick(&self, remaining_secs: u64) {
        if TIME_WARNINGS.contains(&remaining_secs) {
            eprintln!("  [{remaining_secs}s remaining]");
        }
    }

    fn on_graded(&self, _: usize, _: &QuestionRecord) {}

    fn on_session_end(&self, ended_by: Finisher, elapsed: Duration) {
        if ended_by == Finisher::Timer {
            eprintln!("\nTime's up!");
        }
        eprintln!(
            "\nSession over: {ended_by} ({:.1}s)\n",
            elapsed.as_secs_f64()
        );
    }
}

/// Arguments to `quizrace run`; `None` falls back to the config file.
pub struct RunArgs {
    pub problems: Option<PathBuf>,
    pub limit: Option<u64>,
    pub seed: Option<u64>,
    pub has_headers: bool,
    pub delimiter: Option<char>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    anyhow::ensure!(
        matches!(args.format.as_str(), "text" | "json"),
        "unknown format '{}', expected text or json",
        args.format
    );

    // Load config, then let flags win
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(problems) = args.problems {
        config.problems = problems;
    }
    if let Some(limit) = args.limit {
        config.time_limit_secs = limit;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.has_headers {
        config.has_headers = true;
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(output) = args.output {
        config.output_dir = Some(output);
    }
    config.validate()?;
    tracing::debug!(
        problems = %config.problems.display(),
        time_limit_secs = config.time_limit_secs,
        seed = ?config.seed,
        "configuration resolved"
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let bank = QuestionBank::load(&config.problems, &config.source_options(), &mut rng)
        .with_context(|| format!("cannot start quiz from {}", config.problems.display()))?;

    let session = Session::new(config.session_config());
    let report = session
        .run(
            bank,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            &ConsoleReporter,
        )
        .await?;

    match args.format.as_str() {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        ),
        _ => print!("{}", report.render_text()),
    }

    print_summary(&report);

    if let Some(dir) = &config.output_dir {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("report-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Answered", "Correct", "Score", "Ended by", "Elapsed"]);
    table.add_row(vec![
        Cell::new(format!("{}/{}", report.answered(), report.total)),
        Cell::new(report.correct),
        Cell::new(format!("{:.1}%", report.score)),
        Cell::new(report.ended_by),
        Cell::new(format!("{:.1}s", report.elapsed_ms as f64 / 1000.0)),
    ]);

    eprintln!("\n{table}");
}
