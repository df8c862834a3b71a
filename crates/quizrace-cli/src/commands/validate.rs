//! The `quizrace validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrace_core::parser::{self, SourceOptions};

pub fn execute(problems: PathBuf, has_headers: bool, delimiter: char) -> Result<()> {
    anyhow::ensure!(
        delimiter.is_ascii(),
        "delimiter must be a single ASCII character, got {delimiter:?}"
    );
    let options = SourceOptions {
        has_headers,
        delimiter: delimiter as u8,
    };

    let pairs = parser::load_question_pairs(&problems, &options)?;
    anyhow::ensure!(
        !pairs.is_empty(),
        "{}: question source contains no questions",
        problems.display()
    );

    println!("Question file: {} ({} questions)", problems.display(), pairs.len());

    let warnings = parser::validate_pairs(&pairs);
    for w in &warnings {
        let prefix = w
            .question
            .as_ref()
            .map(|q| format!("  [{q}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question file valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
