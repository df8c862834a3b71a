//! Session report types with text rendering and JSON persistence.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuestionBank;
use crate::session::Finisher;

const BANNER: &str = "----------Exam Report------------";
const SEPARATOR: &str = "------------------------------------------";

/// A complete session report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended.
    pub finished_at: DateTime<Utc>,
    /// Which activity ended the session.
    pub ended_by: Finisher,
    /// The configured time limit.
    pub time_limit_secs: u64,
    /// Wall-clock session length in milliseconds.
    pub elapsed_ms: u64,
    /// One entry per question, in presentation order.
    pub entries: Vec<ReportEntry>,
    /// Number of correctly answered questions.
    pub correct: usize,
    /// Number of questions in the bank.
    pub total: usize,
    /// `100 * correct / total`.
    pub score: f64,
}

/// Final state of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// 1-based position in presentation order.
    pub ordinal: usize,
    pub question_text: String,
    pub correct_answer: String,
    pub student_answer: String,
    pub answered_correctly: bool,
    pub evaluated: bool,
}

impl SessionReport {
    /// Build a report from the bank's final state.
    pub fn new(
        bank: &QuestionBank,
        ended_by: Finisher,
        time_limit_secs: u64,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        let entries = bank
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| ReportEntry {
                ordinal: i + 1,
                question_text: r.question_text().to_string(),
                correct_answer: r.correct_answer().to_string(),
                student_answer: r.student_answer().to_string(),
                answered_correctly: r.answered_correctly(),
                evaluated: r.evaluated(),
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            ended_by,
            time_limit_secs,
            elapsed_ms: elapsed.as_millis() as u64,
            entries,
            correct: bank.correct_count(),
            total: bank.size(),
            score: bank.score(),
        }
    }

    /// Number of questions that received an answer.
    pub fn answered(&self) -> usize {
        self.entries.iter().filter(|e| e.evaluated).count()
    }

    /// Render the plain-text exam report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{BANNER}");
        for e in &self.entries {
            let _ = writeln!(out, "Question # {}", e.ordinal);
            let _ = writeln!(out, "Question Text: {}", e.question_text);
            let _ = writeln!(out, "Correct Answer: {}", e.correct_answer);
            let _ = writeln!(out, "Your Answer: {}", e.student_answer);
            let _ = writeln!(out, "Answered Correctly? {}", yes_no(e.answered_correctly));
            let _ = writeln!(out, "Evaluated? {}", yes_no(e.evaluated));
            let _ = writeln!(out, "{SEPARATOR}");
        }
        let _ = writeln!(out, "Total Score: {} %", self.score);
        out
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}
