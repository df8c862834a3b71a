//! Quiz error types.
//!
//! Two families live here. [`BankError`] covers everything that can go
//! wrong before a session starts; callers may recover from it (pick another
//! file, fix the CSV). [`FatalError`] covers invariant violations and broken
//! I/O in the middle of a session. There is no partial-completion state to
//! resume from, so the binary terminates on it without printing a report.

use std::io;

use thiserror::Error;

/// Errors raised while building a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    /// The question source is missing, unreadable, or malformed.
    #[error("{source_name}{}: {message}", .line.map(|l| format!(":{l}")).unwrap_or_default())]
    DataSource {
        source_name: String,
        line: Option<u64>,
        message: String,
    },

    /// The source parsed cleanly but held no questions.
    #[error("question source contains no questions")]
    EmptyBank,
}

impl BankError {
    pub(crate) fn data_source(
        source_name: impl Into<String>,
        line: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        BankError::DataSource {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }
}

/// Unrecoverable errors raised while a session is running.
///
/// Do not retry or resume after one of these: the question bank may hold
/// a half-collected session.
#[derive(Debug, Error)]
#[must_use]
#[non_exhaustive]
pub enum FatalError {
    /// A question was graded twice.
    #[error("question {question:?} has already been evaluated")]
    DoubleEvaluation { question: String },

    /// The answer stream closed or failed before a full line was read.
    #[error("failed to read answer for question #{question}: {source}")]
    InputStream {
        question: usize,
        #[source]
        source: io::Error,
    },

    /// The prompt sink rejected a write.
    #[error("failed to write prompt: {0}")]
    Output(#[from] io::Error),
}

impl FatalError {
    /// Process exit code used by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        2
    }
}
