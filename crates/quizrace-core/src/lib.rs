//! quizrace-core — Question bank, grading, and the timed session engine.
//!
//! This crate defines the quiz data model, the CSV question source, and the
//! race between answer collection and the countdown timer that the
//! `quizrace` binary drives.

pub mod collector;
pub mod config;
pub mod error;
pub mod grader;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod timer;

pub use error::{BankError, FatalError};
pub use model::{QuestionBank, QuestionPair, QuestionRecord};
pub use report::SessionReport;
pub use session::{Finisher, NoopReporter, ProgressReporter, Session, SessionConfig};
