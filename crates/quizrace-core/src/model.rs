//! Core data model types for quizrace.
//!
//! A session works on a [`QuestionBank`]: the shuffled, fixed-order list of
//! [`QuestionRecord`]s built from the raw [`QuestionPair`]s of a question
//! source. Records are only ever mutated through [`crate::grader`].

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::BankError;
use crate::parser::{self, SourceOptions};

/// A raw (question, correct answer) pair as read from a question source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionPair {
    pub question: String,
    pub answer: String,
}

impl QuestionPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The outcome of grading a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grading {
    /// The submitted answer, trimmed.
    pub student_answer: String,
    /// Whether the trimmed answer equals the correct answer exactly.
    pub answered_correctly: bool,
}

/// One quiz item plus its grading state.
///
/// A record is either ungraded or carries exactly one [`Grading`]; it can
/// move from the first state to the second once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    question_text: String,
    correct_answer: String,
    grading: Option<Grading>,
}

impl QuestionRecord {
    pub fn new(question_text: impl Into<String>, correct_answer: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            correct_answer: correct_answer.into(),
            grading: None,
        }
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// The submitted answer, or an empty string if none was graded.
    pub fn student_answer(&self) -> &str {
        self.grading
            .as_ref()
            .map_or("", |g| g.student_answer.as_str())
    }

    pub fn evaluated(&self) -> bool {
        self.grading.is_some()
    }

    pub fn answered_correctly(&self) -> bool {
        self.grading.as_ref().is_some_and(|g| g.answered_correctly)
    }

    pub fn grading(&self) -> Option<&Grading> {
        self.grading.as_ref()
    }

    pub(crate) fn set_grading(&mut self, grading: Grading) {
        debug_assert!(self.grading.is_none());
        self.grading = Some(grading);
    }
}

impl From<QuestionPair> for QuestionRecord {
    fn from(pair: QuestionPair) -> Self {
        QuestionRecord::new(pair.question, pair.answer)
    }
}

/// The shuffled, fixed-order collection of questions for one session.
///
/// Order is randomized once at construction. Questions are never added or
/// removed afterwards.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    records: Vec<QuestionRecord>,
}

impl QuestionBank {
    /// Build a bank from `pairs` and shuffle it with `rng`.
    ///
    /// Fails with [`BankError::EmptyBank`] when `pairs` is empty.
    pub fn new<R>(pairs: Vec<QuestionPair>, rng: &mut R) -> Result<Self, BankError>
    where
        R: Rng + ?Sized,
    {
        if pairs.is_empty() {
            return Err(BankError::EmptyBank);
        }

        let mut records: Vec<QuestionRecord> =
            pairs.into_iter().map(QuestionRecord::from).collect();
        records.shuffle(rng);

        tracing::debug!(questions = records.len(), "question bank constructed");
        Ok(Self { records })
    }

    /// Read a CSV question source and build a shuffled bank from it.
    pub fn load<R>(path: &Path, options: &SourceOptions, rng: &mut R) -> Result<Self, BankError>
    where
        R: Rng + ?Sized,
    {
        let pairs = parser::load_question_pairs(path, options)?;
        Self::new(pairs, rng)
    }

    /// Question `index` (0-based). Panics when out of range.
    pub fn record_at(&self, index: usize) -> &QuestionRecord {
        &self.records[index]
    }

    /// Mutable access to question `index` (0-based). Panics when out of range.
    pub fn record_at_mut(&mut self, index: usize) -> &mut QuestionRecord {
        &mut self.records[index]
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn correct_count(&self) -> usize {
        self.records.iter().filter(|r| r.answered_correctly()).count()
    }

    pub fn evaluated_count(&self) -> usize {
        self.records.iter().filter(|r| r.evaluated()).count()
    }

    /// Percentage of correctly answered questions, `100 * correct / total`.
    ///
    /// A bank is never empty, so this is always finite.
    pub fn score(&self) -> f64 {
        100.0 * self.correct_count() as f64 / self.size() as f64
    }
}
