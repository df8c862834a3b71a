//! One-time grading of a question record.

use crate::error::FatalError;
use crate::model::{Grading, QuestionRecord};

/// Grade `record` against `submitted`, trimming surrounding whitespace.
///
/// Comparison is exact and case-sensitive. Returns whether the answer was
/// correct. Grading an already evaluated record leaves it untouched and
/// returns [`FatalError::DoubleEvaluation`].
pub fn evaluate(record: &mut QuestionRecord, submitted: &str) -> Result<bool, FatalError> {
    if record.evaluated() {
        return Err(FatalError::DoubleEvaluation {
            question: record.question_text().to_string(),
        });
    }

    let student_answer = submitted.trim();
    let answered_correctly = student_answer == record.correct_answer();
    record.set_grading(Grading {
        student_answer: student_answer.to_string(),
        answered_correctly,
    });

    Ok(answered_correctly)
}
