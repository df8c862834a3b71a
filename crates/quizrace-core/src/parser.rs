//! CSV question source.
//!
//! Loads (question, answer) pairs from a delimited file and validates them.

use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::BankError;
use crate::model::QuestionPair;

/// How to read a question source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// Skip the first row.
    pub has_headers: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            has_headers: false,
            delimiter: b',',
        }
    }
}

/// Read all question pairs from the CSV file at `path`.
pub fn load_question_pairs(
    path: &Path,
    options: &SourceOptions,
) -> Result<Vec<QuestionPair>, BankError> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|e| {
        BankError::data_source(&source_name, None, format!("failed to open question source: {e}"))
    })?;

    parse_question_pairs(file, &source_name, options)
}

/// Parse question pairs from any reader (useful for testing).
///
/// Both fields are trimmed. Columns past the second are ignored and blank
/// lines are skipped.
pub fn parse_question_pairs<R: io::Read>(
    reader: R,
    source_name: &str,
    options: &SourceOptions,
) -> Result<Vec<QuestionPair>, BankError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut pairs = Vec::new();

    for row in csv_reader.records() {
        let record = row.map_err(|e| {
            let line = e.position().map(|p| p.line());
            BankError::data_source(source_name, line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line());

        if record.iter().all(str::is_empty) {
            continue;
        }

        if record.len() < 2 {
            return Err(BankError::data_source(
                source_name,
                line,
                format!("expected 2 fields, found {}", record.len()),
            ));
        }

        if record[0].is_empty() {
            return Err(BankError::data_source(
                source_name,
                line,
                "question text is empty",
            ));
        }

        if record.len() > 2 {
            tracing::debug!(
                source = source_name,
                line,
                ignored = record.len() - 2,
                "ignoring extra columns"
            );
        }

        pairs.push(QuestionPair::new(&record[0], &record[1]));
    }

    tracing::debug!(source = source_name, count = pairs.len(), "question pairs parsed");
    Ok(pairs)
}

/// A warning from question source validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question text (if applicable).
    pub question: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check parsed pairs for issues that do not stop a session but are
/// probably mistakes.
pub fn validate_pairs(pairs: &[QuestionPair]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for pair in pairs {
        if !seen.insert(pair.question.as_str()) {
            warnings.push(ValidationWarning {
                question: Some(pair.question.clone()),
                message: format!("duplicate question: {}", pair.question),
            });
        }
    }

    // Only an empty submission can match an empty answer.
    for pair in pairs {
        if pair.answer.is_empty() {
            warnings.push(ValidationWarning {
                question: Some(pair.question.clone()),
                message: "correct answer is empty".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEMS: &str = "5+5,10\n7+3,10\n1+1,2\n\"what 2+2, sir?\", 4 \n";

    fn parse(content: &str) -> Result<Vec<QuestionPair>, BankError> {
        parse_question_pairs(content.as_bytes(), "test.csv", &SourceOptions::default())
    }

    #[test]
    fn parse_plain_rows() {
        let pairs = parse("5+5,10\n1+1,2\n").unwrap();
        assert_eq!(
            pairs,
            vec![QuestionPair::new("5+5", "10"), QuestionPair::new("1+1", "2")]
        );
    }

    #[test]
    fn parse_quoted_field_with_comma() {
        let pairs = parse(PROBLEMS).unwrap();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[3], QuestionPair::new("what 2+2, sir?", "4"));
    }

    #[test]
    fn parse_skips_header() {
        let options = SourceOptions {
            has_headers: true,
            ..Default::default()
        };
        let pairs =
            parse_question_pairs("question,answer\n3+4,7\n".as_bytes(), "test.csv", &options)
                .unwrap();
        assert_eq!(pairs, vec![QuestionPair::new("3+4", "7")]);
    }

    #[test]
    fn parse_custom_delimiter() {
        let options = SourceOptions {
            delimiter: b';',
            ..Default::default()
        };
        let pairs = parse_question_pairs("a, b;c\n".as_bytes(), "test.csv", &options).unwrap();
        assert_eq!(pairs, vec![QuestionPair::new("a, b", "c")]);
    }

    #[test]
    fn parse_ignores_extra_columns_and_blank_lines() {
        let pairs = parse("1+1,2,easy\n\n2+2,4\n").unwrap();
        assert_eq!(
            pairs,
            vec![QuestionPair::new("1+1", "2"), QuestionPair::new("2+2", "4")]
        );
    }

    #[test]
    fn parse_rejects_single_column() {
        let err = parse("1+1,2\nno answer here\n").unwrap_err();
        match err {
            BankError::DataSource { line, message, .. } => {
                assert_eq!(line, Some(2));
                assert!(message.contains("expected 2 fields"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_empty_question() {
        let err = parse(" ,2\n").unwrap_err();
        assert!(err.to_string().contains("question text is empty"));
    }

    #[test]
    fn parse_empty_source_yields_no_pairs() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn load_missing_file() {
        let err = load_question_pairs(Path::new("no-such-problems.csv"), &SourceOptions::default())
            .unwrap_err();
        assert!(matches!(err, BankError::DataSource { line: None, .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.csv");
        std::fs::write(&path, PROBLEMS).unwrap();

        let pairs = load_question_pairs(&path, &SourceOptions::default()).unwrap();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], QuestionPair::new("5+5", "10"));
    }

    #[test]
    fn validate_duplicates_and_empty_answers() {
        let pairs = vec![
            QuestionPair::new("1+1", "2"),
            QuestionPair::new("1+1", "2"),
            QuestionPair::new("blank", ""),
        ];
        let warnings = validate_pairs(&pairs);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("answer is empty")));
    }

    #[test]
    fn validate_clean_pairs() {
        let pairs = parse(PROBLEMS).unwrap();
        assert!(validate_pairs(&pairs).is_empty());
    }
}
