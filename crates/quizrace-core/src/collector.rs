//! Answer collector activity.
//!
//! Presents each question of the bank in order, blocks for one line of input
//! per question, and grades it.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::error::FatalError;
use crate::grader;
use crate::model::QuestionBank;
use crate::session::{Finisher, ProgressReporter, Signal};

/// Prompt written before waiting for the answer to question `index`.
pub fn prompt(index: usize, question_text: &str) -> String {
    format!(
        "Question # {}\nQuestion Text: {}\nYour Answer:\n",
        index + 1,
        question_text
    )
}

/// Collect and grade one answer per question, then send `Done`.
///
/// End of input before a complete line, including its terminator, is a
/// [`FatalError::InputStream`]: a half-read answer cannot be scored.
pub async fn collect_answers<R, W>(
    bank: &mut QuestionBank,
    input: &mut R,
    output: &mut W,
    signals: mpsc::Sender<Signal>,
    progress: &dyn ProgressReporter,
) -> Result<(), FatalError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for index in 0..bank.size() {
        let text = prompt(index, bank.record_at(index).question_text());
        output.write_all(text.as_bytes()).await?;
        output.flush().await?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .await
            .map_err(|source| FatalError::InputStream {
                question: index + 1,
                source,
            })?;
        if read == 0 || !line.ends_with('\n') {
            return Err(FatalError::InputStream {
                question: index + 1,
                source: io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before a full line was read",
                ),
            });
        }

        let record = bank.record_at_mut(index);
        let correct = grader::evaluate(record, &line)?;
        tracing::debug!(question = index + 1, correct, "answer graded");
        progress.on_graded(index, record);
    }

    let _ = signals.send(Signal::Done(Finisher::Collector)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionPair;
    use crate::session::NoopReporter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn single_question_bank() -> QuestionBank {
        let mut rng = StdRng::seed_from_u64(0);
        QuestionBank::new(vec![QuestionPair::new("Capital of France?", "Paris")], &mut rng)
            .unwrap()
    }

    #[tokio::test]
    async fn grades_and_signals_done() {
        let mut bank = single_question_bank();
        let mut input: &[u8] = b" Paris \n";
        let mut output = Vec::new();
        let (tx, mut rx) = mpsc::channel(1);

        collect_answers(&mut bank, &mut input, &mut output, tx, &NoopReporter)
            .await
            .unwrap();

        assert_eq!(rx.recv().await, Some(Signal::Done(Finisher::Collector)));
        assert!(bank.record_at(0).answered_correctly());
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Question # 1\nQuestion Text: Capital of France?\nYour Answer:\n"
        );
    }

    #[tokio::test]
    async fn partial_line_is_fatal() {
        let mut bank = single_question_bank();
        let mut input: &[u8] = b"Paris";
        let mut output = Vec::new();
        let (tx, mut rx) = mpsc::channel(1);

        let err = collect_answers(&mut bank, &mut input, &mut output, tx, &NoopReporter)
            .await
            .unwrap_err();

        assert!(matches!(err, FatalError::InputStream { question: 1, .. }));
        assert!(!bank.record_at(0).evaluated());
        assert_eq!(rx.recv().await, None, "no DONE after a fatal read");
    }

    #[tokio::test]
    async fn closed_input_is_fatal() {
        let mut bank = single_question_bank();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();
        let (tx, _rx) = mpsc::channel(1);

        let err = collect_answers(&mut bank, &mut input, &mut output, tx, &NoopReporter)
            .await
            .unwrap_err();
        assert!(matches!(err, FatalError::InputStream { .. }));
    }

    #[test]
    fn prompt_is_one_based() {
        assert_eq!(
            prompt(0, "5+5"),
            "Question # 1\nQuestion Text: 5+5\nYour Answer:\n"
        );
    }
}
