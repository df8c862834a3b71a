//! Timed session coordinator.
//!
//! Runs the answer collector and the countdown timer side by side. Both
//! report on one completion channel; the first `Done` ends the session, the
//! losing activity is cancelled, and the report is built from the bank's
//! final state.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::collector::collect_answers;
use crate::error::FatalError;
use crate::model::{QuestionBank, QuestionRecord};
use crate::report::SessionReport;
use crate::timer::CountdownTimer;

/// Default session length in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 300;

/// Default capacity of the completion channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Which activity ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finisher {
    /// Every question was answered.
    Collector,
    /// The time limit ran out.
    Timer,
}

impl std::fmt::Display for Finisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finisher::Collector => write!(f, "all questions answered"),
            Finisher::Timer => write!(f, "time expired"),
        }
    }
}

/// A message on the completion channel. Only `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Start,
    InProgress { remaining_secs: u64 },
    Done(Finisher),
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_session_start(&self, total_questions: usize, time_limit_secs: u64);
    fn on_tick(&self, remaining_secs: u64);
    fn on_graded(&self, index: usize, record: &QuestionRecord);
    fn on_session_end(&self, ended_by: Finisher, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_session_start(&self, _: usize, _: u64) {}
    fn on_tick(&self, _: u64) {}
    fn on_graded(&self, _: usize, _: &QuestionRecord) {}
    fn on_session_end(&self, _: Finisher, _: Duration) {}
}

/// Configuration for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Whole seconds before the timer ends the session.
    pub time_limit_secs: u64,
    /// Capacity of the completion channel (at least 1).
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// One timed quiz session.
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Run the session over `bank` and build its report.
    ///
    /// Returns as soon as the first `Done` arrives, whichever activity sent
    /// it. A [`FatalError`] from the collector ends the session without a
    /// report.
    pub async fn run<R, W>(
        &self,
        mut bank: QuestionBank,
        mut input: R,
        mut output: W,
        progress: &dyn ProgressReporter,
    ) -> Result<SessionReport, FatalError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let time_limit_secs = self.config.time_limit_secs;
        let (tx, mut rx) = mpsc::channel(self.config.channel_capacity.max(1));

        let started_at = chrono::Utc::now();
        let start = Instant::now();
        tracing::info!(
            questions = bank.size(),
            time_limit_secs,
            "session started"
        );
        progress.on_session_start(bank.size(), time_limit_secs);

        let timer = tokio::spawn(CountdownTimer::new(time_limit_secs).run(tx.clone()));

        let ended_by = {
            let collect = collect_answers(&mut bank, &mut input, &mut output, tx, progress);
            tokio::pin!(collect);
            let mut collecting = true;

            loop {
                tokio::select! {
                    result = &mut collect, if collecting => {
                        collecting = false;
                        if let Err(e) = result {
                            timer.abort();
                            tracing::error!("session aborted: {e}");
                            return Err(e);
                        }
                    }
                    signal = rx.recv() => match signal {
                        Some(Signal::Done(finisher)) => break finisher,
                        Some(Signal::Start) => tracing::debug!("timer started"),
                        Some(Signal::InProgress { remaining_secs }) => {
                            tracing::trace!(remaining_secs, "tick");
                            progress.on_tick(remaining_secs);
                        }
                        None => {
                            tracing::warn!("completion channel closed without DONE");
                            break Finisher::Timer;
                        }
                    },
                }
            }
            // Leaving this block drops the collector if it is still waiting
            // for input.
        };
        timer.abort();

        let elapsed = start.elapsed();
        tracing::info!(
            ended_by = ?ended_by,
            elapsed_ms = elapsed.as_millis() as u64,
            answered = bank.evaluated_count(),
            "session finished"
        );
        progress.on_session_end(ended_by, elapsed);

        Ok(SessionReport::new(
            &bank,
            ended_by,
            time_limit_secs,
            started_at,
            elapsed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::io::{AsyncWriteExt, BufReader};

    use super::*;
    use crate::model::QuestionPair;

    fn bank(pairs: &[(&str, &str)]) -> QuestionBank {
        let pairs = pairs.iter().map(|(q, a)| QuestionPair::new(*q, *a)).collect();
        QuestionBank::new(pairs, &mut StdRng::seed_from_u64(42)).unwrap()
    }

    fn session(time_limit_secs: u64) -> Session {
        Session::new(SessionConfig {
            time_limit_secs,
            ..Default::default()
        })
    }

    #[derive(Default)]
    struct RecordingReporter {
        ticks: Mutex<Vec<u64>>,
        graded: Mutex<Vec<usize>>,
        ended: Mutex<Option<Finisher>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn on_session_start(&self, _: usize, _: u64) {}
        fn on_tick(&self, remaining_secs: u64) {
            self.ticks.lock().unwrap().push(remaining_secs);
        }
        fn on_graded(&self, index: usize, _: &QuestionRecord) {
            self.graded.lock().unwrap().push(index);
        }
        fn on_session_end(&self, ended_by: Finisher, _: Duration) {
            *self.ended.lock().unwrap() = Some(ended_by);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn collector_wins_without_waiting_for_timer() {
        let bank = bank(&[("5+5", "10"), ("1+1", "2")]);
        let input: &[u8] = b"10\n2\n";
        let start = Instant::now();

        let report = session(600)
            .run(bank, input, Vec::new(), &NoopReporter)
            .await
            .unwrap();

        assert_eq!(report.ended_by, Finisher::Collector);
        assert_eq!(report.entries.len(), 2);
        assert!(report.entries.iter().all(|e| e.evaluated));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_wins_when_no_answer_arrives() {
        let bank = bank(&[("Capital of France?", "Paris")]);
        // Keep the writer alive so the collector blocks instead of seeing EOF.
        let (_writer, reader) = tokio::io::duplex(64);
        let reporter = RecordingReporter::default();

        let report = session(1)
            .run(bank, BufReader::new(reader), Vec::new(), &reporter)
            .await
            .unwrap();

        assert_eq!(report.ended_by, Finisher::Timer);
        assert_eq!(report.entries.len(), 1);
        assert!(!report.entries[0].evaluated);
        assert!(!report.entries[0].answered_correctly);
        assert_eq!(report.score, 0.0);
        assert_eq!(*reporter.ticks.lock().unwrap(), vec![1]);
        assert_eq!(*reporter.ended.lock().unwrap(), Some(Finisher::Timer));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_wins_mid_session_keeps_earlier_answers() {
        let bank = bank(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let first_answer = bank.record_at(0).correct_answer().to_string();
        let (mut writer, reader) = tokio::io::duplex(64);
        writer
            .write_all(format!("{first_answer}\n").as_bytes())
            .await
            .unwrap();
        let reporter = RecordingReporter::default();

        let report = session(5)
            .run(bank, BufReader::new(reader), Vec::new(), &reporter)
            .await
            .unwrap();

        assert_eq!(report.ended_by, Finisher::Timer);
        assert!(report.entries[0].evaluated);
        assert!(report.entries[0].answered_correctly);
        assert!(!report.entries[1].evaluated);
        assert!(!report.entries[2].evaluated);
        assert_eq!(report.correct, 1);
        assert_eq!(report.score, 100.0 / 3.0);
        assert_eq!(*reporter.graded.lock().unwrap(), vec![0]);
        assert_eq!(*reporter.ticks.lock().unwrap(), vec![5, 4, 3, 2, 1]);
        drop(writer);
    }

    #[tokio::test(start_paused = true)]
    async fn input_closed_mid_session_is_fatal() {
        let bank = bank(&[("a", "1"), ("b", "2")]);
        let input: &[u8] = b"1\n";

        let err = session(600)
            .run(bank, input, Vec::new(), &NoopReporter)
            .await
            .unwrap_err();
        assert!(matches!(err, FatalError::InputStream { question: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn prompts_follow_bank_order() {
        let bank = bank(&[("first?", "1"), ("second?", "2"), ("third?", "3")]);
        let expected: String = (0..bank.size())
            .map(|i| crate::collector::prompt(i, bank.record_at(i).question_text()))
            .collect();
        let (output, mut sink) = tokio::io::duplex(1024);

        let report = session(60)
            .run(bank, &b"x\ny\nz\n"[..], output, &NoopReporter)
            .await
            .unwrap();

        let mut written = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut sink, &mut written)
            .await
            .unwrap();
        assert_eq!(written, expected);
        assert_eq!(report.ended_by, Finisher::Collector);
    }
}
