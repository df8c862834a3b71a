//! Countdown timer activity.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::session::{Finisher, Signal};

/// Counts a whole-second budget down, announcing each second on the
/// completion channel and `Done` once the budget is spent.
#[derive(Debug, Clone)]
pub struct CountdownTimer {
    limit_secs: u64,
    tick: Duration,
}

impl CountdownTimer {
    pub fn new(limit_secs: u64) -> Self {
        Self {
            limit_secs,
            tick: Duration::from_secs(1),
        }
    }

    pub fn limit_secs(&self) -> u64 {
        self.limit_secs
    }

    /// Run to completion.
    ///
    /// The timer knows nothing about the collector. It stops early only if
    /// the receiving side of the channel is gone.
    pub async fn run(self, signals: mpsc::Sender<Signal>) {
        if signals.send(Signal::Start).await.is_err() {
            return;
        }

        // Deadlines are anchored to the start so that send latency does not
        // stretch the session.
        let start = Instant::now();
        for elapsed in 0..self.limit_secs {
            let remaining_secs = self.limit_secs - elapsed;
            if signals
                .send(Signal::InProgress { remaining_secs })
                .await
                .is_err()
            {
                return;
            }
            let elapsed = u32::try_from(elapsed + 1).unwrap_or(u32::MAX);
            tokio::time::sleep_until(start + self.tick * elapsed).await;
        }

        tracing::debug!(limit_secs = self.limit_secs, "time limit reached");
        let _ = signals.send(Signal::Done(Finisher::Timer)).await;
    }
}
