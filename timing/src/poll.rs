use std::future::Future;
use std::time::Duration;

use eyre::Result;
use tokio::time::sleep;
use tracing::trace;

use common::types::{LogicalTime, RecordKind};
use config::Config;

use crate::errors::TimingError;

/// Bounds how long a wait keeps querying the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u64,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u64) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Upper bound on the time spent sleeping between attempts.
    pub fn max_wait(&self) -> Duration {
        let sleeps = u32::try_from(self.max_attempts.saturating_sub(1)).unwrap_or(u32::MAX);
        self.interval.saturating_mul(sleeps)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), 12_000)
    }
}

impl From<&Config> for PollPolicy {
    fn from(config: &Config) -> Self {
        Self::new(config.poll_interval(), config.max_poll_attempts)
    }
}

/// A record found by polling, with the number of queries it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polled<T> {
    pub record: T,
    pub attempts: u64,
}

/// Runs `query` until it yields a record or the policy's attempts are used up.
pub(crate) async fn poll_until<T, F, Fut>(
    policy: &PollPolicy,
    kind: RecordKind,
    threshold: LogicalTime,
    mut query: F,
) -> Result<Polled<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        if let Some(record) = query().await? {
            trace!(target: "rollup_bench::timing", %kind, threshold, attempts, "record found");
            return Ok(Polled { record, attempts });
        }

        if attempts >= policy.max_attempts {
            return Err(TimingError::Timeout {
                kind,
                threshold,
                attempts,
            }
            .into());
        }

        if policy.interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            sleep(policy.interval).await;
        }
    }
}
