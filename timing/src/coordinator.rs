use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::Result;
use tracing::{debug, info, warn};

use common::types::{
    ConfirmWith, Correlation, InputIndex, LogicalTime, NoticeRecord, RecordKind, ReportOutcome,
    ReportRecord,
};
use config::Config;
use store::RecordStore;

use crate::baseline::latest_time;
use crate::errors::TimingError;
use crate::poll::{PollPolicy, Polled};
use crate::wait::{wait_for_new_notice, wait_for_new_report};

/// The record that marked an action as processed.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub kind: RecordKind,
    pub input_index: InputIndex,
    pub index: i64,
    pub time: LogicalTime,
    /// Status decoded from a report payload. Always `None` for notices.
    pub outcome: Option<ReportOutcome>,
}

impl From<ReportRecord> for Confirmation {
    fn from(report: ReportRecord) -> Self {
        Confirmation {
            kind: RecordKind::Report,
            input_index: report.input_index,
            index: report.index,
            outcome: report.outcome(),
            // threshold queries only return records with a time
            time: report.time.unwrap_or_default(),
        }
    }
}

impl From<NoticeRecord> for Confirmation {
    fn from(notice: NoticeRecord) -> Self {
        Confirmation {
            kind: RecordKind::Notice,
            input_index: notice.input_index,
            index: notice.index,
            outcome: None,
            time: notice.time.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Newest confirmation time before the action ran.
    pub baseline: LogicalTime,
    pub confirmation: Confirmation,
    /// Input the duration was computed against.
    pub input_index: InputIndex,
    pub input_time: LogicalTime,
    /// `confirmation.time - input_time`, in logical time units.
    pub duration: i64,
    /// Store queries spent waiting for the confirmation.
    pub attempts: u64,
    /// Wall clock time of the whole measurement, action included.
    pub elapsed: Duration,
}

impl Measurement {
    pub fn rejected(&self) -> bool {
        self.confirmation
            .outcome
            .as_ref()
            .is_some_and(|outcome| outcome.error)
    }
}

/// Times actions by the records the indexer writes once the rollup has processed them.
///
/// Measurements must not overlap: the baseline is a plain snapshot, so any other writer
/// confirming an input during a measurement can satisfy its wait.
#[derive(Debug)]
pub struct Coordinator<S: RecordStore> {
    store: Arc<S>,
    policy: PollPolicy,
    correlation: Correlation,
    confirm_with: ConfirmWith,
}

impl<S: RecordStore> Clone for Coordinator<S> {
    fn clone(&self) -> Self {
        Coordinator {
            store: self.store.clone(),
            policy: self.policy,
            correlation: self.correlation,
            confirm_with: self.confirm_with,
        }
    }
}

impl<S: RecordStore> Coordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Coordinator {
            store,
            policy: PollPolicy::default(),
            correlation: Correlation::default(),
            confirm_with: ConfirmWith::default(),
        }
    }

    pub fn from_config(store: Arc<S>, config: &Config) -> Self {
        Self::new(store)
            .policy(PollPolicy::from(config))
            .correlation(config.correlation)
            .confirm_with(config.confirm_with)
    }

    pub fn policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn correlation(mut self, correlation: Correlation) -> Self {
        self.correlation = correlation;
        self
    }

    pub fn confirm_with(mut self, confirm_with: ConfirmWith) -> Self {
        self.confirm_with = confirm_with;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Newest logical time of the confirming record kind, 0 if there is none.
    pub async fn baseline(&self) -> Result<LogicalTime> {
        latest_time(self.store.as_ref(), self.confirm_with.kind()).await
    }

    /// Runs `action` and waits for the first confirmation newer than the pre-action baseline.
    pub async fn measure<F, Fut>(&self, action: F) -> Result<Measurement>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let started = Instant::now();

        let baseline = self.baseline().await?;
        debug!(
            target: "rollup_bench::timing",
            kind = %self.confirm_with,
            baseline,
            max_wait = ?self.policy.max_wait(),
            "captured baseline"
        );

        action().await?;

        let Polled {
            record: confirmation,
            attempts,
        } = self.wait_for_confirmation(baseline).await?;
        let (input_index, input_time) = self.correlate(&confirmation).await?;
        let duration = confirmation.time - input_time;

        let measurement = Measurement {
            baseline,
            confirmation,
            input_index,
            input_time,
            duration,
            attempts,
            elapsed: started.elapsed(),
        };

        if let Some(outcome) = measurement.confirmation.outcome.as_ref().filter(|o| o.error) {
            warn!(
                target: "rollup_bench::timing",
                input = input_index,
                message = %outcome.message,
                "input rejected by the dapp"
            );
        }

        info!(
            target: "rollup_bench::timing",
            input = input_index,
            duration,
            attempts,
            "action confirmed"
        );

        Ok(measurement)
    }

    async fn wait_for_confirmation(&self, baseline: LogicalTime) -> Result<Polled<Confirmation>> {
        let store = self.store.as_ref();

        let polled = match self.confirm_with {
            ConfirmWith::Report => {
                let Polled { record, attempts } =
                    wait_for_new_report(store, baseline, &self.policy).await?;
                Polled {
                    record: record.into(),
                    attempts,
                }
            }
            ConfirmWith::Notice => {
                let Polled { record, attempts } =
                    wait_for_new_notice(store, baseline, &self.policy).await?;
                Polled {
                    record: record.into(),
                    attempts,
                }
            }
        };

        Ok(polled)
    }

    /// Finds the input a confirmation is timed against and returns its index and time.
    pub async fn correlate(&self, confirmation: &Confirmation) -> Result<(InputIndex, LogicalTime)> {
        match self.correlation {
            Correlation::InputIndex => {
                let index = confirmation.input_index;
                let input = self
                    .store
                    .input(index)
                    .await?
                    .ok_or(TimingError::MissingInput(index))?;
                let time = input.time.ok_or(TimingError::MissingInputTime(index))?;
                Ok((index, time))
            }
            Correlation::LatestInput => {
                let input = self
                    .store
                    .latest_input()
                    .await?
                    .ok_or(TimingError::NoInputs)?;
                let time = input.time.ok_or(TimingError::MissingInputTime(input.index))?;

                if input.index != confirmation.input_index {
                    debug!(
                        target: "rollup_bench::timing",
                        latest = input.index,
                        confirmed = confirmation.input_index,
                        "latest input is not the confirmed one"
                    );
                }

                Ok((input.index, time))
            }
        }
    }
}
