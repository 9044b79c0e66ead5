use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use eyre::Result;
use tokio::sync::RwLock;

use common::types::{InputIndex, InputRecord, LogicalTime, NoticeRecord, RecordKind, ReportRecord};

use crate::RecordStore;

/// In-process record store.
///
/// Records can be scheduled to appear only after a number of reads, which stands in
/// for an indexer that commits asynchronously while the benchmark polls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    reads: AtomicU64,
}

#[derive(Debug, Default)]
struct Inner {
    inputs: Vec<InputRecord>,
    notices: Vec<NoticeRecord>,
    reports: Vec<ReportRecord>,
    scheduled: Vec<Scheduled>,
}

#[derive(Debug)]
struct Scheduled {
    after_reads: u64,
    record: Record,
}

#[derive(Debug, Clone)]
pub enum Record {
    Input(InputRecord),
    Notice(NoticeRecord),
    Report(ReportRecord),
}

impl Inner {
    fn push(&mut self, record: Record) {
        match record {
            Record::Input(input) => self.inputs.push(input),
            Record::Notice(notice) => self.notices.push(notice),
            Record::Report(report) => self.reports.push(report),
        }
    }

    fn latest_time(&self, kind: RecordKind) -> Option<LogicalTime> {
        match kind {
            RecordKind::Input => self.inputs.iter().filter_map(|r| r.time).max(),
            RecordKind::Notice => self.notices.iter().filter_map(|r| r.time).max(),
            RecordKind::Report => self.reports.iter().filter_map(|r| r.time).max(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: Record) {
        self.inner.write().await.push(record);
    }

    /// Makes `record` visible to reads after the first `after_reads` reads from now on.
    pub async fn schedule(&self, record: Record, after_reads: u64) {
        let after_reads = self.reads() + after_reads;
        self.inner.write().await.scheduled.push(Scheduled {
            after_reads,
            record,
        });
    }

    pub async fn insert_input(&self, input: InputRecord) {
        self.insert(Record::Input(input)).await;
    }

    pub async fn insert_notice(&self, notice: NoticeRecord) {
        self.insert(Record::Notice(notice)).await;
    }

    pub async fn insert_report(&self, report: ReportRecord) {
        self.insert(Record::Report(report)).await;
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    // counts the read and promotes every scheduled record that is now due
    async fn begin_read(&self) -> tokio::sync::RwLockReadGuard<'_, Inner> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut inner = self.inner.write().await;
            let (due, pending): (Vec<_>, Vec<_>) = inner
                .scheduled
                .drain(..)
                .partition(|scheduled| scheduled.after_reads < read);
            inner.scheduled = pending;
            for scheduled in due {
                inner.push(scheduled.record);
            }
        }

        self.inner.read().await
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn latest_time(&self, kind: RecordKind) -> Result<Option<LogicalTime>> {
        Ok(self.begin_read().await.latest_time(kind))
    }

    async fn first_notice_after(&self, threshold: LogicalTime) -> Result<Option<NoticeRecord>> {
        let inner = self.begin_read().await;
        let notice = inner
            .notices
            .iter()
            .filter(|notice| notice.time.is_some_and(|time| time > threshold))
            .min_by_key(|notice| (notice.time, notice.input_index, notice.index))
            .cloned();
        Ok(notice)
    }

    async fn first_report_after(&self, threshold: LogicalTime) -> Result<Option<ReportRecord>> {
        let inner = self.begin_read().await;
        let report = inner
            .reports
            .iter()
            .filter(|report| report.time.is_some_and(|time| time > threshold))
            .min_by_key(|report| (report.time, report.input_index, report.index))
            .cloned();
        Ok(report)
    }

    async fn latest_input(&self) -> Result<Option<InputRecord>> {
        let inner = self.begin_read().await;
        let input = inner
            .inputs
            .iter()
            .filter(|input| input.time.is_some())
            .max_by_key(|input| (input.time, input.index))
            .cloned();
        Ok(input)
    }

    async fn input(&self, index: InputIndex) -> Result<Option<InputRecord>> {
        let inner = self.begin_read().await;
        Ok(inner.inputs.iter().find(|input| input.index == index).cloned())
    }
}
