//! Read access to the tables the rollup node's indexer keeps in sync with the chain.

pub mod errors;
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use eyre::Result;

use common::types::{InputIndex, InputRecord, LogicalTime, NoticeRecord, RecordKind, ReportRecord};

/// Queries the benchmark needs from the indexer database.
///
/// Records whose logical time is unset are invisible to every query.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Highest logical time among records of `kind`.
    async fn latest_time(&self, kind: RecordKind) -> Result<Option<LogicalTime>>;

    /// Notice with the smallest logical time strictly greater than `threshold`.
    async fn first_notice_after(&self, threshold: LogicalTime) -> Result<Option<NoticeRecord>>;

    /// Report with the smallest logical time strictly greater than `threshold`.
    async fn first_report_after(&self, threshold: LogicalTime) -> Result<Option<ReportRecord>>;

    /// Input with the highest logical time.
    async fn latest_input(&self) -> Result<Option<InputRecord>>;

    async fn input(&self, index: InputIndex) -> Result<Option<InputRecord>>;
}
