//! Baseline readers: newest logical time of each record kind, or 0 when there is none.

use eyre::Result;

use common::types::{LogicalTime, RecordKind};
use store::RecordStore;

pub async fn latest_time<S: RecordStore + ?Sized>(store: &S, kind: RecordKind) -> Result<LogicalTime> {
    Ok(store.latest_time(kind).await?.unwrap_or(0))
}

pub async fn latest_notice_time<S: RecordStore + ?Sized>(store: &S) -> Result<LogicalTime> {
    latest_time(store, RecordKind::Notice).await
}

pub async fn latest_report_time<S: RecordStore + ?Sized>(store: &S) -> Result<LogicalTime> {
    latest_time(store, RecordKind::Report).await
}

pub async fn latest_input_time<S: RecordStore + ?Sized>(store: &S) -> Result<LogicalTime> {
    latest_time(store, RecordKind::Input).await
}
