//! Threshold waits: the earliest record of a kind newer than a logical time.

use eyre::Result;

use common::types::{LogicalTime, NoticeRecord, RecordKind, ReportRecord};
use store::RecordStore;

use crate::poll::{poll_until, PollPolicy, Polled};

pub async fn wait_for_new_notice<S: RecordStore + ?Sized>(
    store: &S,
    threshold: LogicalTime,
    policy: &PollPolicy,
) -> Result<Polled<NoticeRecord>> {
    poll_until(policy, RecordKind::Notice, threshold, || {
        store.first_notice_after(threshold)
    })
    .await
}

pub async fn wait_for_new_report<S: RecordStore + ?Sized>(
    store: &S,
    threshold: LogicalTime,
    policy: &PollPolicy,
) -> Result<Polled<ReportRecord>> {
    poll_until(policy, RecordKind::Report, threshold, || {
        store.first_report_after(threshold)
    })
    .await
}
