use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tracing_test::traced_test;

use common::types::{
    ConfirmWith, Correlation, InputIndex, InputRecord, LogicalTime, NoticeRecord, ReportRecord,
};
use store::memory::Record;
use store::MemoryStore;
use timing::errors::TimingError;
use timing::{
    latest_input_time, latest_notice_time, latest_report_time, wait_for_new_notice,
    wait_for_new_report, Coordinator, PollPolicy,
};

fn input(index: InputIndex, time: LogicalTime) -> InputRecord {
    InputRecord {
        index,
        msg_sender: vec![0xf3; 20],
        tx_hash: vec![0xab; 32],
        block_number: 16 + index,
        timestamp: NaiveDateTime::default(),
        payload: br#"{"method": "stream"}"#.to_vec(),
        time: Some(time),
    }
}

fn report(input_index: InputIndex, time: LogicalTime) -> ReportRecord {
    ReportRecord {
        input_index,
        index: 0,
        payload: br#"{"error": false, "message": "Success", "payload": "0x"}"#.to_vec(),
        time: Some(time),
    }
}

fn notice(input_index: InputIndex, time: LogicalTime) -> NoticeRecord {
    NoticeRecord {
        input_index,
        index: 0,
        payload: vec![1, 2, 3],
        time: Some(time),
    }
}

fn policy(max_attempts: u64) -> PollPolicy {
    PollPolicy::new(Duration::ZERO, max_attempts)
}

#[tokio::test]
async fn test_empty_store_baselines_are_zero() {
    let store = MemoryStore::new();

    assert_eq!(latest_report_time(&store).await.unwrap(), 0);
    assert_eq!(latest_notice_time(&store).await.unwrap(), 0);
    assert_eq!(latest_input_time(&store).await.unwrap(), 0);
}

#[tokio::test]
async fn test_baseline_is_idempotent() {
    let store = MemoryStore::new();
    store.insert_report(report(0, 40)).await;
    store.insert_report(report(1, 90)).await;

    let first = latest_report_time(&store).await.unwrap();
    let second = latest_report_time(&store).await.unwrap();

    assert_eq!(first, 90);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_wait_returns_first_new_record_for_monotonic_inserts() {
    let store = MemoryStore::new();
    for (i, time) in [10, 20, 20, 35].into_iter().enumerate() {
        store.insert_report(report(i as InputIndex, time)).await;
    }

    let polled = wait_for_new_report(&store, 20, &policy(1)).await.unwrap();
    assert_eq!(polled.record.time, Some(35));
    assert_eq!(polled.record.input_index, 3);

    let polled = wait_for_new_report(&store, 10, &policy(1)).await.unwrap();
    assert_eq!(polled.record.input_index, 1);
}

#[tokio::test]
async fn test_wait_terminates_after_delayed_insert() {
    for delay in [0, 1, 5, 25] {
        let store = MemoryStore::new();
        store.schedule(Record::Report(report(0, 11)), delay).await;

        let polled = wait_for_new_report(&store, 10, &policy(100)).await.unwrap();

        assert_eq!(polled.record, report(0, 11));
        assert_eq!(polled.attempts, delay + 1);
    }
}

#[tokio::test]
async fn test_wait_times_out_when_store_never_advances() {
    let store = MemoryStore::new();
    store.insert_report(report(0, 10)).await;

    let err = wait_for_new_report(&store, 10, &policy(5)).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TimingError>(),
        Some(TimingError::Timeout { attempts: 5, threshold: 10, .. })
    ));
    assert_eq!(store.reads(), 5);
}

#[tokio::test]
async fn test_wait_prefers_smaller_time_among_concurrent_reports() {
    let store = MemoryStore::new();
    store.insert_report(report(0, 50)).await;
    store.schedule(Record::Report(report(2, 300)), 2).await;
    store.schedule(Record::Report(report(1, 100)), 2).await;

    let polled = wait_for_new_report(&store, 50, &policy(10)).await.unwrap();

    assert_eq!(polled.record.time, Some(100));
    assert_eq!(polled.record.input_index, 1);
}

#[tokio::test]
async fn test_wait_for_new_notice() {
    let store = MemoryStore::new();
    store.insert_notice(notice(0, 5)).await;
    store.schedule(Record::Notice(notice(1, 9)), 3).await;

    let polled = wait_for_new_notice(&store, 5, &policy(10)).await.unwrap();

    assert_eq!(polled.record.input_index, 1);
    assert_eq!(polled.attempts, 4);
}

#[tokio::test]
async fn test_measure_end_to_end() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(store.clone()).policy(policy(50));

    assert_eq!(coordinator.baseline().await.unwrap(), 0);

    let measurement = coordinator
        .measure(|| async {
            store.insert_input(input(0, 120)).await;
            store.schedule(Record::Report(report(0, 500)), 3).await;
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(measurement.baseline, 0);
    assert_eq!(measurement.duration, 380);
    assert_eq!(measurement.input_index, 0);
    assert_eq!(measurement.attempts, 4);
    assert!(!measurement.rejected());
}

#[tokio::test]
async fn test_measure_is_non_negative_for_well_formed_data() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(store.clone()).policy(policy(50));

    for index in 0..20 {
        let input_time = 20 * index + 1;
        let report_time = input_time + index * 7 % 11;

        let measurement = coordinator
            .measure(|| async {
                store.insert_input(input(index, input_time)).await;
                store.schedule(Record::Report(report(index, report_time)), 1).await;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(measurement.input_index, index);
        assert!(measurement.duration >= 0);
    }
}

#[tokio::test]
async fn test_measure_correlates_by_input_index() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(store.clone()).policy(policy(50));

    let measurement = coordinator
        .measure(|| async {
            store.insert_input(input(0, 100)).await;
            // a later input from another writer lands before the first one is processed
            store.insert_input(input(1, 180)).await;
            store.schedule(Record::Report(report(0, 250)), 1).await;
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(measurement.input_index, 0);
    assert_eq!(measurement.duration, 150);

    let latest = Coordinator::new(store.clone())
        .policy(policy(50))
        .correlation(Correlation::LatestInput);
    let (index, time) = latest.correlate(&measurement.confirmation).await.unwrap();
    assert_eq!((index, time), (1, 180));
}

#[tokio::test]
async fn test_measure_missing_input_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(store.clone()).policy(policy(5));

    let err = coordinator
        .measure(|| async {
            store.insert_report(report(7, 10)).await;
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TimingError>(),
        Some(TimingError::MissingInput(7))
    ));
}

#[tokio::test]
async fn test_measure_propagates_action_errors() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(store.clone()).policy(policy(5));

    let err = coordinator
        .measure(|| async { Err(eyre::eyre!("nonce too low")) })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "nonce too low");
    assert_eq!(store.reads(), 1);
}

#[tokio::test]
async fn test_measure_with_zero_attempt_policy_times_out() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(store.clone()).policy(PollPolicy {
        interval: Duration::from_millis(10),
        max_attempts: 0,
    });

    let err = coordinator.measure(|| async { Ok(()) }).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TimingError>(),
        Some(TimingError::Timeout { attempts: 1, .. })
    ));
}

#[tokio::test]
async fn test_measure_with_notice_confirmation() {
    let store = Arc::new(MemoryStore::new());
    store.insert_notice(notice(0, 30)).await;
    store.insert_report(report(0, 1_000)).await;

    let coordinator = Coordinator::new(store.clone())
        .policy(policy(10))
        .confirm_with(ConfirmWith::Notice);

    let measurement = coordinator
        .measure(|| async {
            store.insert_input(input(1, 40)).await;
            store.schedule(Record::Notice(notice(1, 65)), 2).await;
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(measurement.baseline, 30);
    assert_eq!(measurement.duration, 25);
    assert!(measurement.confirmation.outcome.is_none());
}

#[traced_test]
#[tokio::test]
async fn test_measure_logs_rejected_input() {
    let store = Arc::new(MemoryStore::new());
    let coordinator = Coordinator::new(store.clone()).policy(policy(10));

    let measurement = coordinator
        .measure(|| async {
            store.insert_input(input(0, 10)).await;
            store
                .insert_report(ReportRecord {
                    payload: br#"{"error": true, "message": "Unknown method unwrap", "payload": "0x"}"#
                        .to_vec(),
                    ..report(0, 12)
                })
                .await;
            Ok(())
        })
        .await
        .unwrap();

    assert!(measurement.rejected());
    assert!(logs_contain("input rejected by the dapp"));
}
