use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rollup_bench::prelude::*;
use store::memory::Record;

criterion_main!(measure);
criterion_group! {
    name = measure;
    config = Criterion::default().sample_size(50);
    targets =
        bench_measure_immediate_report,
        bench_measure_delayed_report,
        bench_wait_over_many_reports,
}

fn construct_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn input(index: InputIndex, time: LogicalTime) -> InputRecord {
    InputRecord {
        index,
        msg_sender: vec![0; 20],
        tx_hash: vec![0; 32],
        block_number: index,
        timestamp: Default::default(),
        payload: vec![],
        time: Some(time),
    }
}

fn report(input_index: InputIndex, time: LogicalTime) -> ReportRecord {
    ReportRecord {
        input_index,
        index: 0,
        payload: br#"{"error": false, "message": "ok", "payload": ""}"#.to_vec(),
        time: Some(time),
    }
}

fn coordinator(store: Arc<MemoryStore>) -> Coordinator<MemoryStore> {
    Coordinator::new(store).policy(PollPolicy::new(Duration::ZERO, 1_000))
}

/// Coordinator overhead when the report is already there on the first poll.
pub fn bench_measure_immediate_report(c: &mut Criterion) {
    c.bench_function("measure_immediate_report", |b| {
        b.to_async(construct_runtime()).iter_batched(
            || Arc::new(MemoryStore::new()),
            |store| async move {
                coordinator(store.clone())
                    .measure(|| async {
                        store.insert_input(input(0, 10)).await;
                        store.insert_report(report(0, 25)).await;
                        Ok(())
                    })
                    .await
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

/// Polling cost when the indexer lags behind by a hundred reads.
pub fn bench_measure_delayed_report(c: &mut Criterion) {
    c.bench_function("measure_delayed_report", |b| {
        b.to_async(construct_runtime()).iter_batched(
            || Arc::new(MemoryStore::new()),
            |store| async move {
                coordinator(store.clone())
                    .measure(|| async {
                        store.insert_input(input(0, 10)).await;
                        store.schedule(Record::Report(report(0, 25)), 100).await;
                        Ok(())
                    })
                    .await
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

/// Threshold wait over a store already holding ten thousand reports.
pub fn bench_wait_over_many_reports(c: &mut Criterion) {
    let rt = construct_runtime();
    let store = MemoryStore::new();
    rt.block_on(async {
        for index in 0..10_000 {
            store.insert_report(report(index, index + 1)).await;
        }
    });

    let policy = PollPolicy::new(Duration::ZERO, 1);
    c.bench_function("wait_over_many_reports", |b| {
        b.to_async(&rt)
            .iter(|| async { wait_for_new_report(&store, 9_998, &policy).await.unwrap() })
    });
}
