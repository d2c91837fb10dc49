//! End-to-end behaviour of the ingestion pipeline with in-memory fakes.

use async_trait::async_trait;
use datagen_pipeline::{
    run, Batch, BatchGenerator, BatchSink, Cancellation, NoProgress, Pipeline, PipelineConfig,
    PipelineError, PipelineTuning, ProgressReporter, TripCause,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct FakeError(String);

/// Emits sequential record numbers and remembers every requested size.
#[derive(Default)]
struct SequenceGenerator {
    sizes: Vec<usize>,
    fail_on_call: Option<usize>,
    short_on_call: Option<usize>,
}

impl BatchGenerator for SequenceGenerator {
    type Record = u64;
    type Source = u64;
    type Error = FakeError;

    fn generate(&mut self, size: usize, next: &mut u64) -> Result<Vec<u64>, FakeError> {
        let call = self.sizes.len() + 1;
        self.sizes.push(size);
        if self.fail_on_call == Some(call) {
            return Err(FakeError(format!("generator broke on call {call}")));
        }

        let len = if self.short_on_call == Some(call) {
            size - 1
        } else {
            size
        };
        let start = *next;
        *next += len as u64;
        Ok((start..*next).collect())
    }
}

/// Records every batch it receives. Optionally fails on the k-th write and
/// counts the writes that complete after that failure.
#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<(u64, Vec<u64>)>>,
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
    failed: AtomicBool,
    writes_after_failure: AtomicUsize,
    delay: Option<Duration>,
}

impl RecordingSink {
    fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    fn offsets(&self) -> Vec<u64> {
        let mut offsets: Vec<u64> = self
            .batches
            .lock()
            .unwrap()
            .iter()
            .map(|(offset, _)| *offset)
            .collect();
        offsets.sort_unstable();
        offsets
    }

    fn records(&self) -> Vec<u64> {
        let mut records: Vec<u64> = self
            .batches
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, r)| r.iter().copied())
            .collect();
        records.sort_unstable();
        records
    }
}

#[async_trait]
impl BatchSink for RecordingSink {
    type Record = u64;
    type Error = FakeError;

    async fn write(&self, batch: Batch<u64>) -> Result<(), FakeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_call == Some(call) {
            self.failed.store(true, Ordering::SeqCst);
            return Err(FakeError(format!("bulk write {call} rejected")));
        }
        if self.failed.load(Ordering::SeqCst) {
            self.writes_after_failure.fetch_add(1, Ordering::SeqCst);
        }
        let offset = batch.offset();
        self.batches
            .lock()
            .unwrap()
            .push((offset, batch.into_records()));
        Ok(())
    }
}

/// Keeps every progress update.
#[derive(Default)]
struct RecordingProgress {
    values: Vec<u64>,
    finished: bool,
}

impl ProgressReporter for RecordingProgress {
    fn set(&mut self, submitted: u64) {
        assert!(!self.finished, "progress updated after finish");
        self.values.push(submitted);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn config(target_count: u64, batch_size: usize, workers: usize, depth: usize) -> PipelineConfig {
    PipelineConfig {
        target_count,
        batch_size,
        worker_count: workers,
        queue_depth: depth,
    }
}

#[tokio::test]
async fn test_tail_batch_is_shrunk_once() {
    let mut generator = SequenceGenerator::default();
    let sink = Arc::new(RecordingSink::default());
    let pipeline_config = PipelineConfig::for_target(
        2500,
        &PipelineTuning {
            worker_count: Some(2),
            ..PipelineTuning::default()
        },
    );

    let metrics = run(
        pipeline_config,
        &mut generator,
        &mut 0,
        sink.clone(),
        &mut NoProgress,
    )
    .await
    .unwrap();

    assert_eq!(generator.sizes, vec![1000, 1000, 500]);
    assert_eq!(metrics.records_submitted, 2500);
    assert_eq!(metrics.records_written, 2500);
    assert_eq!(metrics.batch_count, 3);
    assert_eq!(sink.offsets(), vec![0, 1000, 2000]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_sizes_sum_to_target() {
    for (target, batch_size) in [(1u64, 1usize), (999, 1000), (1000, 1000), (7001, 1000), (10, 3)] {
        let mut generator = SequenceGenerator::default();
        let sink = Arc::new(RecordingSink::default());

        run(
            config(target, batch_size, 3, 2),
            &mut generator,
            &mut 0,
            sink.clone(),
            &mut NoProgress,
        )
        .await
        .unwrap();

        let total: usize = generator.sizes.iter().sum();
        assert_eq!(total as u64, target);
        assert!(generator.sizes.iter().all(|s| *s > 0 && *s <= batch_size));

        let (last, full) = generator.sizes.split_last().unwrap();
        assert!(full.iter().all(|s| *s == batch_size));
        if target % batch_size as u64 == 0 {
            assert_eq!(*last, batch_size);
        } else {
            assert_eq!(*last as u64, target % batch_size as u64);
        }

        assert_eq!(sink.records(), (0..target).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_low_volume_run_uses_one_batch() {
    let pipeline_config = PipelineConfig::for_target(500, &PipelineTuning::default());
    assert_eq!(pipeline_config.worker_count, 1);
    assert_eq!(pipeline_config.queue_depth, 1);

    let mut generator = SequenceGenerator::default();
    let sink = Arc::new(RecordingSink::default());
    run(
        pipeline_config,
        &mut generator,
        &mut 0,
        sink.clone(),
        &mut NoProgress,
    )
    .await
    .unwrap();

    assert_eq!(generator.sizes, vec![500]);
    assert_eq!(sink.offsets(), vec![0]);
}

#[tokio::test]
async fn test_progress_reaches_target() {
    let mut generator = SequenceGenerator::default();
    let mut progress = RecordingProgress::default();

    run(
        config(4500, 1000, 2, 3),
        &mut generator,
        &mut 0,
        Arc::new(RecordingSink::default()),
        &mut progress,
    )
    .await
    .unwrap();

    assert!(progress.finished);
    assert_eq!(progress.values.last(), Some(&4500));
    assert!(progress.values.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(&progress.values[..5], &[1000, 2000, 3000, 4000, 4500]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_batch_delivered_once() {
    let mut generator = SequenceGenerator::default();
    let sink = Arc::new(RecordingSink {
        delay: Some(Duration::from_millis(1)),
        ..RecordingSink::default()
    });

    run(
        config(50_000, 500, 4, 3),
        &mut generator,
        &mut 0,
        sink.clone(),
        &mut NoProgress,
    )
    .await
    .unwrap();

    let offsets = sink.offsets();
    let unique: HashSet<u64> = offsets.iter().copied().collect();
    assert_eq!(offsets.len(), 100);
    assert_eq!(unique.len(), 100);
    assert_eq!(sink.records(), (0..50_000).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_write_failure_is_returned_with_bounded_overshoot() {
    let workers = 4;
    let depth = 3;
    let mut generator = SequenceGenerator::default();
    let sink = Arc::new(RecordingSink {
        delay: Some(Duration::from_millis(2)),
        ..RecordingSink::failing_on(5)
    });
    let mut progress = RecordingProgress::default();

    let err = run(
        config(1_000_000, 100, workers, depth),
        &mut generator,
        &mut 0,
        sink.clone(),
        &mut progress,
    )
    .await
    .unwrap_err();

    match err {
        PipelineError::Write { records, source, .. } => {
            assert_eq!(records, 100);
            assert_eq!(source.to_string(), "bulk write 5 rejected");
        }
        other => panic!("Expected write error, got {other:?}"),
    }

    assert!(sink.writes_after_failure.load(Ordering::SeqCst) <= workers + depth);
    assert!(generator.sizes.len() < 10_000, "generation kept going");
    assert!(progress.finished);
    assert!(progress.values.last().copied().unwrap_or(0) < 1_000_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_only_first_write_failure_is_reported() {
    /// Every write fails, each with its own message.
    struct AlwaysFails {
        calls: AtomicU64,
    }

    #[async_trait]
    impl BatchSink for AlwaysFails {
        type Record = u64;
        type Error = FakeError;

        async fn write(&self, _batch: Batch<u64>) -> Result<(), FakeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err(FakeError(format!("failure {call}")))
        }
    }

    let sink = Arc::new(AlwaysFails {
        calls: AtomicU64::new(0),
    });
    let err = run(
        config(100_000, 10, 4, 3),
        &mut SequenceGenerator::default(),
        &mut 0,
        sink,
        &mut NoProgress,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::Write { .. }));
}

#[tokio::test]
async fn test_generation_failure_stops_run() {
    let mut generator = SequenceGenerator {
        fail_on_call: Some(2),
        ..SequenceGenerator::default()
    };
    let sink = Arc::new(RecordingSink::default());
    let mut progress = RecordingProgress::default();

    let pipeline = Pipeline::new(config(5000, 1000, 2, 3));
    let err = pipeline
        .run(&mut generator, &mut 0, sink.clone(), &mut progress)
        .await
        .unwrap_err();

    match err {
        PipelineError::Generation { offset, source } => {
            assert_eq!(offset, 1000);
            assert_eq!(source.to_string(), "generator broke on call 2");
        }
        other => panic!("Expected generation error, got {other:?}"),
    }
    assert_eq!(generator.sizes.len(), 2);
    assert_eq!(
        pipeline.cancellation().is_tripped(),
        Some(TripCause::GenerationFailed)
    );
    // Workers may or may not have started the first batch before the trip
    assert!(sink.offsets().len() <= 1);
    assert_eq!(progress.values.last(), Some(&1000));
    assert!(progress.finished);
}

#[tokio::test]
async fn test_short_batch_is_rejected() {
    let mut generator = SequenceGenerator {
        short_on_call: Some(1),
        ..SequenceGenerator::default()
    };

    let err = run(
        config(2000, 1000, 1, 1),
        &mut generator,
        &mut 0,
        Arc::new(RecordingSink::default()),
        &mut NoProgress,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::BatchSizeMismatch {
            offset: 0,
            expected: 1000,
            actual: 999
        }
    ));
}

#[tokio::test]
async fn test_pre_tripped_cancellation_writes_nothing() {
    let cancellation = Cancellation::new();
    assert!(cancellation.try_trip(TripCause::Interrupted));
    // A second trip is a no-op and keeps the original cause
    assert!(!cancellation.try_trip(TripCause::GenerationFailed));

    let mut generator = SequenceGenerator::default();
    let sink = Arc::new(RecordingSink::default());
    let mut progress = RecordingProgress::default();

    let err = Pipeline::new(config(10_000, 1000, 2, 3))
        .with_cancellation(cancellation)
        .run(&mut generator, &mut 0, sink.clone(), &mut progress)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Interrupted));
    assert!(generator.sizes.is_empty());
    assert!(sink.offsets().is_empty());
    assert_eq!(progress.values, vec![0]);
    assert!(progress.finished);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_interrupt_during_run() {
    let cancellation = Cancellation::new();
    let sink = Arc::new(RecordingSink {
        delay: Some(Duration::from_millis(5)),
        ..RecordingSink::default()
    });

    let trigger = cancellation.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        trigger.try_trip(TripCause::Interrupted);
    });

    let err = Pipeline::new(config(10_000_000, 10, 2, 3))
        .with_cancellation(cancellation)
        .run(
            &mut SequenceGenerator::default(),
            &mut 0,
            sink.clone(),
            &mut NoProgress,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Interrupted));
    assert!(!sink.offsets().is_empty());
}

#[tokio::test]
async fn test_trip_after_last_push_is_not_success() {
    /// Trips the run on its first write, then stays busy while the driver
    /// finishes pushing.
    struct TripsOnFirstWrite {
        cancellation: Cancellation,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl BatchSink for TripsOnFirstWrite {
        type Record = u64;
        type Error = FakeError;

        async fn write(&self, _batch: Batch<u64>) -> Result<(), FakeError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.cancellation.try_trip(TripCause::Interrupted);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        }
    }

    let cancellation = Cancellation::new();
    let sink = Arc::new(TripsOnFirstWrite {
        cancellation: cancellation.clone(),
        writes: AtomicUsize::new(0),
    });

    let result = Pipeline::new(config(4, 1, 1, 3))
        .with_cancellation(cancellation)
        .run(
            &mut SequenceGenerator::default(),
            &mut 0,
            sink.clone(),
            &mut NoProgress,
        )
        .await;

    assert!(matches!(result, Err(PipelineError::Interrupted)));
    assert_eq!(sink.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sink_panic_stops_run() {
    /// Panics on its first write and counts the writes started after it.
    struct PanicsOnFirstWrite {
        calls: AtomicUsize,
        panicked: AtomicBool,
        writes_after_panic: AtomicUsize,
    }

    #[async_trait]
    impl BatchSink for PanicsOnFirstWrite {
        type Record = u64;
        type Error = FakeError;

        async fn write(&self, _batch: Batch<u64>) -> Result<(), FakeError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.panicked.store(true, Ordering::SeqCst);
                panic!("sink exploded");
            }
            if self.panicked.load(Ordering::SeqCst) {
                self.writes_after_panic.fetch_add(1, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok(())
        }
    }

    let workers = 4;
    let depth = 3;
    let mut generator = SequenceGenerator::default();
    let sink = Arc::new(PanicsOnFirstWrite {
        calls: AtomicUsize::new(0),
        panicked: AtomicBool::new(false),
        writes_after_panic: AtomicUsize::new(0),
    });
    let pipeline = Pipeline::new(config(10_000, 1, workers, depth));

    let err = pipeline
        .run(&mut generator, &mut 0, sink.clone(), &mut NoProgress)
        .await
        .unwrap_err();

    match err {
        PipelineError::WorkerPanicked { reason, .. } => assert_eq!(reason, "sink exploded"),
        other => panic!("Expected worker panic, got {other:?}"),
    }
    assert!(matches!(
        pipeline.cancellation().is_tripped(),
        Some(TripCause::WorkerPanicked { .. })
    ));
    assert!(generator.sizes.len() < 1000, "generation kept going");
    assert!(sink.writes_after_panic.load(Ordering::SeqCst) <= workers + depth);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let err = run(
        config(100, 0, 1, 1),
        &mut SequenceGenerator::default(),
        &mut 0,
        Arc::new(RecordingSink::default()),
        &mut NoProgress,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PipelineError::Config(_)));
}
