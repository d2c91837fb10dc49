//! Pipeline driver: sizes batches, feeds the channel and settles the run.

use crate::batch::Batch;
use crate::cancel::{Cancellation, TripCause};
use crate::channel::batch_channel;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::generator::BatchGenerator;
use crate::progress::ProgressReporter;
use crate::sink::BatchSink;
use crate::slot::ErrorSlot;
use crate::worker::{WorkerReport, WriterWorker};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Metrics from a completed run.
#[derive(Debug, Clone, Default)]
pub struct PipelineMetrics {
    /// Number of records handed to the writers.
    pub records_submitted: u64,
    /// Number of batches handed to the writers.
    pub batch_count: u64,
    /// Number of records the sink acknowledged.
    pub records_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time the driver spent generating batches.
    pub generation_duration: Duration,
}

impl PipelineMetrics {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.records_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// One ingestion run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    cancellation: Cancellation,
}

impl Pipeline {
    /// Create a pipeline with its own cancellation coordinator.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancellation: Cancellation::new(),
        }
    }

    /// Use a coordinator supplied by the caller, so the run can be stopped
    /// from outside (e.g. on Ctrl-C).
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Handle to this run's cancellation coordinator.
    pub fn cancellation(&self) -> Cancellation {
        self.cancellation.clone()
    }

    /// Get the sizing of this run.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate `target_count` records and write them through `sink`.
    ///
    /// Returns `Ok` only when every record was accepted by the sink.
    /// Otherwise the first failure of the run is returned and later ones are
    /// dropped. Progress is always finished with the true submitted total.
    pub async fn run<G, S, P>(
        &self,
        generator: &mut G,
        source: &mut G::Source,
        sink: Arc<S>,
        progress: &mut P,
    ) -> Result<PipelineMetrics, PipelineError>
    where
        G: BatchGenerator<Record = S::Record>,
        S: BatchSink,
        P: ProgressReporter + ?Sized,
    {
        let config = &self.config;
        config.validate()?;

        let start_time = Instant::now();
        let mut metrics = PipelineMetrics::default();

        info!(
            "Ingesting {} records (batch size: {}, workers: {}, queue depth: {})",
            config.target_count, config.batch_size, config.worker_count, config.queue_depth
        );

        let (tx, rx) = batch_channel(config.queue_depth);
        let errors = ErrorSlot::new();

        let workers: Vec<JoinHandle<WorkerReport>> = (0..config.worker_count)
            .map(|id| {
                WriterWorker::new(
                    id,
                    rx.clone(),
                    Arc::clone(&sink),
                    errors.clone(),
                    self.cancellation.clone(),
                )
                .start()
            })
            .collect();
        // Only workers hold receivers, so a push fails once they are all gone
        drop(rx);

        let mut batch_size = config.batch_size;

        while metrics.records_submitted < config.target_count {
            if let Some(cause) = self.cancellation.is_tripped() {
                warn!(
                    "Stopping generation after {} records: {}",
                    metrics.records_submitted, cause
                );
                break;
            }

            let remaining = config.target_count - metrics.records_submitted;
            if remaining < batch_size as u64 {
                batch_size = remaining as usize;
            }

            let offset = metrics.records_submitted;
            let gen_start = Instant::now();
            let generated = generator.generate(batch_size, source);
            metrics.generation_duration += gen_start.elapsed();

            let records = match generated {
                Ok(records) if records.len() == batch_size => records,
                Ok(records) => {
                    self.fail(
                        &errors,
                        PipelineError::BatchSizeMismatch {
                            offset,
                            expected: batch_size,
                            actual: records.len(),
                        },
                    );
                    break;
                }
                Err(e) => {
                    self.fail(
                        &errors,
                        PipelineError::Generation {
                            offset,
                            source: Box::new(e),
                        },
                    );
                    break;
                }
            };

            if tx.push(Batch::new(offset, records)).await.is_err() {
                warn!(
                    "Writers stopped accepting batches after {} records",
                    metrics.records_submitted
                );
                break;
            }

            metrics.records_submitted += batch_size as u64;
            metrics.batch_count += 1;
            progress.set(metrics.records_submitted);

            debug!(
                "Batch {} submitted: {} records at offset {}",
                metrics.batch_count, batch_size, offset
            );
        }

        tx.close();

        for (id, handle) in workers.into_iter().enumerate() {
            match handle.await {
                Ok(report) => metrics.records_written += report.records,
                Err(e) => {
                    self.cancellation
                        .try_trip(TripCause::WorkerPanicked { worker: id });
                    errors.offer(PipelineError::WorkerPanicked {
                        worker: id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        progress.set(metrics.records_submitted);
        progress.finish();
        metrics.total_duration = start_time.elapsed();

        if let Some(err) = errors.take() {
            return Err(err);
        }
        // Queued batches are dropped by workers that observe a late trip
        if metrics.records_written < config.target_count {
            warn!(
                "Only {} of {} records were written",
                metrics.records_written, config.target_count
            );
            return Err(match self.cancellation.is_tripped() {
                Some(TripCause::Interrupted) => PipelineError::Interrupted,
                _ => PipelineError::WorkersExited,
            });
        }

        info!(
            "Ingestion complete: {} records in {:?} ({:.2} records/sec)",
            metrics.records_written,
            metrics.total_duration,
            metrics.records_per_second()
        );

        Ok(metrics)
    }

    fn fail(&self, errors: &ErrorSlot, error: PipelineError) {
        warn!("{}", error);
        errors.offer(error);
        self.cancellation.try_trip(TripCause::GenerationFailed);
    }
}

/// Run a pipeline sized by `config` with a fresh cancellation coordinator.
pub async fn run<G, S, P>(
    config: PipelineConfig,
    generator: &mut G,
    source: &mut G::Source,
    sink: Arc<S>,
    progress: &mut P,
) -> Result<PipelineMetrics, PipelineError>
where
    G: BatchGenerator<Record = S::Record>,
    S: BatchSink,
    P: ProgressReporter + ?Sized,
{
    Pipeline::new(config)
        .run(generator, source, sink, progress)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = PipelineMetrics {
            records_submitted: 1000,
            batch_count: 1,
            records_written: 1000,
            total_duration: Duration::from_secs(10),
            generation_duration: Duration::from_secs(2),
        };

        assert_eq!(metrics.records_per_second(), 100.0);
        assert_eq!(PipelineMetrics::default().records_per_second(), 0.0);
    }

    #[test]
    fn test_pipeline_shares_cancellation() {
        let cancellation = Cancellation::new();
        let pipeline = Pipeline::new(PipelineConfig::for_target(
            10,
            &crate::config::PipelineTuning::default(),
        ))
        .with_cancellation(cancellation.clone());

        cancellation.try_trip(TripCause::Interrupted);
        assert_eq!(
            pipeline.cancellation().is_tripped(),
            Some(TripCause::Interrupted)
        );
        assert_eq!(pipeline.config().worker_count, 1);
    }
}
