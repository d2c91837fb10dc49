//! Concurrent batch generation and ingestion pipeline.
//!
//! The pipeline turns a target record count into a bounded stream of
//! batches, fans them out to a pool of writer workers and coordinates either
//! successful completion or first-failure shutdown across all of them.
//!
//! # Architecture
//!
//! ```text
//!                     ┌──────────────────────┐
//!  BatchGenerator ──▶ │ Driver (single task) │ ──▶ ProgressReporter
//!                     └──────────┬───────────┘
//!                                │ push (blocks when full)
//!                                ▼
//!                     ┌──────────────────────┐
//!                     │ BatchChannel (depth) │
//!                     └──────────┬───────────┘
//!                 pop ┌──────────┼──────────┐
//!                     ▼          ▼          ▼
//!                  Worker 0   Worker 1 … Worker N-1 ──▶ BatchSink
//!                     │          │          │
//!                     └── ErrorSlot + Cancellation ──┘
//! ```
//!
//! Cancellation is cooperative: the driver checks it before generating each
//! batch and every worker checks it before writing each batch. Work already
//! in flight is never interrupted.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use datagen_pipeline::{run, Batch, BatchGenerator, BatchSink, NoProgress, PipelineConfig, PipelineTuning};
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! struct Numbers;
//!
//! impl BatchGenerator for Numbers {
//!     type Record = u64;
//!     type Source = u64;
//!     type Error = Infallible;
//!
//!     fn generate(&mut self, size: usize, next: &mut u64) -> Result<Vec<u64>, Infallible> {
//!         let start = *next;
//!         *next += size as u64;
//!         Ok((start..*next).collect())
//!     }
//! }
//!
//! struct Discard;
//!
//! #[async_trait]
//! impl BatchSink for Discard {
//!     type Record = u64;
//!     type Error = Infallible;
//!
//!     async fn write(&self, _batch: Batch<u64>) -> Result<(), Infallible> {
//!         Ok(())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let config = PipelineConfig::for_target(2500, &PipelineTuning::default());
//! let metrics = run(config, &mut Numbers, &mut 0, Arc::new(Discard), &mut NoProgress)
//!     .await
//!     .unwrap();
//! assert_eq!(metrics.records_submitted, 2500);
//! assert_eq!(metrics.batch_count, 3);
//! # });
//! ```

pub mod batch;
pub mod cancel;
pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod generator;
pub mod progress;
pub mod sink;
pub mod slot;
mod worker;

// Re-exports for convenience
pub use batch::Batch;
pub use cancel::{Cancellation, TripCause};
pub use channel::{batch_channel, BatchReceiver, BatchSender};
pub use config::{PipelineConfig, PipelineTuning};
pub use driver::{run, Pipeline, PipelineMetrics};
pub use error::{BoxError, PipelineError};
pub use generator::BatchGenerator;
pub use progress::{NoProgress, ProgressReporter};
pub use sink::BatchSink;
pub use slot::ErrorSlot;
