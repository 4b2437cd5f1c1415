//! Batch linkage: drives the resolver over a collection of incoming records.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use ingest::IncomingRecord;
use matcher::{ConfidenceTier, LinkageContext, MatchMethod, MatchResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, Level};

/// Errors that stop a batch before it starts. Per-record failures never
/// surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("invalid batch config: {0}")]
    InvalidConfig(String),
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Batch runner knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BatchConfig {
    /// Invoke the progress callback after every this many processed records.
    pub progress_every: usize,
    /// Worker threads. `1` runs sequentially on the calling thread.
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            progress_every: 10,
            workers: 1,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.progress_every == 0 {
            return Err(BatchError::InvalidConfig(
                "progress_every must be >= 1".into(),
            ));
        }
        if self.workers == 0 {
            return Err(BatchError::InvalidConfig("workers must be >= 1".into()));
        }
        Ok(())
    }
}

/// Snapshot handed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

/// Aggregate counters for one run.
///
/// `by_tier` and `by_method` count successfully resolved records only;
/// failed records are counted in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub processed: usize,
    pub matched: usize,
    pub errors: usize,
    pub cancelled: bool,
    pub by_tier: BTreeMap<ConfidenceTier, usize>,
    pub by_method: BTreeMap<MatchMethod, usize>,
}

impl BatchStats {
    pub fn tier_count(&self, tier: ConfidenceTier) -> usize {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }

    pub fn method_count(&self, method: MatchMethod) -> usize {
        self.by_method.get(&method).copied().unwrap_or(0)
    }

    fn merge(&mut self, other: BatchStats) {
        self.processed += other.processed;
        self.matched += other.matched;
        self.errors += other.errors;
        self.cancelled |= other.cancelled;
        for (tier, count) in other.by_tier {
            *self.by_tier.entry(tier).or_default() += count;
        }
        for (method, count) in other.by_method {
            *self.by_method.entry(method).or_default() += count;
        }
    }
}

/// Result for one processed record. Failed records carry a `no_match`
/// result and the error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub external_id: String,
    pub result: MatchResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Statistics plus per-record outcomes, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub stats: BatchStats,
    pub outcomes: Vec<BatchOutcome>,
}

/// Progress callback. Called from worker threads when `workers > 1`.
pub type ProgressFn<'a> = dyn Fn(BatchProgress) + Sync + 'a;

/// Private per-shard accumulator.
#[derive(Default)]
struct ShardAccumulator {
    stats: BatchStats,
    outcomes: Vec<BatchOutcome>,
}

impl ShardAccumulator {
    fn record(&mut self, incoming: &IncomingRecord, ctx: &LinkageContext) {
        self.stats.processed += 1;
        let outcome = match ctx.resolve(incoming) {
            Ok(result) => {
                if result.is_match() {
                    self.stats.matched += 1;
                }
                *self.stats.by_tier.entry(result.confidence_tier).or_default() += 1;
                *self.stats.by_method.entry(result.method).or_default() += 1;
                BatchOutcome {
                    external_id: incoming.external_id.clone(),
                    result,
                    error: None,
                }
            }
            Err(err) => {
                self.stats.errors += 1;
                BatchOutcome {
                    external_id: incoming.external_id.clone(),
                    result: MatchResult::no_match(),
                    error: Some(err.to_string()),
                }
            }
        };
        self.outcomes.push(outcome);
    }
}

/// Runs [`LinkageContext::resolve`] over a batch of incoming records.
///
/// A failing record is counted and skipped; it never aborts the run.
/// Cancellation is cooperative and checked once per record. With
/// `workers > 1` the input is split into contiguous shards, each with its
/// own accumulator, and shards are merged in input order, so the outcome
/// list matches a sequential run. The worker pool is built once per runner
/// and reused by every run.
pub struct BatchLinkageRunner<'a> {
    ctx: &'a LinkageContext,
    config: BatchConfig,
    pool: Option<rayon::ThreadPool>,
}

impl<'a> BatchLinkageRunner<'a> {
    pub fn new(ctx: &'a LinkageContext, config: BatchConfig) -> Result<Self, BatchError> {
        config.validate()?;
        let pool = if config.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.workers)
                .thread_name(|i| format!("geolink-batch-{i}"))
                .build()
                .map_err(|e| BatchError::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { ctx, config, pool })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn run(&self, records: &[IncomingRecord]) -> Result<BatchReport, BatchError> {
        self.run_with(records, None, None)
    }

    /// Run with an optional progress callback and cancellation flag.
    pub fn run_with(
        &self,
        records: &[IncomingRecord],
        on_progress: Option<&ProgressFn<'_>>,
        cancel: Option<&AtomicBool>,
    ) -> Result<BatchReport, BatchError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "geolink.batch",
            records = records.len(),
            workers = self.config.workers
        );
        let _guard = span.enter();

        let processed = AtomicUsize::new(0);
        let total = records.len();
        let process_shard = |shard: &[IncomingRecord]| -> ShardAccumulator {
            let mut acc = ShardAccumulator {
                stats: BatchStats::default(),
                outcomes: Vec::with_capacity(shard.len()),
            };
            for incoming in shard {
                if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                    acc.stats.cancelled = true;
                    break;
                }
                acc.record(incoming, self.ctx);
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % self.config.progress_every == 0 {
                    debug!(processed = done, total, "batch_progress");
                    if let Some(callback) = on_progress {
                        callback(BatchProgress {
                            processed: done,
                            total,
                        });
                    }
                }
            }
            acc
        };

        let shards: Vec<ShardAccumulator> = match &self.pool {
            Some(pool) if total > 1 => {
                let shard_len = total.div_ceil(self.config.workers);
                pool.install(|| records.par_chunks(shard_len).map(process_shard).collect())
            }
            _ => vec![process_shard(records)],
        };

        let mut report = BatchReport {
            stats: BatchStats::default(),
            outcomes: Vec::with_capacity(total),
        };
        for shard in shards {
            report.stats.merge(shard.stats);
            report.outcomes.extend(shard.outcomes);
        }

        info!(
            processed = report.stats.processed,
            matched = report.stats.matched,
            errors = report.stats.errors,
            cancelled = report.stats.cancelled,
            elapsed_micros = start.elapsed().as_micros(),
            "batch_complete"
        );
        Ok(report)
    }
}

/// One-call form of [`BatchLinkageRunner::run_with`] without cancellation.
pub fn run_batch(
    records: &[IncomingRecord],
    ctx: &LinkageContext,
    config: &BatchConfig,
    on_progress: Option<&ProgressFn<'_>>,
) -> Result<BatchReport, BatchError> {
    BatchLinkageRunner::new(ctx, config.clone())?.run_with(records, on_progress, None)
}
