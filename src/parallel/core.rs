use crossbeam::channel::{Receiver, Sender, bounded};
use std::panic::{self, AssertUnwindSafe};

use super::cancel::CancellationToken;
use super::progress::ProgressTracker;
use crate::error::{CrackError, Result};
use crate::oracle::CrackOracle;

/// How a stage's run through the pool ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolOutcome {
    /// First successful candidate in completion order
    Found(String),
    /// Every candidate was tested without success
    Exhausted,
    /// The interrupt token was cancelled before either of the above
    Interrupted,
}

/// Collaborators shared by every worker of one stage
#[derive(Clone, Copy)]
pub struct PoolContext<'a> {
    pub oracle: &'a dyn CrackOracle,
    pub progress: &'a ProgressTracker,
    pub interrupt: &'a CancellationToken,
}

/// Dispatch tuning for the parallel executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTuning {
    /// Candidates handed to a worker at once
    pub chunk_size: usize,
    /// Work channel capacity = workers * multiplier chunks
    pub channel_buffer_multiplier: usize,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            channel_buffer_multiplier: 2,
        }
    }
}

/// Test one candidate. A panicking oracle counts as a failed attempt so it
/// cannot take sibling workers down with it.
fn attempt(oracle: &dyn CrackOracle, candidate: &str) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| oracle.try_password(candidate))) {
        Ok(unlocked) => unlocked,
        Err(_) => {
            tracing::warn!("Oracle panicked while testing a candidate, counting it as a failure");
            false
        }
    }
}

/// Producer/consumer pool testing candidates on scoped worker threads
pub struct ParallelExecutor {
    max_workers: usize,
    chunk_size: usize,
    buffer_size: usize,
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, 's> {
    worker_id: usize,
    work_rx: Receiver<Vec<String>>,
    found_tx: Sender<String>,
    stage_done: &'s CancellationToken,
    pool: PoolContext<'a>,
}

impl ParallelExecutor {
    pub fn new(max_workers: usize, tuning: PoolTuning) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            chunk_size: tuning.chunk_size.max(1),
            buffer_size: max_workers * tuning.channel_buffer_multiplier.max(1),
        }
    }

    /// Test candidates until one unlocks the archive or the generator runs dry.
    ///
    /// A producer thread slices the generator into chunks and feeds a bounded
    /// channel in generator order. Workers test candidates, counting each
    /// completed attempt, and check for cancellation between candidates, so
    /// after a success each worker finishes at most the attempt it is in. The
    /// first success to arrive wins; later ones are discarded. All threads are
    /// joined before this returns, so the counter is final once it does.
    pub fn execute<I>(&self, candidates: I, ctx: PoolContext<'_>) -> Result<PoolOutcome>
    where
        I: Iterator<Item = String> + Send,
    {
        // Don't create more workers than candidates. Filtered generators only
        // know their upper bound, so prefer it.
        let (lower, upper) = candidates.size_hint();
        let workers = self.max_workers.min(upper.unwrap_or(lower).max(1));
        let stage_done = CancellationToken::new();

        let (work_tx, work_rx) = bounded::<Vec<String>>(self.buffer_size);
        // Each worker reports at most one success, so sends never block
        let (found_tx, found_rx) = bounded::<String>(workers);

        tracing::debug!(
            "Starting {} workers (chunk size {}, buffer {} chunks)",
            workers,
            self.chunk_size,
            self.buffer_size
        );

        let found = crossbeam::thread::scope(|s| {
            for worker_id in 0..workers {
                let worker = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    found_tx: found_tx.clone(),
                    stage_done: &stage_done,
                    pool: ctx,
                };
                s.spawn(move |_| worker.run());
            }

            // Producer thread: send chunks to workers
            let chunk_size = self.chunk_size;
            let stage_done = &stage_done;
            s.spawn(move |_| produce(candidates, chunk_size, work_tx, stage_done, ctx.interrupt));

            // Drop our handles so channel state follows the threads that use them
            drop(work_rx);
            drop(found_tx);

            // Collector: keep the first success in completion order
            let mut found = None;
            for password in found_rx.iter() {
                if found.is_none() {
                    stage_done.cancel();
                    found = Some(password);
                } else {
                    tracing::debug!("Discarding success reported after cancellation");
                }
            }
            found
        })
        .map_err(|_| CrackError::WorkerPanic)?;

        Ok(match found {
            Some(password) => PoolOutcome::Found(password),
            None if ctx.interrupt.is_cancelled() => PoolOutcome::Interrupted,
            None => PoolOutcome::Exhausted,
        })
    }
}

impl WorkerContext<'_, '_> {
    fn run(self) {
        'chunks: while let Ok(chunk) = self.work_rx.recv() {
            for candidate in chunk {
                if self.stage_done.is_cancelled() || self.pool.interrupt.is_cancelled() {
                    break 'chunks;
                }

                let unlocked = attempt(self.pool.oracle, &candidate);
                self.pool.progress.record_attempt();

                if unlocked {
                    tracing::debug!("Worker {} found the password", self.worker_id);
                    self.stage_done.cancel();
                    let _ = self.found_tx.send(candidate);
                    break 'chunks;
                }
            }
        }
    }
}

fn produce<I>(
    mut candidates: I,
    chunk_size: usize,
    work_tx: Sender<Vec<String>>,
    stage_done: &CancellationToken,
    interrupt: &CancellationToken,
) where
    I: Iterator<Item = String>,
{
    while !stage_done.is_cancelled() && !interrupt.is_cancelled() {
        let chunk: Vec<String> = candidates.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        if work_tx.send(chunk).is_err() {
            break; // Workers dropped
        }
    }
}

/// Single-threaded execution with the same contract as [`ParallelExecutor`]
pub struct SequentialExecutor;

impl SequentialExecutor {
    /// Test candidates in generator order on the calling thread.
    ///
    /// `on_attempt` sees every tested candidate, in order, after it has been
    /// counted; the coordinator uses it for tried-set bookkeeping.
    pub fn execute<I, F>(candidates: I, ctx: PoolContext<'_>, mut on_attempt: F) -> PoolOutcome
    where
        I: Iterator<Item = String>,
        F: FnMut(&str),
    {
        for candidate in candidates {
            if ctx.interrupt.is_cancelled() {
                return PoolOutcome::Interrupted;
            }

            let unlocked = attempt(ctx.oracle, &candidate);
            ctx.progress.record_attempt();
            on_attempt(&candidate);

            if unlocked {
                return PoolOutcome::Found(candidate);
            }
        }
        PoolOutcome::Exhausted
    }
}

/// Execution strategy enum for choosing between parallel and sequential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
}

impl ExecutionStrategy {
    pub fn execute<I>(
        &self,
        candidates: I,
        ctx: PoolContext<'_>,
        tuning: PoolTuning,
    ) -> Result<PoolOutcome>
    where
        I: Iterator<Item = String> + Send,
    {
        match self {
            ExecutionStrategy::Sequential => {
                Ok(SequentialExecutor::execute(candidates, ctx, |_| {}))
            }
            ExecutionStrategy::Parallel { workers } => {
                ParallelExecutor::new(*workers, tuning).execute(candidates, ctx)
            }
        }
    }

    /// Threshold-based choice between sequential and parallel execution.
    ///
    /// ```rust
    /// use unlatch::parallel::ExecutionStrategy;
    ///
    /// // 36 < 50 -> Sequential (threshold not met)
    /// assert!(matches!(ExecutionStrategy::auto(36, 50, 8), ExecutionStrategy::Sequential));
    ///
    /// // 100 >= 50 -> Parallel (threshold met)
    /// assert!(matches!(ExecutionStrategy::auto(100, 50, 8), ExecutionStrategy::Parallel { workers: 8 }));
    /// ```
    pub fn auto(candidate_count: u64, min_candidates_for_parallel: u64, workers: usize) -> Self {
        if candidate_count >= min_candidates_for_parallel {
            ExecutionStrategy::Parallel { workers }
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Worker count for parallel stages.
    ///
    /// An explicit request wins. Zero derives the count from the available CPU
    /// cores scaled by `thread_percentage`, never below one.
    ///
    /// ```rust
    /// use unlatch::parallel::ExecutionStrategy;
    ///
    /// assert_eq!(ExecutionStrategy::resolve_workers(3, 50), 3);
    /// assert!(ExecutionStrategy::resolve_workers(0, 100) >= 1);
    /// assert!(ExecutionStrategy::resolve_workers(0, 1) >= 1);
    /// ```
    pub fn resolve_workers(requested: usize, thread_percentage: u8) -> usize {
        if requested > 0 {
            return requested;
        }

        let available_cores = num_cpus::get();
        std::cmp::max(1, (available_cores * thread_percentage as usize) / 100)
    }
}
