use std::sync::Arc;

use super::result::SearchResult;
use super::tried::{TriedPolicy, TriedSet};
use crate::config::{ExecutionMode, Settings};
use crate::error::{CrackError, Result};
use crate::oracle::CrackOracle;
use crate::parallel::{
    CancellationToken, ExecutionStrategy, PoolContext, PoolOutcome, PoolTuning, ProgressReporter,
    ProgressTracker, SequentialExecutor,
};
use crate::plan::{Stage, StageMode, StagePlan};
use crate::sink::ResultSink;

/// Lifecycle of a [`SearchCoordinator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    RunningStage(usize),
    Success,
    Exhausted,
    Interrupted,
}

/// Execution knobs for a search, independent of the plan itself
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Workers for parallel stages, already resolved (never zero)
    pub workers: usize,
    pub tuning: PoolTuning,
    pub mode: ExecutionMode,
    pub min_candidates_for_parallel: u64,
    pub tried_policy: TriedPolicy,
    pub parallel_interval: u64,
    pub sequential_interval: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            workers: ExecutionStrategy::resolve_workers(0, 100),
            tuning: PoolTuning::default(),
            mode: ExecutionMode::Auto,
            min_candidates_for_parallel: 10_000,
            tried_policy: TriedPolicy::default(),
            parallel_interval: 100_000,
            sequential_interval: 1_000,
        }
    }
}

impl SearchOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let search = &settings.search;
        Self {
            workers: ExecutionStrategy::resolve_workers(search.workers, search.thread_percentage),
            tuning: PoolTuning {
                chunk_size: search.chunk_size,
                channel_buffer_multiplier: search.channel_buffer_multiplier,
            },
            mode: search.mode,
            min_candidates_for_parallel: search.min_candidates_for_parallel,
            tried_policy: search.tried_policy,
            parallel_interval: settings.progress.parallel_interval,
            sequential_interval: settings.progress.sequential_interval,
        }
    }
}

/// Runs a [`StagePlan`] against an oracle, one stage at a time.
///
/// The first stage to produce a password ends the search: the sink is called
/// exactly once and no later stage starts. If every stage runs dry the search
/// reports `found = false`. Cancelling the interrupt token makes [`run`]
/// return [`CrackError::Interrupted`] once in-flight attempts have finished;
/// the sink is not called in that case.
///
/// [`run`]: SearchCoordinator::run
pub struct SearchCoordinator {
    plan: StagePlan,
    oracle: Arc<dyn CrackOracle>,
    sink: Arc<dyn ResultSink>,
    options: SearchOptions,
    interrupt: CancellationToken,
    reporter: Option<ProgressReporter>,
    state: SearchState,
    tried: TriedSet,
}

impl SearchCoordinator {
    pub fn new(
        plan: StagePlan,
        oracle: Arc<dyn CrackOracle>,
        sink: Arc<dyn ResultSink>,
        options: SearchOptions,
    ) -> Self {
        Self {
            plan,
            oracle,
            sink,
            options,
            interrupt: CancellationToken::new(),
            reporter: None,
            state: SearchState::Idle,
            tried: TriedSet::new(),
        }
    }

    /// Use an externally owned token, e.g. one cancelled by a signal handler
    pub fn with_interrupt(mut self, interrupt: CancellationToken) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Token that interrupts this search when cancelled
    pub fn interrupt_token(&self) -> CancellationToken {
        self.interrupt.clone()
    }

    pub fn plan(&self) -> &StagePlan {
        &self.plan
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Candidates recorded by the last run's recording stages
    pub fn tried(&self) -> &TriedSet {
        &self.tried
    }

    pub fn run(&mut self) -> Result<SearchResult> {
        let mut progress = ProgressTracker::new(self.options.parallel_interval);
        if let Some(reporter) = &self.reporter {
            progress = progress.with_reporter(reporter.clone());
        }
        self.tried = TriedSet::new();

        tracing::info!(
            "Searching {} stage(s) of length {} with up to {} worker(s)",
            self.plan.len(),
            self.plan.length(),
            self.options.workers
        );

        let stages = self.plan.stages();
        for (index, stage) in stages.iter().enumerate() {
            enter(&mut self.state, SearchState::RunningStage(index));

            if self.interrupt.is_cancelled() {
                enter(&mut self.state, SearchState::Interrupted);
                return Err(CrackError::Interrupted);
            }

            let strategy = strategy_for(&self.options, stage);
            progress.set_report_interval(match strategy {
                ExecutionStrategy::Sequential => self.options.sequential_interval,
                ExecutionStrategy::Parallel { .. } => self.options.parallel_interval,
            });

            tracing::info!(
                "Stage {}/{} '{}': {} ({} candidates, {:?})",
                index + 1,
                stages.len(),
                stage.name(),
                stage.shape(),
                stage.candidate_count(),
                strategy
            );

            let ctx = PoolContext {
                oracle: self.oracle.as_ref(),
                progress: &progress,
                interrupt: &self.interrupt,
            };

            let covered = covering_stages(self.options.tried_policy, &stages[..index]);
            let outcome = if stage.records_tried() {
                SequentialExecutor::execute(stage.candidates(), ctx, |candidate| {
                    self.tried.insert(candidate);
                })
            } else if stage.skips_tried() && !(self.tried.is_empty() && covered.is_empty()) {
                let tried = &self.tried;
                let candidates = stage.candidates().filter(move |c| {
                    !tried.contains(c) && !covered.iter().any(|earlier| earlier.contains(c))
                });
                strategy.execute(candidates, ctx, self.options.tuning)?
            } else {
                strategy.execute(stage.candidates(), ctx, self.options.tuning)?
            };

            match outcome {
                PoolOutcome::Found(password) => {
                    enter(&mut self.state, SearchState::Success);
                    let attempts = progress.attempts();
                    tracing::info!(
                        "Password found in stage '{}' after {} attempts",
                        stage.name(),
                        attempts
                    );
                    self.sink.save(&password)?;
                    return Ok(SearchResult::found(
                        password,
                        stage.name(),
                        attempts,
                        progress.elapsed(),
                    ));
                }
                PoolOutcome::Interrupted => {
                    enter(&mut self.state, SearchState::Interrupted);
                    tracing::warn!(
                        "Search interrupted during stage '{}' after {} attempts",
                        stage.name(),
                        progress.attempts()
                    );
                    return Err(CrackError::Interrupted);
                }
                PoolOutcome::Exhausted => {
                    tracing::debug!(
                        "Stage '{}' exhausted ({} attempts so far)",
                        stage.name(),
                        progress.attempts()
                    );
                }
            }
        }

        enter(&mut self.state, SearchState::Exhausted);
        let attempts = progress.attempts();
        tracing::info!("All stages exhausted after {} attempts", attempts);
        Ok(SearchResult::exhausted(attempts, progress.elapsed()))
    }
}

fn enter(state: &mut SearchState, next: SearchState) {
    tracing::debug!("Search state {:?} -> {:?}", state, next);
    *state = next;
}

/// Earlier stages whose shapes a skipping stage filters out by membership.
///
/// Recording stages are already in the tried set, so only the others are
/// listed, and only under [`TriedPolicy::AllStages`].
fn covering_stages(policy: TriedPolicy, earlier: &[Stage]) -> Vec<&Stage> {
    match policy {
        TriedPolicy::SequentialOnly => Vec::new(),
        TriedPolicy::AllStages => earlier.iter().filter(|stage| !stage.records_tried()).collect(),
    }
}

/// Recording stages need in-order bookkeeping and always run on the calling thread
fn strategy_for(options: &SearchOptions, stage: &Stage) -> ExecutionStrategy {
    if stage.records_tried() || stage.mode() == StageMode::Sequential {
        return ExecutionStrategy::Sequential;
    }

    match options.mode {
        ExecutionMode::Sequential => ExecutionStrategy::Sequential,
        ExecutionMode::Parallel => ExecutionStrategy::Parallel {
            workers: options.workers,
        },
        ExecutionMode::Auto => ExecutionStrategy::auto(
            stage.candidate_count(),
            options.min_candidates_for_parallel,
            options.workers,
        ),
    }
}
