//! Worker pool for testing candidates
//!
//! This module owns **execution**: threads, channels, cancellation and the
//! shared attempt counter. It knows nothing about stages, alphabets or
//! archives; callers hand it an iterator of candidates and a [`CrackOracle`].
//!
//! ```text
//!  generator ──▶ producer ──chunks──▶ ┌ worker 0 ┐
//!                (bounded channel)    │ worker 1 │──first success──▶ collector
//!                                     └ worker N ┘
//!                        cancel flag ◀──────────────────────────────┘
//! ```
//!
//! - [`ParallelExecutor`]: crossbeam scoped workers fed in chunks; the first
//!   success cancels the stage and every thread is joined before returning.
//! - [`SequentialExecutor`]: the same contract on the calling thread, with an
//!   in-order hook for tried-set bookkeeping.
//! - [`ExecutionStrategy`]: picks one of the two and sizes the pool.
//! - [`ProgressTracker`]: atomic attempt counter with periodic status lines.
//!
//! ```rust
//! use unlatch::parallel::{CancellationToken, ExecutionStrategy, PoolContext, PoolOutcome, PoolTuning, ProgressTracker};
//!
//! let oracle = |candidate: &str| candidate == "42";
//! let progress = ProgressTracker::new(0);
//! let interrupt = CancellationToken::new();
//! let ctx = PoolContext { oracle: &oracle, progress: &progress, interrupt: &interrupt };
//!
//! let candidates = (0..100).map(|n| n.to_string());
//! let outcome = ExecutionStrategy::Parallel { workers: 2 }
//!     .execute(candidates, ctx, PoolTuning::default())
//!     .unwrap();
//! assert_eq!(outcome, PoolOutcome::Found("42".to_string()));
//! ```
//!
//! [`CrackOracle`]: crate::oracle::CrackOracle

pub mod cancel;
pub mod core;
pub mod progress;

// Re-export main types for easier access
pub use self::core::{
    ExecutionStrategy, ParallelExecutor, PoolContext, PoolOutcome, PoolTuning, SequentialExecutor,
};
pub use cancel::CancellationToken;
pub use progress::{ProgressReporter, ProgressSnapshot, ProgressTracker};
