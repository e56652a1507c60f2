//! Staged search orchestration
//!
//! [`SearchCoordinator`] walks a [`StagePlan`](crate::plan::StagePlan) stage
//! by stage, hands each stage's generator to the worker pool and stops at the
//! first password. [`TriedSet`] lets later stages skip candidates that earlier
//! stages already tested.

pub mod coordinator;
pub mod result;
pub mod tried;

pub use coordinator::{SearchCoordinator, SearchOptions, SearchState};
pub use result::SearchResult;
pub use tried::{TriedPolicy, TriedSet};
