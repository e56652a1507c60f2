//! # unlatch - Staged password recovery for encrypted ZIP archives
//!
//! unlatch searches a fixed-length password space in stages, most likely
//! shapes first, and tests candidates on every CPU core.
//!
//! ## Architecture
//!
//! - **candidates**: alphabets and the mixed-radix odometer that enumerates them
//! - **plan**: ordered stages, from structured shapes to the exhaustive fallback
//! - **parallel**: chunked worker pool, sequential executor and progress counter
//! - **search**: the coordinator state machine and the tried-candidate set
//! - **oracle** / **sink**: what a candidate is tested against and where a
//!   found password goes
//!
//! ## Quick Start
//!
//! ```bash
//! # Recover a six character lowercase/digit password
//! unlatch crack emergency_storage_key.zip
//!
//! # Inspect the stages for a shorter password
//! unlatch plan --length 4
//! ```
//!
//! ## Library use
//!
//! ```rust
//! use std::sync::Arc;
//! use unlatch::{MemorySink, SearchCoordinator, SearchOptions, StagePlan};
//!
//! let plan = StagePlan::reference(3).unwrap();
//! let sink = Arc::new(MemorySink::new());
//! let oracle = Arc::new(|candidate: &str| candidate == "ab3");
//!
//! let mut search = SearchCoordinator::new(plan, oracle, sink.clone(), SearchOptions::default());
//! let result = search.run().unwrap();
//!
//! assert_eq!(result.password.as_deref(), Some("ab3"));
//! assert_eq!(result.stage.as_deref(), Some("letters2-digits1"));
//! assert_eq!(sink.saved(), vec!["ab3".to_string()]);
//! ```

pub mod candidates;
pub mod cli;
pub mod config;
pub mod error;
pub mod oracle;
pub mod parallel;
pub mod plan;
pub mod search;
pub mod sink;

pub use candidates::{Alphabet, AlphabetSpec, Odometer, Segment};
pub use cli::{Cli, Output};
pub use config::UnlatchConfig;
pub use error::{CrackError, Result};
pub use oracle::{CrackOracle, ZipOracle};
pub use plan::{Stage, StageMode, StagePlan};
pub use search::{SearchCoordinator, SearchOptions, SearchResult, SearchState, TriedPolicy, TriedSet};
pub use sink::{FileSink, MemorySink, ResultSink};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
