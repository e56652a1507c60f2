//! Typed view of the merged configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::candidates::AlphabetSpec;
use crate::search::TriedPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub search: SearchSettings,
    pub progress: ProgressSettings,
    pub output: OutputSettings,

    /// Custom stage plan; empty means the built-in reference plan
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    pub length: usize,
    pub workers: usize,
    pub thread_percentage: u8,
    pub chunk_size: usize,
    pub channel_buffer_multiplier: usize,
    pub mode: ExecutionMode,
    pub min_candidates_for_parallel: u64,
    pub tried_policy: TriedPolicy,
    pub exhaustive_alphabet: AlphabetSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSettings {
    pub parallel_interval: u64,
    pub sequential_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    pub password_file: PathBuf,
}

/// How stages marked parallel are actually executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Parallel for stages above `min_candidates_for_parallel`
    Auto,
    /// Always use the worker pool for parallel stages
    Parallel,
    /// Run every stage on the calling thread
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    pub name: String,
    pub segments: Vec<SegmentSpec>,
    #[serde(default)]
    pub sequential: bool,
    #[serde(default)]
    pub record_tried: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub alphabet: AlphabetSpec,
    pub length: usize,
}
