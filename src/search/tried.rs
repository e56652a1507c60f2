use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which stages feed the tried set.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TriedPolicy {
    /// Only stages that record tried candidates (the sequential digits stage
    /// of the built-in plan). Later skipping stages may retest candidates
    /// that parallel stages already covered.
    #[default]
    SequentialOnly,
    /// Skipping stages also drop candidates whose shape matches an earlier
    /// stage, so no candidate is tested twice. Only recording stages are stored.
    AllStages,
}

/// Candidates already tested during the current search
#[derive(Debug, Default)]
pub struct TriedSet {
    candidates: HashSet<String>,
}

impl TriedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the candidate was not present yet
    pub fn insert(&mut self, candidate: &str) -> bool {
        if self.candidates.contains(candidate) {
            return false;
        }
        self.candidates.insert(candidate.to_string())
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.candidates.contains(candidate)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl Extend<String> for TriedSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.candidates.extend(iter);
    }
}
