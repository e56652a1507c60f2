use serde::Serialize;
use std::time::Duration;

/// Outcome of a search that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub found: bool,
    /// Present exactly when `found` is true
    pub password: Option<String>,
    /// Completed oracle attempts across all stages
    pub attempts: u64,
    pub elapsed: Duration,
    /// Stage that produced the password
    pub stage: Option<String>,
}

impl SearchResult {
    pub(crate) fn found(password: String, stage: &str, attempts: u64, elapsed: Duration) -> Self {
        Self {
            found: true,
            password: Some(password),
            attempts,
            elapsed,
            stage: Some(stage.to_string()),
        }
    }

    pub(crate) fn exhausted(attempts: u64, elapsed: Duration) -> Self {
        Self {
            found: false,
            password: None,
            attempts,
            elapsed,
            stage: None,
        }
    }

    pub fn rate(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.attempts as f64 / seconds
    }
}
