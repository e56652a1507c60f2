use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Callback receiving periodic status snapshots
pub type ProgressReporter = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Point-in-time view of the attempt counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub attempts: u64,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Attempts per second since the search started
    pub fn rate(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.attempts as f64 / seconds
    }
}

impl std::fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempts, {:.2}s elapsed ({:.0}/s)",
            self.attempts,
            self.elapsed.as_secs_f64(),
            self.rate()
        )
    }
}

/// Attempt counter shared by every worker of a search.
///
/// The counter only ever grows: one increment per completed attempt, whatever
/// the outcome. Every `report_interval` attempts a status line goes to the
/// reporter, or to `tracing` when none is installed. Reporting is purely
/// observational.
pub struct ProgressTracker {
    attempts: AtomicU64,
    started: Instant,
    report_interval: AtomicU64,
    reporter: Option<ProgressReporter>,
}

impl ProgressTracker {
    pub fn new(report_interval: u64) -> Self {
        Self {
            attempts: AtomicU64::new(0),
            started: Instant::now(),
            report_interval: AtomicU64::new(report_interval),
            reporter: None,
        }
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Change the cadence, e.g. when moving between parallel and sequential stages.
    /// Zero disables status lines.
    pub fn set_report_interval(&self, interval: u64) {
        self.report_interval.store(interval, Ordering::Relaxed);
    }

    /// Count one finished attempt and return the new total
    pub fn record_attempt(&self) -> u64 {
        let current = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let interval = self.report_interval.load(Ordering::Relaxed);
        if interval > 0 && current % interval == 0 {
            self.report(current);
        }
        current
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            attempts: self.attempts(),
            elapsed: self.elapsed(),
        }
    }

    fn report(&self, attempts: u64) {
        let snapshot = ProgressSnapshot {
            attempts,
            elapsed: self.elapsed(),
        };
        match &self.reporter {
            Some(reporter) => reporter(&snapshot),
            None => tracing::info!("{snapshot}"),
        }
    }
}
