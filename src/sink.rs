//! Where a recovered password goes

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{CrackError, Result};

/// Persists a recovered password. Called at most once per search.
pub trait ResultSink: Send + Sync {
    fn save(&self, password: &str) -> Result<()>;
}

/// Writes the password as a single line to a file, replacing any previous contents
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn save(&self, password: &str) -> Result<()> {
        std::fs::write(&self.path, format!("{password}\n")).map_err(|source| {
            CrackError::Persist {
                path: self.path.clone(),
                source,
            }
        })?;
        tracing::info!("Saved password to {}", self.path.display());
        Ok(())
    }
}

/// Keeps saved passwords in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every password saved so far, oldest first
    pub fn saved(&self) -> Vec<String> {
        match self.saved.lock() {
            Ok(saved) => saved.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ResultSink for MemorySink {
    fn save(&self, password: &str) -> Result<()> {
        let mut saved = match self.saved.lock() {
            Ok(saved) => saved,
            Err(poisoned) => poisoned.into_inner(),
        };
        saved.push(password.to_string());
        Ok(())
    }
}
