use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::Output;
use crate::config::{ExecutionMode, UnlatchConfig};
use crate::error::CrackError;
use crate::oracle::ZipOracle;
use crate::parallel::CancellationToken;
use crate::plan::StagePlan;
use crate::search::{SearchCoordinator, SearchOptions, TriedPolicy};
use crate::sink::FileSink;

#[derive(Args, Debug)]
pub struct CrackArgs {
    /// Encrypted ZIP archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Password length to search
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Worker threads for parallel stages (0 = derive from CPU cores)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Candidates handed to a worker at once
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// How parallel stages are executed
    #[arg(long, value_enum)]
    pub mode: Option<ExecutionMode>,

    /// Which stages feed the tried set used to skip repeats
    #[arg(long, value_enum)]
    pub tried_policy: Option<TriedPolicy>,

    /// File the recovered password is written to
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Flags given on the command line, layered over every other config source
#[derive(Serialize, Default)]
struct CliOverrides {
    search: SearchOverrides,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<OutputOverrides>,
}

#[derive(Serialize, Default)]
struct SearchOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<ExecutionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tried_policy: Option<TriedPolicy>,
}

#[derive(Serialize)]
struct OutputOverrides {
    password_file: PathBuf,
}

impl CrackArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            search: SearchOverrides {
                length: self.length,
                workers: self.workers,
                chunk_size: self.chunk_size,
                mode: self.mode,
                tried_policy: self.tried_policy,
            },
            output: self.output.clone().map(|password_file| OutputOverrides { password_file }),
        }
    }
}

pub async fn execute(args: CrackArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let config = UnlatchConfig::load(custom_config, Some(args.overrides()))?;
    let settings = config.settings()?;

    // A missing or unusable archive fails before any stage is planned
    let oracle = ZipOracle::open(&args.archive)?;
    let plan = StagePlan::from_settings(&settings)?;
    let options = SearchOptions::from_settings(&settings);
    let sink = FileSink::new(&settings.output.password_file);

    output.header("🔐 Password Recovery");
    output.key_value("Archive:", &args.archive.display().to_string(), false);
    output.key_value("Length:", &plan.length().to_string(), false);
    output.key_value(
        "Stages:",
        &format!("{} ({} candidates)", plan.len(), plan.total_candidates()),
        false,
    );
    output.key_value("Workers:", &options.workers.to_string(), false);
    output.blank_line();

    let interrupt = CancellationToken::new();
    let mut coordinator =
        SearchCoordinator::new(plan, Arc::new(oracle), Arc::new(sink), options)
            .with_interrupt(interrupt.clone());
    if let Some(reporter) = output.progress_reporter() {
        coordinator = coordinator.with_reporter(reporter);
    }

    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping workers");
            interrupt.cancel();
        }
    });

    let outcome = tokio::task::spawn_blocking(move || coordinator.run())
        .await
        .context("Search task failed")?;
    signal_task.abort();

    match outcome {
        Ok(result) => match result.password.as_deref() {
            Some(password) => {
                output.password(password);
                output.key_value(
                    "Stage:",
                    result.stage.as_deref().unwrap_or_default(),
                    false,
                );
                output.key_value("Attempts:", &result.attempts.to_string(), false);
                output.key_value(
                    "Elapsed:",
                    &format!("{:.2}s ({:.0}/s)", result.elapsed.as_secs_f64(), result.rate()),
                    false,
                );
                output.success(&format!(
                    "Saved to {}",
                    settings.output.password_file.display()
                ));
                Ok(())
            }
            None => {
                output.error(&format!(
                    "Password not found after {} attempts",
                    result.attempts
                ));
                anyhow::bail!("no candidate unlocked {}", args.archive.display())
            }
        },
        Err(CrackError::Interrupted) => {
            output.warning("Search interrupted, no password saved");
            Err(CrackError::Interrupted.into())
        }
        Err(e) => Err(e.into()),
    }
}
