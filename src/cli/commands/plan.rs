use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::Output;
use crate::config::UnlatchConfig;
use crate::plan::{Stage, StageMode, StagePlan};

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Password length to plan for
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct LengthOverride {
    search: SearchLength,
}

#[derive(Serialize)]
struct SearchLength {
    length: usize,
}

#[derive(Serialize)]
struct StageSummary<'a> {
    name: &'a str,
    shape: String,
    mode: &'static str,
    record_tried: bool,
    skip_tried: bool,
    candidates: u64,
}

impl<'a> From<&'a Stage> for StageSummary<'a> {
    fn from(stage: &'a Stage) -> Self {
        Self {
            name: stage.name(),
            shape: stage.shape(),
            mode: mode_label(stage),
            record_tried: stage.records_tried(),
            skip_tried: stage.skips_tried(),
            candidates: stage.candidate_count(),
        }
    }
}

fn mode_label(stage: &Stage) -> &'static str {
    match (stage.mode(), stage.records_tried(), stage.skips_tried()) {
        (StageMode::Sequential, true, _) => "recording",
        (StageMode::Sequential, false, _) => "sequential",
        (StageMode::Parallel, _, true) => "skip-tried",
        (StageMode::Parallel, _, false) => "parallel",
    }
}

pub async fn execute(args: PlanArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let overrides = args.length.map(|length| LengthOverride {
        search: SearchLength { length },
    });
    let config = UnlatchConfig::load(custom_config, overrides)?;
    let plan = StagePlan::from_settings(&config.settings()?)?;

    if args.json {
        let stages: Vec<StageSummary> = plan.stages().iter().map(StageSummary::from).collect();
        let summary = serde_json::json!({
            "length": plan.length(),
            "stages": stages,
            "total_candidates": plan.total_candidates(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    output.header(&format!("Search plan for {}-character passwords", plan.length()));
    for (index, stage) in plan.stages().iter().enumerate() {
        output.stage_row(
            index + 1,
            stage.name(),
            &stage.shape(),
            mode_label(stage),
            stage.candidate_count(),
        );
    }
    output.blank_line();
    output.key_value("Total:", &plan.total_candidates().to_string(), true);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_labels() {
        let plan = StagePlan::reference(2).unwrap();
        let labels: Vec<&str> = plan.stages().iter().map(mode_label).collect();
        assert_eq!(
            labels,
            vec!["recording", "parallel", "parallel", "skip-tried"]
        );
    }
}
