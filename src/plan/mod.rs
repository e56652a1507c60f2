//! Staged search plans
//!
//! A [`StagePlan`] is an ordered list of [`Stage`]s. Order encodes the search
//! heuristic: structured, human-plausible shapes first, the full exhaustive
//! space last. Stages never interleave; the coordinator finishes one before it
//! starts the next.
//!
//! # Reference plan
//!
//! For a target length `L` the built-in plan is:
//!
//! ```text
//! digits                      digits×L            sequential, records tried
//! letters{L-1}-digits1 … letters1-digits{L-1}     parallel
//! digits{L-1}-letters1 … digits1-letters{L-1}     parallel
//! exhaustive                  alphanumeric×L      parallel, skips tried
//! ```
//!
//! The exhaustive stage covers every string of length `L` over the
//! alphanumeric alphabet, so no candidate is unreachable whatever the earlier
//! stages contain.

use std::collections::HashSet;

use crate::candidates::{Alphabet, Odometer, Segment};
use crate::config::Settings;
use crate::error::{CrackError, Result};

pub const EXHAUSTIVE_STAGE: &str = "exhaustive";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMode {
    Parallel,
    Sequential,
}

#[derive(Debug, Clone)]
pub struct Stage {
    name: String,
    segments: Vec<Segment>,
    mode: StageMode,
    record_tried: bool,
    skip_tried: bool,
}

impl Stage {
    /// A parallel stage that neither records nor skips tried candidates.
    pub fn new(name: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            name: name.into(),
            segments,
            mode: StageMode::Parallel,
            record_tried: false,
            skip_tried: false,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.mode = StageMode::Sequential;
        self
    }

    /// Add every tested candidate to the tried set. Recording is ordered
    /// bookkeeping, so the stage also becomes sequential.
    pub fn recording_tried(mut self) -> Self {
        self.record_tried = true;
        self.mode = StageMode::Sequential;
        self
    }

    /// Skip candidates already in the tried set.
    pub fn skipping_tried(mut self) -> Self {
        self.skip_tried = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn mode(&self) -> StageMode {
        self.mode
    }

    pub fn records_tried(&self) -> bool {
        self.record_tried
    }

    pub fn skips_tried(&self) -> bool {
        self.skip_tried
    }

    /// Total characters per candidate
    pub fn length(&self) -> usize {
        self.segments.iter().map(|segment| segment.length).sum()
    }

    /// Fresh generator positioned at this stage's first candidate
    pub fn candidates(&self) -> Odometer {
        Odometer::new(&self.segments)
    }

    pub fn candidate_count(&self) -> u64 {
        Odometer::total(&self.segments).unwrap_or(u64::MAX)
    }

    pub fn contains(&self, candidate: &str) -> bool {
        Odometer::index_of(&self.segments, candidate).is_some()
    }

    /// Short human description of the shape, e.g. `lowercase×3 + digits×3`
    pub fn shape(&self) -> String {
        self.segments
            .iter()
            .map(|segment| format!("{}×{}", segment.alphabet, segment.length))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

#[derive(Debug, Clone)]
pub struct StagePlan {
    length: usize,
    stages: Vec<Stage>,
}

impl StagePlan {
    pub fn new(length: usize, stages: Vec<Stage>) -> Result<Self> {
        if length == 0 {
            return Err(CrackError::InvalidPlan("password length must be at least 1".to_string()));
        }
        if stages.is_empty() {
            return Err(CrackError::InvalidPlan("plan has no stages".to_string()));
        }

        let mut names = HashSet::new();
        for stage in &stages {
            if !names.insert(stage.name()) {
                return Err(CrackError::InvalidPlan(format!(
                    "stage name '{}' is used more than once",
                    stage.name()
                )));
            }
            if stage.segments().iter().any(|segment| segment.length == 0) {
                return Err(CrackError::InvalidPlan(format!(
                    "stage '{}' has an empty segment",
                    stage.name()
                )));
            }
            if stage.length() != length {
                return Err(CrackError::InvalidPlan(format!(
                    "stage '{}' produces {}-character candidates, expected {}",
                    stage.name(),
                    stage.length(),
                    length
                )));
            }
            if Odometer::total(stage.segments()).is_none() {
                return Err(CrackError::InvalidPlan(format!(
                    "stage '{}' has more candidates than can be counted",
                    stage.name()
                )));
            }
            if stage.records_tried() && stage.skips_tried() {
                return Err(CrackError::InvalidPlan(format!(
                    "stage '{}' cannot both record and skip tried candidates",
                    stage.name()
                )));
            }
        }

        Ok(Self { length, stages })
    }

    /// The built-in plan described in the module docs.
    pub fn reference(length: usize) -> Result<Self> {
        let letters = Alphabet::lowercase();
        let digits = Alphabet::digits();
        let mut stages = vec![
            Stage::new("digits", vec![Segment::new(digits.clone(), length)]).recording_tried(),
        ];

        for letter_count in (1..length).rev() {
            stages.push(Stage::new(
                format!("letters{}-digits{}", letter_count, length - letter_count),
                vec![
                    Segment::new(letters.clone(), letter_count),
                    Segment::new(digits.clone(), length - letter_count),
                ],
            ));
        }

        for digit_count in (1..length).rev() {
            stages.push(Stage::new(
                format!("digits{}-letters{}", digit_count, length - digit_count),
                vec![
                    Segment::new(digits.clone(), digit_count),
                    Segment::new(letters.clone(), length - digit_count),
                ],
            ));
        }

        stages.push(Self::exhaustive(Alphabet::alphanumeric(), length));
        Self::new(length, stages)
    }

    /// Plan from configuration: custom `[[stages]]` when present, otherwise the
    /// reference plan. The exhaustive stage always comes last.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let length = settings.search.length;
        let exhaustive_alphabet = settings.search.exhaustive_alphabet.resolve()?;

        if settings.stages.is_empty() {
            let mut plan = Self::reference(length)?;
            if exhaustive_alphabet != Alphabet::alphanumeric() {
                plan.stages.pop();
                plan.stages.push(Self::exhaustive(exhaustive_alphabet, length));
            }
            return Ok(plan);
        }

        let mut stages = Vec::with_capacity(settings.stages.len() + 1);
        for spec in &settings.stages {
            let segments = spec
                .segments
                .iter()
                .map(|segment| Ok(Segment::new(segment.alphabet.resolve()?, segment.length)))
                .collect::<Result<Vec<_>>>()?;

            let mut stage = Stage::new(spec.name.clone(), segments);
            if spec.sequential {
                stage = stage.sequential();
            }
            if spec.record_tried {
                stage = stage.recording_tried();
            }
            stages.push(stage);
        }
        stages.push(Self::exhaustive(exhaustive_alphabet, length));

        Self::new(length, stages)
    }

    fn exhaustive(alphabet: Alphabet, length: usize) -> Stage {
        Stage::new(EXHAUSTIVE_STAGE, vec![Segment::new(alphabet, length)]).skipping_tried()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sum of all stage sizes, counting overlaps once per stage
    pub fn total_candidates(&self) -> u64 {
        self.stages
            .iter()
            .fold(0u64, |acc, stage| acc.saturating_add(stage.candidate_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::AlphabetSpec;
    use crate::config::{SegmentSpec, StageSpec, UnlatchConfig};

    fn names(plan: &StagePlan) -> Vec<&str> {
        plan.stages().iter().map(|stage| stage.name()).collect()
    }

    #[test]
    fn test_reference_plan_order() {
        let plan = StagePlan::reference(3).unwrap();

        assert_eq!(
            names(&plan),
            vec![
                "digits",
                "letters2-digits1",
                "letters1-digits2",
                "digits2-letters1",
                "digits1-letters2",
                "exhaustive",
            ]
        );
        assert_eq!(plan.length(), 3);
    }

    #[test]
    fn test_reference_plan_flags() {
        let plan = StagePlan::reference(4).unwrap();
        let stages = plan.stages();

        assert!(stages[0].records_tried());
        assert_eq!(stages[0].mode(), StageMode::Sequential);

        for stage in &stages[1..stages.len() - 1] {
            assert_eq!(stage.mode(), StageMode::Parallel);
            assert!(!stage.records_tried());
            assert!(!stage.skips_tried());
        }

        let last = stages.last().unwrap();
        assert_eq!(last.name(), EXHAUSTIVE_STAGE);
        assert!(last.skips_tried());
        assert_eq!(last.candidate_count(), 36u64.pow(4));
    }

    #[test]
    fn test_reference_plan_stage_sizes() {
        let plan = StagePlan::reference(3).unwrap();
        let sizes: Vec<u64> = plan.stages().iter().map(Stage::candidate_count).collect();

        assert_eq!(sizes, vec![1000, 6760, 2600, 2600, 6760, 46656]);
        assert_eq!(plan.total_candidates(), 66376);
    }

    #[test]
    fn test_single_character_plan() {
        let plan = StagePlan::reference(1).unwrap();
        assert_eq!(names(&plan), vec!["digits", "exhaustive"]);
    }

    #[test]
    fn test_every_target_string_is_reachable() {
        let plan = StagePlan::reference(2).unwrap();
        let alphanumeric = Alphabet::alphanumeric();

        for first in alphanumeric.symbols() {
            for second in alphanumeric.symbols() {
                let candidate: String = [*first, *second].iter().collect();
                assert!(
                    plan.stages().iter().any(|stage| stage.contains(&candidate)),
                    "{candidate} is not covered by any stage"
                );
            }
        }
    }

    #[test]
    fn test_structured_stages_are_disjoint() {
        let plan = StagePlan::reference(3).unwrap();
        let structured = &plan.stages()[..plan.len() - 1];

        for (i, stage) in structured.iter().enumerate() {
            for candidate in stage.candidates() {
                let owners = structured.iter().filter(|other| other.contains(&candidate)).count();
                assert_eq!(owners, 1, "{candidate} from stage {i} appears in several stages");
            }
        }
    }

    #[test]
    fn test_plan_validation() {
        let digits = Alphabet::digits();

        assert!(StagePlan::new(0, vec![]).is_err());
        assert!(StagePlan::new(2, vec![]).is_err());

        let wrong_length = Stage::new("short", vec![Segment::new(digits.clone(), 1)]);
        assert!(StagePlan::new(2, vec![wrong_length]).is_err());

        let duplicate = vec![
            Stage::new("pin", vec![Segment::new(digits.clone(), 2)]),
            Stage::new("pin", vec![Segment::new(digits.clone(), 2)]),
        ];
        assert!(StagePlan::new(2, duplicate).is_err());

        let conflicting = Stage::new("both", vec![Segment::new(digits.clone(), 2)])
            .recording_tried()
            .skipping_tried();
        assert!(StagePlan::new(2, vec![conflicting]).is_err());

        let huge = Stage::new("huge", vec![Segment::new(Alphabet::alphanumeric(), 20)]);
        assert!(StagePlan::new(20, vec![huge]).is_err());
    }

    #[test]
    fn test_plan_from_custom_stages() {
        let mut settings = UnlatchConfig::defaults().settings().unwrap();
        settings.search.length = 4;
        settings.search.exhaustive_alphabet = AlphabetSpec::Digits;
        settings.stages = vec![StageSpec {
            name: "year".to_string(),
            segments: vec![
                SegmentSpec { alphabet: AlphabetSpec::Custom("12".to_string()), length: 1 },
                SegmentSpec { alphabet: AlphabetSpec::Digits, length: 3 },
            ],
            sequential: false,
            record_tried: true,
        }];

        let plan = StagePlan::from_settings(&settings).unwrap();

        assert_eq!(names(&plan), vec!["year", "exhaustive"]);
        assert!(plan.stages()[0].records_tried());
        assert_eq!(plan.stages()[0].mode(), StageMode::Sequential);
        assert_eq!(plan.stages()[0].candidate_count(), 2000);
        assert_eq!(plan.stages()[1].candidate_count(), 10_000);
    }

    #[test]
    fn test_plan_from_default_settings_is_reference() {
        let settings = UnlatchConfig::defaults().settings().unwrap();
        let plan = StagePlan::from_settings(&settings).unwrap();

        assert_eq!(plan.length(), 6);
        assert_eq!(names(&plan), names(&StagePlan::reference(6).unwrap()));
    }

    #[test]
    fn test_stage_shape_description() {
        let plan = StagePlan::reference(3).unwrap();
        assert_eq!(plan.stages()[1].shape(), "lowercase×2 + digits×1");
    }
}
