//! Gesture sequences and the per-tick matching state machine.
//!
//! Provides:
//! - `GestureSequence`: an ordered step list plus a progress pointer
//! - `SequenceBuilder`: chained construction with validation at `build`
//! - `SequenceData`: the plain persistence form of a sequence
//!
//! Matching is poll-driven: the caller invokes [`GestureSequence::advance`]
//! once per tick with the current joint positions, and the sequence either
//! advances its pointer, holds in place, or resets to the start.  Only the
//! call that satisfies the final step reports completion; between calls
//! the pointer always sits on a step that is still to be matched.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::MatchConfig;
use crate::encoding::{encode_pair, Encoding, EncodingKind};
use crate::error::{BuildError, Result};
use crate::joint::{JointPair, JointSource};
use crate::step::{encodings_about, encodings_bounded, Step};
use crate::vec3::Vec3;

// ── Step evaluation ────────────────────────────────────────

/// Outcome of evaluating one step against one tick of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// The observation satisfies the step's target encodings.
    Matched,
    /// The observation sits between this step and its predecessor for the
    /// same pair: the motion is underway but not there yet.
    Hold,
    /// Out of corridor, or a needed joint is missing this tick.
    Failed,
}

// ── GestureSequence ────────────────────────────────────────

/// An ordered gesture: steps to satisfy, and how far the input has got.
///
/// The progress pointer counts satisfied steps, so it ranges over
/// `0..len` between calls; reaching `len` completes the gesture and
/// resets the pointer within the same call.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSequence {
    steps: Vec<Step>,
    progress: usize,
    config: MatchConfig,
}

impl GestureSequence {
    /// An empty sequence under the given config.
    ///
    /// Empty sequences are legal and simply never complete; steps usually
    /// arrive later via a recorder or `from_data`.
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            steps: Vec::new(),
            progress: 0,
            config,
        })
    }

    /// Start a chained builder under the given config.
    pub fn builder(config: MatchConfig) -> SequenceBuilder {
        SequenceBuilder::new(config)
    }

    /// Construct from already-validated parts.  Links are recomputed.
    pub(crate) fn from_parts(config: MatchConfig, mut steps: Vec<Step>) -> Self {
        link_previous(&mut steps);
        Self {
            steps,
            progress: 0,
            config,
        }
    }

    /// Swap in a new step list, relinking back-references and resetting
    /// progress.  Used when a simplification pass replaces the steps.
    pub(crate) fn replace_steps(&mut self, mut steps: Vec<Step>) {
        link_previous(&mut steps);
        self.steps = steps;
        self.progress = 0;
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps satisfied so far this run.
    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Forget any partial progress.
    pub fn reset(&mut self) {
        self.progress = 0;
    }

    /// Feed one tick of joint input and report whether the gesture
    /// completed on this call.
    ///
    /// The current step is evaluated, and while each satisfied step is
    /// flagged `concurrent_with_next` the following step is evaluated
    /// against the same tick.  A failed step resets progress to zero; a
    /// held step freezes progress at its value from the start of the call
    /// rather than leaving it partially advanced.  Completion resets
    /// progress and returns `true`; every other path returns `false`.
    ///
    /// Missing joints and out-of-tolerance input are absorbed here as
    /// ordinary non-matches.  Nothing in steady-state matching errors.
    pub fn advance(&mut self, source: &impl JointSource) -> bool {
        if self.steps.is_empty() {
            return false;
        }
        let hold_start = self.progress;
        let mut waiting = false;
        loop {
            match self.eval_step(self.progress, source) {
                StepOutcome::Failed => {
                    if self.progress > 0 {
                        debug!(progress = self.progress, "sequence reset");
                    }
                    self.progress = 0;
                    return false;
                }
                StepOutcome::Hold => {
                    waiting = true;
                    self.progress += 1;
                }
                StepOutcome::Matched => {
                    self.progress += 1;
                }
            }
            if self.progress >= self.steps.len()
                || !self.steps[self.progress - 1].concurrent_with_next
            {
                break;
            }
        }
        if waiting {
            // Freeze: a hold anywhere in the tick pins the pointer where
            // the tick began, even if other steps matched after it.
            self.progress = hold_start;
            trace!(progress = self.progress, "sequence holding");
        }
        if self.progress == self.steps.len() {
            debug!(steps = self.steps.len(), "sequence complete");
            self.progress = 0;
            return true;
        }
        false
    }

    /// Evaluate one step against the current tick.
    fn eval_step(&self, index: usize, source: &impl JointSource) -> StepOutcome {
        let step = &self.steps[index];
        let (first, second) = match (
            source.position(step.pair.first),
            source.position(step.pair.second),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => return StepOutcome::Failed,
        };
        let observed = encode_pair(
            first,
            second,
            self.config.encodings,
            self.config.scalar_epsilon,
        );
        if encodings_about(&observed, &step.encodings, self.config.vector_epsilon) {
            return StepOutcome::Matched;
        }
        if let Some(prev) = step.previous {
            if encodings_bounded(&observed, &step.encodings, &self.steps[prev].encodings) {
                return StepOutcome::Hold;
            }
        }
        StepOutcome::Failed
    }

    /// Snapshot this sequence into its persistence form.
    pub fn to_data(&self) -> SequenceData {
        SequenceData {
            config: self.config.clone(),
            steps: self.steps.clone(),
        }
    }

    /// Rebuild a sequence from its persistence form.
    ///
    /// Everything a stored file could get wrong is checked here: the
    /// config's tolerances, each step's encoding layout, the trailing
    /// concurrency flag, and every back-link (which must point at the
    /// nearest earlier step for the same pair).  Progress starts at zero.
    pub fn from_data(data: SequenceData) -> Result<Self> {
        data.config.validate()?;
        check_step_encodings(&data.steps, &data.config)?;
        check_trailing_concurrent(&data.steps)?;
        let mut last_seen: HashMap<JointPair, usize> = HashMap::new();
        for (index, step) in data.steps.iter().enumerate() {
            if step.previous != last_seen.get(&step.pair).copied() {
                return Err(BuildError::InvalidBackLink { index });
            }
            last_seen.insert(step.pair, index);
        }
        Ok(Self {
            steps: data.steps,
            progress: 0,
            config: data.config,
        })
    }
}

/// Point each step at the nearest earlier step for the same joint pair.
pub(crate) fn link_previous(steps: &mut [Step]) {
    let mut last_seen: HashMap<JointPair, usize> = HashMap::new();
    for (index, step) in steps.iter_mut().enumerate() {
        step.previous = last_seen.get(&step.pair).copied();
        last_seen.insert(step.pair, index);
    }
}

fn check_step_encodings(steps: &[Step], config: &MatchConfig) -> Result<()> {
    let expected: Vec<EncodingKind> = config.encodings.kinds().collect();
    for step in steps {
        let found: Vec<EncodingKind> = step.encodings.iter().map(|e| e.kind).collect();
        if found != expected {
            return Err(BuildError::EncodingMismatch {
                expected: expected.clone(),
                found,
            });
        }
    }
    Ok(())
}

fn check_trailing_concurrent(steps: &[Step]) -> Result<()> {
    if steps.last().is_some_and(|s| s.concurrent_with_next) {
        return Err(BuildError::TrailingConcurrentStep);
    }
    Ok(())
}

// ── SequenceBuilder ────────────────────────────────────────

/// Chained construction of a `GestureSequence`.
///
/// Steps are appended in gesture order; `concurrent_with_next` marks the
/// most recently added step.  All validation is deferred to `build`, so
/// the chain itself never fails midway.
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    config: MatchConfig,
    steps: Vec<Step>,
    marked_without_step: bool,
}

impl SequenceBuilder {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            steps: Vec::new(),
            marked_without_step: false,
        }
    }

    /// Append a step observed from two joint positions.
    pub fn step(mut self, pair: JointPair, first: Vec3, second: Vec3) -> Self {
        self.steps.push(Step::observe(pair, first, second, &self.config));
        self
    }

    /// Append a step with hand-authored encodings.
    ///
    /// The encodings must mirror the config's set; `build` rejects the
    /// sequence otherwise.
    pub fn step_encodings(mut self, pair: JointPair, encodings: Vec<Encoding>) -> Self {
        self.steps.push(Step::authored(pair, encodings));
        self
    }

    /// Mark the most recently added step as concurrent with the step that
    /// will follow it.
    pub fn concurrent_with_next(mut self) -> Self {
        match self.steps.last_mut() {
            Some(step) => step.concurrent_with_next = true,
            None => self.marked_without_step = true,
        }
        self
    }

    /// Validate and produce the sequence.
    pub fn build(self) -> Result<GestureSequence> {
        self.config.validate()?;
        if self.marked_without_step {
            return Err(BuildError::ConcurrentMarkWithoutStep);
        }
        check_trailing_concurrent(&self.steps)?;
        check_step_encodings(&self.steps, &self.config)?;
        Ok(GestureSequence::from_parts(self.config, self.steps))
    }
}

// ── SequenceData ───────────────────────────────────────────

/// The plain persistence form of a sequence: config plus step list, with
/// no progress state.  With the `serde` feature enabled this round-trips
/// through any serde format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceData {
    pub config: MatchConfig,
    pub steps: Vec<Step>,
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::EncodingSet;
    use crate::joint::Joint;

    fn unit_diff_config() -> MatchConfig {
        MatchConfig {
            encodings: EncodingSet::UNIT_DIFFERENCE,
            ..MatchConfig::default()
        }
    }

    fn left_pair() -> JointPair {
        JointPair::new(Joint::LeftHand, Joint::Torso)
    }

    fn right_pair() -> JointPair {
        JointPair::new(Joint::RightHand, Joint::Torso)
    }

    fn frame(positions: &[(Joint, Vec3)]) -> HashMap<Joint, Vec3> {
        positions.iter().copied().collect()
    }

    /// Left hand sweeping around the torso: first out to the side, then
    /// straight up.
    fn sweep_sequence() -> GestureSequence {
        GestureSequence::builder(unit_diff_config())
            .step(left_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .step(left_pair(), Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_sequence_never_completes() {
        let mut seq = GestureSequence::new(MatchConfig::default()).unwrap();
        let full = frame(&[(Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0))]);
        assert!(!seq.advance(&full));
        assert!(!seq.advance(&frame(&[])));
        assert_eq!(seq.progress(), 0);
    }

    #[test]
    fn test_completion_on_final_matching_call() {
        let mut seq = sweep_sequence();

        let side = frame(&[
            (Joint::LeftHand, Vec3::new(2.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(!seq.advance(&side), "first step alone must not complete");
        assert_eq!(seq.progress(), 1);

        let up = frame(&[
            (Joint::LeftHand, Vec3::new(0.0, 1.5, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(seq.advance(&up), "matching the final step completes");
        assert_eq!(seq.progress(), 0, "completion resets progress");
    }

    #[test]
    fn test_failure_resets_progress() {
        let mut seq = sweep_sequence();
        let side = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(!seq.advance(&side));
        assert_eq!(seq.progress(), 1);

        let behind = frame(&[
            (Joint::LeftHand, Vec3::new(0.0, 0.0, -1.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(!seq.advance(&behind));
        assert_eq!(seq.progress(), 0, "out-of-corridor input resets");
    }

    #[test]
    fn test_missing_joint_is_a_reset_not_an_error() {
        let mut seq = sweep_sequence();
        let side = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        seq.advance(&side);
        assert_eq!(seq.progress(), 1);

        // Torso dropped out this tick.
        let partial = frame(&[(Joint::LeftHand, Vec3::new(0.0, 1.0, 0.0))]);
        assert!(!seq.advance(&partial));
        assert_eq!(seq.progress(), 0);
    }

    #[test]
    fn test_hold_freezes_progress() {
        let mut seq = sweep_sequence();
        let side = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        seq.advance(&side);
        assert_eq!(seq.progress(), 1);

        // Halfway between "out to the side" and "straight up": inside the
        // corridor, not yet at the target.
        let diagonal = frame(&[
            (Joint::LeftHand, Vec3::new(0.7, 0.7, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        for _ in 0..5 {
            assert!(!seq.advance(&diagonal));
            assert_eq!(seq.progress(), 1, "holding input must not move progress");
        }

        let up = frame(&[
            (Joint::LeftHand, Vec3::new(0.0, 1.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(seq.advance(&up), "gesture still completes after the hold");
    }

    #[test]
    fn test_first_step_has_no_corridor() {
        // With nothing satisfied yet there is no predecessor to span a
        // corridor with, so an in-between observation is a plain miss.
        let mut seq = sweep_sequence();
        let diagonal = frame(&[
            (Joint::LeftHand, Vec3::new(0.7, 0.7, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(!seq.advance(&diagonal));
        assert_eq!(seq.progress(), 0);
    }

    #[test]
    fn test_concurrent_steps_complete_in_one_call() {
        let mut seq = GestureSequence::builder(unit_diff_config())
            .step(left_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .concurrent_with_next()
            .step(right_pair(), Vec3::new(-1.0, 0.0, 0.0), Vec3::ZERO)
            .build()
            .unwrap();

        let both_out = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::RightHand, Vec3::new(-1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(seq.advance(&both_out), "both steps satisfied in one tick");
        assert_eq!(seq.progress(), 0);
    }

    #[test]
    fn test_concurrent_group_fails_together() {
        let mut seq = GestureSequence::builder(unit_diff_config())
            .step(left_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .concurrent_with_next()
            .step(right_pair(), Vec3::new(-1.0, 0.0, 0.0), Vec3::ZERO)
            .build()
            .unwrap();

        // Left hand is in place but the right is nowhere near.
        let half = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::RightHand, Vec3::new(0.0, 1.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(!seq.advance(&half));
        assert_eq!(seq.progress(), 0, "partial concurrent match resets");
    }

    #[test]
    fn test_hold_inside_concurrent_group_freezes_at_tick_start() {
        // Right hand raises (step 0), then both hands move at once: left
        // out to the side while the right sweeps across.
        let mut seq = GestureSequence::builder(unit_diff_config())
            .step(right_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .step(left_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .concurrent_with_next()
            .step(right_pair(), Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO)
            .build()
            .unwrap();

        let start = frame(&[
            (Joint::RightHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(!seq.advance(&start));
        assert_eq!(seq.progress(), 1);

        // Left hand hits its mark, right hand is mid-sweep: the matched
        // step must not stick while its concurrent partner holds.
        let midway = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::RightHand, Vec3::new(0.7, 0.7, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(!seq.advance(&midway));
        assert_eq!(seq.progress(), 1, "hold pins progress at tick start");

        let done = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::RightHand, Vec3::new(0.0, 1.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(seq.advance(&done), "whole group satisfied in one tick");
    }

    #[test]
    fn test_reset_clears_partial_progress() {
        let mut seq = sweep_sequence();
        let side = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        seq.advance(&side);
        assert_eq!(seq.progress(), 1);
        seq.reset();
        assert_eq!(seq.progress(), 0);
    }

    #[test]
    fn test_links_point_at_nearest_same_pair_step() {
        let seq = GestureSequence::builder(unit_diff_config())
            .step(left_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .step(right_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .step(left_pair(), Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO)
            .build()
            .unwrap();
        let steps = seq.steps();
        assert_eq!(steps[0].previous, None);
        assert_eq!(steps[1].previous, None, "different pair starts its own chain");
        assert_eq!(steps[2].previous, Some(0), "skips the unrelated pair");
    }

    #[test]
    fn test_builder_rejects_trailing_concurrent() {
        let result = GestureSequence::builder(unit_diff_config())
            .step(left_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .concurrent_with_next()
            .build();
        match result {
            Err(BuildError::TrailingConcurrentStep) => {}
            other => panic!("Expected TrailingConcurrentStep, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_rejects_mark_without_step() {
        let result = GestureSequence::builder(unit_diff_config())
            .concurrent_with_next()
            .step(left_pair(), Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO)
            .build();
        match result {
            Err(BuildError::ConcurrentMarkWithoutStep) => {}
            other => panic!("Expected ConcurrentMarkWithoutStep, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_rejects_bad_authored_encodings() {
        let wrong_kind = vec![Encoding::new(EncodingKind::Grid, Vec3::ZERO)];
        let result = GestureSequence::builder(unit_diff_config())
            .step_encodings(left_pair(), wrong_kind)
            .build();
        match result {
            Err(BuildError::EncodingMismatch { .. }) => {}
            other => panic!("Expected EncodingMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_data_round_trip() {
        let seq = sweep_sequence();
        let data = seq.to_data();
        let restored = GestureSequence::from_data(data).unwrap();
        assert_eq!(restored.steps(), seq.steps());
        assert_eq!(restored.config(), seq.config());
        assert_eq!(restored.progress(), 0);
    }

    #[test]
    fn test_from_data_rejects_bad_link() {
        let mut data = sweep_sequence().to_data();
        data.steps[1].previous = None;
        match GestureSequence::from_data(data) {
            Err(BuildError::InvalidBackLink { index: 1 }) => {}
            other => panic!("Expected InvalidBackLink for step 1, got {other:?}"),
        }
    }

    #[test]
    fn test_from_data_rejects_forward_link() {
        let mut data = sweep_sequence().to_data();
        data.steps[0].previous = Some(1);
        match GestureSequence::from_data(data) {
            Err(BuildError::InvalidBackLink { index: 0 }) => {}
            other => panic!("Expected InvalidBackLink for step 0, got {other:?}"),
        }
    }

    #[test]
    fn test_from_data_rejects_bad_config() {
        let mut data = sweep_sequence().to_data();
        data.config.vector_epsilon = -1.0;
        assert!(GestureSequence::from_data(data).is_err());
    }

    #[test]
    fn test_from_data_rejects_trailing_concurrent() {
        let mut data = sweep_sequence().to_data();
        let last = data.steps.len() - 1;
        data.steps[last].concurrent_with_next = true;
        match GestureSequence::from_data(data) {
            Err(BuildError::TrailingConcurrentStep) => {}
            other => panic!("Expected TrailingConcurrentStep, got {other:?}"),
        }
    }
}
