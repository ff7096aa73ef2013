//! Capture gestures from live joint input.
//!
//! Provides:
//! - `GestureRecorder`: appends one step per tracked pair per tick
//!
//! A recorder is the raw end of the pipeline: it encodes whatever the
//! tracker reports, one step per pair per call, and leaves compression to
//! [`GestureSequence::simplify`].  A recording session is therefore
//! record, finish, simplify, then match or persist.

use tracing::{info, trace, warn};

use crate::config::MatchConfig;
use crate::error::Result;
use crate::joint::{JointPair, JointSource};
use crate::sequence::GestureSequence;
use crate::step::Step;

// ── GestureRecorder ────────────────────────────────────────

/// Accumulates observed steps for a fixed set of joint pairs.
#[derive(Debug, Clone)]
pub struct GestureRecorder {
    config: MatchConfig,
    pairs: Vec<JointPair>,
    steps: Vec<Step>,
}

impl GestureRecorder {
    /// Start a recording session for the given pairs.
    ///
    /// An empty pair list is allowed but records nothing; it usually
    /// means the caller forgot to configure the tracker.
    pub fn new(config: MatchConfig, pairs: Vec<JointPair>) -> Result<Self> {
        config.validate()?;
        if pairs.is_empty() {
            warn!("recorder started with no joint pairs; nothing will be captured");
        }
        Ok(Self {
            config,
            pairs,
            steps: Vec::new(),
        })
    }

    /// Capture one tick of input and return how many steps were appended.
    ///
    /// Each tracked pair with both joints present contributes one step,
    /// in pair order, without concurrency flags.  Pairs with a missing
    /// joint are skipped this tick; a dropout never aborts the session.
    pub fn record_frame(&mut self, source: &impl JointSource) -> usize {
        let mut appended = 0;
        for &pair in &self.pairs {
            let (first, second) = match (
                source.position(pair.first),
                source.position(pair.second),
            ) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    trace!(pair = %pair, "joint missing, pair skipped this tick");
                    continue;
                }
            };
            self.steps.push(Step::observe(pair, first, second, &self.config));
            appended += 1;
        }
        appended
    }

    /// Steps captured so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn pairs(&self) -> &[JointPair] {
        &self.pairs
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// End the session and produce the recorded sequence.
    ///
    /// Back-links are computed here; the result is usually handed to
    /// `GestureSequence::simplify` before being matched against.
    pub fn finish(self) -> GestureSequence {
        info!(steps = self.steps.len(), pairs = self.pairs.len(), "recording finished");
        GestureSequence::from_parts(self.config, self.steps)
    }
}

// ── Tests ──────────────────────────────────────────────────
