//! Recording compression: collapse runs of near-identical steps.
//!
//! Provides:
//! - `Strategy`: how aggressively to reduce a recorded sequence
//! - `SimplifyStats`: what a reduction pass did
//! - `GestureSequence::simplify`: the reduction entry point
//!
//! A recorder emits one step per tick, so a slow sweep becomes a dense
//! monotone drift and a held pose becomes jitter around one value.
//! Reduction partitions each same-pair chain into monotone in-tolerance
//! runs and keeps one representative per run.  Jitter reverses direction
//! constantly, which splits a held pose into many tiny runs; the
//! double-average strategy exists to merge those back together.  All
//! comparisons reuse the matcher's own tolerance, so a simplified
//! sequence accepts the motion it was recorded from.

use std::fmt;

use tracing::debug;

use crate::encoding::Encoding;
use crate::sequence::GestureSequence;
use crate::step::{encodings_about, encodings_bounded, Step};
use crate::vec3::Vec3;

// ── Strategy ───────────────────────────────────────────────

/// Reduction strategy for `GestureSequence::simplify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Leave the sequence untouched.
    None,
    /// Keep each run's oldest step verbatim.
    Simple,
    /// Replace each run with the componentwise mean of its members.
    Average,
    /// Average twice: after the first grouping pass, regroup the original
    /// steps around each run's mean and average the merged clusters.
    /// Collapses jitter that the first pass splits on direction reversals.
    DoubleAverage,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::None => "none",
            Strategy::Simple => "simple",
            Strategy::Average => "average",
            Strategy::DoubleAverage => "double-average",
        }
    }

    pub fn from_str(s: &str) -> Option<Strategy> {
        match s {
            "none" => Some(Strategy::None),
            "simple" => Some(Strategy::Simple),
            "average" => Some(Strategy::Average),
            "double-average" => Some(Strategy::DoubleAverage),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SimplifyStats ──────────────────────────────────────────

/// Outcome of one reduction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyStats {
    /// Step count before reduction.
    pub original_len: usize,
    /// Step count after reduction.
    pub reduced_len: usize,
    /// Groups formed by the first grouping pass.
    pub groups: usize,
}

// ── Reduction entry point ──────────────────────────────────

impl GestureSequence {
    /// Reduce this sequence in place, returning what was done.
    ///
    /// Returns `None` when there is nothing to do: the sequence is empty
    /// or the strategy is `Strategy::None`.  Otherwise the step list is
    /// replaced (even if the reduction kept every step), back-links are
    /// recomputed, and any partial matching progress is discarded.
    ///
    /// Output steps never carry concurrency flags.  Recorded sequences,
    /// the usual input, have none to begin with.
    ///
    /// Reduction is a single grouping pass.  Output is stable under
    /// reapplication while neighboring representatives sit farther apart
    /// than `vector_epsilon`; a sub-tolerance direction reversal can
    /// leave two representatives closer than that, and reapplying merges
    /// them.
    pub fn simplify(&mut self, strategy: Strategy) -> Option<SimplifyStats> {
        if self.is_empty() || strategy == Strategy::None {
            return None;
        }
        let epsilon = self.config().vector_epsilon;
        let groups = partition(self.steps(), epsilon);
        let reduced = match strategy {
            Strategy::None => return None,
            Strategy::Simple => simple_steps(self.steps(), &groups),
            Strategy::Average => average_steps(self.steps(), &groups),
            Strategy::DoubleAverage => double_average_steps(self.steps(), &groups, epsilon),
        };
        let stats = SimplifyStats {
            original_len: self.len(),
            reduced_len: reduced.len(),
            groups: groups.len(),
        };
        debug!(
            strategy = %strategy,
            original = stats.original_len,
            reduced = stats.reduced_len,
            groups = stats.groups,
            "sequence simplified"
        );
        self.replace_steps(reduced);
        Some(stats)
    }
}

// ── Grouping ───────────────────────────────────────────────

/// Oldest member of a group.  Walks run newest to oldest, so that is the
/// last index pushed.
fn oldest(members: &[usize]) -> usize {
    members[members.len() - 1]
}

/// Partition steps into monotone in-tolerance runs.
///
/// Scanning from the newest step, each unvisited step seeds a group and
/// walks backward along its same-pair chain.  A candidate joins while it
/// is within tolerance of the group's last-accepted member and, once the
/// group has two members, the last-accepted member lies between the
/// candidate and the member accepted before it.  The second condition
/// rejects direction reversals, which start a new group instead.  The
/// first rejected candidate closes the group without being consumed;
/// membership is never revisited, so groups are disjoint and exhaustive.
///
/// Returned groups list members newest first and are ordered by their
/// oldest member's original index, which is the order reduced steps keep.
fn partition(steps: &[Step], epsilon: f32) -> Vec<Vec<usize>> {
    let mut visited = vec![false; steps.len()];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for seed in (0..steps.len()).rev() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut members = vec![seed];
        let mut candidate = steps[seed].previous;
        while let Some(index) = candidate {
            if visited[index] {
                break;
            }
            let cand = &steps[index];
            let last = &steps[members[members.len() - 1]];
            if !encodings_about(&cand.encodings, &last.encodings, epsilon) {
                break;
            }
            if members.len() >= 2 {
                let before = &steps[members[members.len() - 2]];
                if !encodings_bounded(&last.encodings, &cand.encodings, &before.encodings) {
                    break;
                }
            }
            visited[index] = true;
            members.push(index);
            candidate = cand.previous;
        }
        groups.push(members);
    }
    groups.sort_by_key(|members| oldest(members));
    groups
}

// ── Strategies ─────────────────────────────────────────────

fn simple_steps(steps: &[Step], groups: &[Vec<usize>]) -> Vec<Step> {
    groups
        .iter()
        .map(|members| {
            let mut step = steps[oldest(members)].clone();
            step.previous = None;
            step.concurrent_with_next = false;
            step
        })
        .collect()
}

fn average_steps(steps: &[Step], groups: &[Vec<usize>]) -> Vec<Step> {
    groups
        .iter()
        .map(|members| averaged_step(steps, members))
        .collect()
}

/// One step whose encodings are the componentwise means over `members`.
///
/// Grid encodings may average to fractional values; that widens nothing,
/// since the mean of in-tolerance signs stays within the same tolerance
/// of each member.
fn averaged_step(steps: &[Step], members: &[usize]) -> Step {
    let template = &steps[members[0]];
    let encodings = (0..template.encodings.len())
        .map(|slot| {
            let vectors: Vec<Vec3> = members
                .iter()
                .map(|&index| steps[index].encodings[slot].vector)
                .collect();
            Encoding::new(template.encodings[slot].kind, Vec3::average(&vectors))
        })
        .collect();
    Step {
        pair: template.pair,
        encodings,
        previous: None,
        concurrent_with_next: false,
    }
}

/// The second pass of `Strategy::DoubleAverage`.
///
/// The original steps are walked again, but acceptance now compares each
/// candidate against a fixed anchor: the first-pass mean of the group the
/// cluster's seed belonged to, with no monotonicity requirement.  Jitter
/// the first pass scattered across neighboring groups rejoins here
/// whenever it stayed inside the anchor's tolerance ball.  Each final
/// cluster is then averaged over its original members, so denser runs
/// weigh more.
fn double_average_steps(steps: &[Step], groups: &[Vec<usize>], epsilon: f32) -> Vec<Step> {
    let averages: Vec<Step> = groups
        .iter()
        .map(|members| averaged_step(steps, members))
        .collect();
    let mut group_of = vec![0usize; steps.len()];
    for (group, members) in groups.iter().enumerate() {
        for &index in members {
            group_of[index] = group;
        }
    }

    let mut visited = vec![false; steps.len()];
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for seed in (0..steps.len()).rev() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let anchor = &averages[group_of[seed]].encodings;
        let mut members = vec![seed];
        let mut candidate = steps[seed].previous;
        while let Some(index) = candidate {
            if visited[index] {
                break;
            }
            if !encodings_about(&steps[index].encodings, anchor, epsilon) {
                break;
            }
            visited[index] = true;
            members.push(index);
            candidate = steps[index].previous;
        }
        clusters.push(members);
    }
    clusters.sort_by_key(|members| oldest(members));
    clusters
        .iter()
        .map(|members| averaged_step(steps, members))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────
