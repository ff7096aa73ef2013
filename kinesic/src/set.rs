//! Named gesture registry: one joint stream fanned out to many matchers.
//!
//! Provides:
//! - `GestureId`: stable handle for a registered gesture
//! - `GestureSet`: owns sequences and drives them all per tick
//!
//! A set is the integration surface for a tracker loop: register every
//! gesture once, then call `advance_all` each tick and act on whatever
//! completed.  Sequences progress independently, so overlapping gestures
//! can all be partway through at once.

use tracing::info;

use crate::joint::JointSource;
use crate::sequence::GestureSequence;

// ── GestureId ──────────────────────────────────────────────

/// Handle for a gesture registered in a `GestureSet`.
///
/// Ids are assigned in registration order and stay valid for the life of
/// the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GestureId(usize);

impl GestureId {
    /// Position of this gesture in registration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

// ── GestureSet ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct GestureSet {
    entries: Vec<Entry>,
}

#[derive(Debug)]
struct Entry {
    name: String,
    sequence: GestureSequence,
}

impl GestureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a gesture under a display name and return its handle.
    ///
    /// Names are labels for logs and callers, not keys: registering the
    /// same name twice yields two independent gestures.
    pub fn register(&mut self, name: impl Into<String>, sequence: GestureSequence) -> GestureId {
        let id = GestureId(self.entries.len());
        self.entries.push(Entry {
            name: name.into(),
            sequence,
        });
        id
    }

    /// Feed one tick of input to every gesture and collect the ids of
    /// those that completed on this call.
    pub fn advance_all(&mut self, source: &impl JointSource) -> Vec<GestureId> {
        let mut completed = Vec::new();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.sequence.advance(source) {
                info!(name = %entry.name, "gesture recognized");
                completed.push(GestureId(index));
            }
        }
        completed
    }

    /// Forget partial progress on every gesture, e.g. when tracking is
    /// reacquired after a dropout.
    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.sequence.reset();
        }
    }

    pub fn get(&self, id: GestureId) -> Option<&GestureSequence> {
        self.entries.get(id.0).map(|e| &e.sequence)
    }

    /// Mutable access, e.g. to simplify a gesture in place.
    pub fn get_mut(&mut self, id: GestureId) -> Option<&mut GestureSequence> {
        self.entries.get_mut(id.0).map(|e| &mut e.sequence)
    }

    pub fn name(&self, id: GestureId) -> Option<&str> {
        self.entries.get(id.0).map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered gestures in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (GestureId, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (GestureId(index), entry.name.as_str()))
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::config::MatchConfig;
    use crate::encoding::EncodingSet;
    use crate::joint::{Joint, JointPair};
    use crate::simplify::Strategy;
    use crate::vec3::Vec3;

    fn unit_diff_config() -> MatchConfig {
        MatchConfig {
            encodings: EncodingSet::UNIT_DIFFERENCE,
            ..MatchConfig::default()
        }
    }

    fn frame(positions: &[(Joint, Vec3)]) -> HashMap<Joint, Vec3> {
        positions.iter().copied().collect()
    }

    fn one_step_gesture(joint: Joint, target: Vec3) -> GestureSequence {
        GestureSequence::builder(unit_diff_config())
            .step(JointPair::new(joint, Joint::Torso), target, Vec3::ZERO)
            .build()
            .unwrap()
    }

    #[test]
    fn test_advance_all_reports_completions() {
        let mut set = GestureSet::new();
        let left_up = set.register(
            "left-up",
            one_step_gesture(Joint::LeftHand, Vec3::new(0.0, 1.0, 0.0)),
        );
        let right_up = set.register(
            "right-up",
            one_step_gesture(Joint::RightHand, Vec3::new(0.0, 1.0, 0.0)),
        );

        let left_only = frame(&[
            (Joint::LeftHand, Vec3::new(0.0, 1.0, 0.0)),
            (Joint::RightHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert_eq!(set.advance_all(&left_only), vec![left_up]);

        let both_up = frame(&[
            (Joint::LeftHand, Vec3::new(0.0, 1.0, 0.0)),
            (Joint::RightHand, Vec3::new(0.0, 1.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert_eq!(set.advance_all(&both_up), vec![left_up, right_up]);
    }

    #[test]
    fn test_sequences_progress_independently() {
        let mut set = GestureSet::new();
        let sweep = set.register(
            "sweep",
            GestureSequence::builder(unit_diff_config())
                .step(
                    JointPair::new(Joint::LeftHand, Joint::Torso),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::ZERO,
                )
                .step(
                    JointPair::new(Joint::LeftHand, Joint::Torso),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::ZERO,
                )
                .build()
                .unwrap(),
        );
        set.register(
            "right-up",
            one_step_gesture(Joint::RightHand, Vec3::new(0.0, 1.0, 0.0)),
        );

        let side = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::RightHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        assert!(set.advance_all(&side).is_empty());
        assert_eq!(set.get(sweep).map(|s| s.progress()), Some(1));
    }

    #[test]
    fn test_reset_all() {
        let mut set = GestureSet::new();
        let sweep = set.register(
            "sweep",
            GestureSequence::builder(unit_diff_config())
                .step(
                    JointPair::new(Joint::LeftHand, Joint::Torso),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::ZERO,
                )
                .step(
                    JointPair::new(Joint::LeftHand, Joint::Torso),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::ZERO,
                )
                .build()
                .unwrap(),
        );
        let side = frame(&[
            (Joint::LeftHand, Vec3::new(1.0, 0.0, 0.0)),
            (Joint::Torso, Vec3::ZERO),
        ]);
        set.advance_all(&side);
        assert_eq!(set.get(sweep).map(|s| s.progress()), Some(1));

        set.reset_all();
        assert_eq!(set.get(sweep).map(|s| s.progress()), Some(0));
    }

    #[test]
    fn test_names_and_iteration() {
        let mut set = GestureSet::new();
        let a = set.register("wave", one_step_gesture(Joint::LeftHand, Vec3::new(0.0, 1.0, 0.0)));
        let b = set.register("point", one_step_gesture(Joint::RightHand, Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(set.name(a), Some("wave"));
        assert_eq!(set.name(b), Some("point"));
        assert_eq!(set.len(), 2);

        let names: Vec<_> = set.iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["wave", "point"]);
    }

    #[test]
    fn test_get_mut_allows_in_place_simplify() {
        let mut set = GestureSet::new();
        let id = set.register(
            "jittery",
            GestureSequence::builder(unit_diff_config())
                .step(
                    JointPair::new(Joint::LeftHand, Joint::Torso),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::ZERO,
                )
                .step(
                    JointPair::new(Joint::LeftHand, Joint::Torso),
                    Vec3::new(1.0, 0.05, 0.0),
                    Vec3::ZERO,
                )
                .build()
                .unwrap(),
        );
        let stats = set.get_mut(id).and_then(|s| s.simplify(Strategy::Simple));
        assert_eq!(stats.map(|s| s.reduced_len), Some(1));
        assert_eq!(set.get(id).map(|s| s.len()), Some(1));
    }
}
