//! Skeleton joints, joint pairs, and per-tick position lookup.
//!
//! Provides:
//! - `Joint`: the tracked skeleton joints, with stable string names
//! - `JointPair`: an ordered pair of joints whose relation a step encodes
//! - `JointSource`: the per-tick position lookup the matcher polls
//! - `JointFrame`: a simple owned snapshot implementing `JointSource`

use std::collections::HashMap;
use std::fmt;

use crate::vec3::Vec3;

/// Number of joints in the tracked skeleton.
pub const JOINT_COUNT: usize = 15;

// ── Joint ──────────────────────────────────────────────────

/// A tracked skeleton joint.
///
/// The set mirrors a typical upper/lower body tracker: head and spine,
/// then shoulder/elbow/hand and hip/knee/foot chains per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Joint {
    Head,
    Neck,
    Torso,
    LeftShoulder,
    LeftElbow,
    LeftHand,
    RightShoulder,
    RightElbow,
    RightHand,
    LeftHip,
    LeftKnee,
    LeftFoot,
    RightHip,
    RightKnee,
    RightFoot,
}

impl Joint {
    /// Every joint, in skeleton order.
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Head,
        Joint::Neck,
        Joint::Torso,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftHand,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightHand,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftFoot,
        Joint::RightHip,
        Joint::RightKnee,
        Joint::RightFoot,
    ];

    /// Stable kebab-case name, used in logs and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Joint::Head => "head",
            Joint::Neck => "neck",
            Joint::Torso => "torso",
            Joint::LeftShoulder => "left-shoulder",
            Joint::LeftElbow => "left-elbow",
            Joint::LeftHand => "left-hand",
            Joint::RightShoulder => "right-shoulder",
            Joint::RightElbow => "right-elbow",
            Joint::RightHand => "right-hand",
            Joint::LeftHip => "left-hip",
            Joint::LeftKnee => "left-knee",
            Joint::LeftFoot => "left-foot",
            Joint::RightHip => "right-hip",
            Joint::RightKnee => "right-knee",
            Joint::RightFoot => "right-foot",
        }
    }

    /// Parse a joint from its `as_str` name.
    pub fn from_str(s: &str) -> Option<Joint> {
        Joint::ALL.iter().copied().find(|j| j.as_str() == s)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── JointPair ──────────────────────────────────────────────

/// An ordered pair of joints.
///
/// Order matters: the relation a step encodes runs from `first` to
/// `second`, and swapping them flips every encoding.  Two pairs with the
/// same joints in opposite order are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointPair {
    pub first: Joint,
    pub second: Joint,
}

impl JointPair {
    pub const fn new(first: Joint, second: Joint) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for JointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.first, self.second)
    }
}

// ── JointSource ────────────────────────────────────────────

/// Per-tick joint position lookup.
///
/// The matcher polls this once per `advance` call.  Returning `None` for
/// a joint means the tracker lost it this tick; any step needing that
/// joint fails to match (and the sequence pointer resets), but nothing
/// errors.
pub trait JointSource {
    fn position(&self, joint: Joint) -> Option<Vec3>;
}

impl JointSource for HashMap<Joint, Vec3> {
    fn position(&self, joint: Joint) -> Option<Vec3> {
        self.get(&joint).copied()
    }
}

// ── JointFrame ─────────────────────────────────────────────

/// An owned snapshot of joint positions for one tick.
///
/// Useful when the caller assembles positions incrementally (e.g. from a
/// tracker callback) before handing the frame to the matcher.  Joints
/// never inserted read back as `None`.
#[derive(Debug, Clone, Default)]
pub struct JointFrame {
    positions: HashMap<Joint, Vec3>,
}

impl JointFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) one joint's position for this tick.
    pub fn insert(&mut self, joint: Joint, position: Vec3) {
        self.positions.insert(joint, position);
    }

    pub fn get(&self, joint: Joint) -> Option<Vec3> {
        self.positions.get(&joint).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Drop all positions, keeping the allocation for the next tick.
    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

impl JointSource for JointFrame {
    fn position(&self, joint: Joint) -> Option<Vec3> {
        self.get(joint)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_name_round_trip() {
        for joint in Joint::ALL {
            let parsed = Joint::from_str(joint.as_str());
            assert_eq!(parsed, Some(joint), "round trip failed for {joint:?}");
        }
    }

    #[test]
    fn test_joint_from_str_unknown() {
        assert_eq!(Joint::from_str("left-wing"), None);
        assert_eq!(Joint::from_str(""), None);
    }

    #[test]
    fn test_joint_all_distinct() {
        for (i, a) in Joint::ALL.iter().enumerate() {
            for b in &Joint::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_pair_order_matters() {
        let ab = JointPair::new(Joint::LeftHand, Joint::RightHand);
        let ba = JointPair::new(Joint::RightHand, Joint::LeftHand);
        assert_ne!(ab, ba);
        assert_eq!(ab.to_string(), "left-hand->right-hand");
    }

    #[test]
    fn test_frame_lookup() {
        let mut frame = JointFrame::new();
        frame.insert(Joint::Head, Vec3::new(0.0, 1.7, 0.0));
        assert_eq!(frame.position(Joint::Head), Some(Vec3::new(0.0, 1.7, 0.0)));
        assert_eq!(frame.position(Joint::LeftFoot), None);
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn test_frame_clear() {
        let mut frame = JointFrame::new();
        frame.insert(Joint::Torso, Vec3::ZERO);
        frame.clear();
        assert!(frame.is_empty());
        assert_eq!(frame.position(Joint::Torso), None);
    }

    #[test]
    fn test_hashmap_source() {
        let mut map = HashMap::new();
        map.insert(Joint::Neck, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(map.position(Joint::Neck), Some(Vec3::new(0.0, 1.5, 0.0)));
        assert_eq!(map.position(Joint::Head), None);
    }
}
