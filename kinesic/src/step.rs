//! A single step of a gesture: one joint pair, one encoded relation.
//!
//! Steps live in their sequence's step list and refer to earlier steps by
//! index.  `previous` points at the most recent earlier step for the same
//! joint pair; the matcher walks that link to build the corridor an
//! in-between observation must stay inside.

use crate::config::MatchConfig;
use crate::encoding::{encode_pair, Encoding};
use crate::joint::JointPair;
use crate::vec3::Vec3;

// ── Step ───────────────────────────────────────────────────

/// One target relation in a gesture sequence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// The joint pair this step constrains.
    pub pair: JointPair,
    /// Target encodings, one per configured kind, in canonical order.
    pub encodings: Vec<Encoding>,
    /// Index of the nearest earlier step for the same pair, if any.
    pub previous: Option<usize>,
    /// Whether this step and the next must be satisfied in the same tick
    /// window.  Never set on the final step of a sequence.
    pub concurrent_with_next: bool,
}

impl Step {
    /// Build a step from two observed joint positions.
    ///
    /// Encodes the relation using the config's encoding set.  The
    /// back-link is left unset; sequences fill it in when the step list
    /// is assembled.
    pub fn observe(pair: JointPair, first: Vec3, second: Vec3, config: &MatchConfig) -> Self {
        Self {
            pair,
            encodings: encode_pair(first, second, config.encodings, config.scalar_epsilon),
            previous: None,
            concurrent_with_next: false,
        }
    }

    /// Build a step from hand-authored encodings.
    pub fn authored(pair: JointPair, encodings: Vec<Encoding>) -> Self {
        Self {
            pair,
            encodings,
            previous: None,
            concurrent_with_next: false,
        }
    }
}

// ── Encoding-list comparisons ──────────────────────────────

/// True iff every encoding in `observed` is within `epsilon` of its
/// counterpart in `target`.
///
/// Lists that differ in length or kind layout never compare equal.  Under
/// a single config both lists come from the same `EncodingSet`, so the
/// kind check only fires on malformed input.
pub(crate) fn encodings_about(observed: &[Encoding], target: &[Encoding], epsilon: f32) -> bool {
    observed.len() == target.len()
        && observed.iter().zip(target).all(|(o, t)| {
            o.kind == t.kind && o.vector.is_about(t.vector, epsilon)
        })
}

/// True iff every encoding in `observed` lies between its counterparts in
/// `a` and `b`, per axis.
pub(crate) fn encodings_bounded(observed: &[Encoding], a: &[Encoding], b: &[Encoding]) -> bool {
    observed.len() == a.len()
        && observed.len() == b.len()
        && observed
            .iter()
            .zip(a.iter().zip(b))
            .all(|(o, (ea, eb))| {
                o.kind == ea.kind
                    && o.kind == eb.kind
                    && o.vector.is_bounded_by(ea.vector, eb.vector)
            })
}

// ── Tests ──────────────────────────────────────────────────
