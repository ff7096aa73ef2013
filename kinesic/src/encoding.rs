//! Relation encodings: how a pair of joint positions becomes a comparable
//! vector.
//!
//! Provides:
//! - `EncodingKind`: the four encoding formulas
//! - `EncodingSet`: bitmask selecting which encodings a config computes
//! - `Encoding`: one computed encoding (kind + vector)
//! - `encode_pair`: compute every selected encoding for a joint pair
//!
//! Each kind folds a pair of positions into a single `Vec3` so that
//! "close enough" and "between" reduce to the per-axis vector comparisons
//! in [`crate::vec3`].  A step stores one `Encoding` per selected kind and
//! matches only when every one of them agrees.

use std::fmt;
use std::ops::BitOr;

use crate::vec3::Vec3;

// ── EncodingKind ───────────────────────────────────────────

/// One way of folding a joint-pair relation into a `Vec3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodingKind {
    /// Cross product of the two unit position vectors.  Captures relative
    /// orientation; insensitive to distance from the origin.
    CrossProduct,
    /// Unit vector of the positional difference `a - b`.  Captures the
    /// direction from one joint to the other.
    UnitDifference,
    /// Per-axis sign of `a - b`, with a dead zone of `scalar_epsilon`
    /// around zero.  Components are exactly -1, 0, or 1.
    Grid,
    /// Planar angles of the difference `d = a - b`: `atan2` in the xy,
    /// xz, and yz planes.
    PlanarAngle,
}

impl EncodingKind {
    /// Every kind, in canonical order.
    ///
    /// This order also fixes the layout of a step's encoding list, so two
    /// steps built from the same `EncodingSet` line up index by index.
    pub const ALL: [EncodingKind; 4] = [
        EncodingKind::CrossProduct,
        EncodingKind::UnitDifference,
        EncodingKind::Grid,
        EncodingKind::PlanarAngle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingKind::CrossProduct => "cross-product",
            EncodingKind::UnitDifference => "unit-difference",
            EncodingKind::Grid => "grid",
            EncodingKind::PlanarAngle => "planar-angle",
        }
    }

    pub fn from_str(s: &str) -> Option<EncodingKind> {
        EncodingKind::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// This kind's bit in an `EncodingSet`.
    pub const fn bit(&self) -> u8 {
        match self {
            EncodingKind::CrossProduct => 0b0001,
            EncodingKind::UnitDifference => 0b0010,
            EncodingKind::Grid => 0b0100,
            EncodingKind::PlanarAngle => 0b1000,
        }
    }

    /// Compute this encoding for the positions of a joint pair.
    ///
    /// `scalar_epsilon` is only consulted by `Grid` (the dead-zone width);
    /// the other kinds ignore it.
    pub fn encode(&self, a: Vec3, b: Vec3, scalar_epsilon: f32) -> Vec3 {
        match self {
            EncodingKind::CrossProduct => a.unit().cross(b.unit()),
            EncodingKind::UnitDifference => (a - b).unit(),
            EncodingKind::Grid => {
                let d = a - b;
                Vec3::new(
                    grid_axis(d.x, scalar_epsilon),
                    grid_axis(d.y, scalar_epsilon),
                    grid_axis(d.z, scalar_epsilon),
                )
            }
            EncodingKind::PlanarAngle => {
                let d = a - b;
                Vec3::new(d.y.atan2(d.x), d.z.atan2(d.x), d.z.atan2(d.y))
            }
        }
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sign of one grid axis, with the dead zone applied.
fn grid_axis(d: f32, scalar_epsilon: f32) -> f32 {
    if d.abs() <= scalar_epsilon {
        0.0
    } else if d > 0.0 {
        1.0
    } else {
        -1.0
    }
}

// ── EncodingSet ────────────────────────────────────────────

/// Bitmask of encoding kinds.
///
/// A config carries one of these; every step built under that config
/// computes exactly the selected kinds, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodingSet(u8);

impl EncodingSet {
    pub const EMPTY: EncodingSet = EncodingSet(0);
    pub const CROSS_PRODUCT: EncodingSet = EncodingSet(0b0001);
    pub const UNIT_DIFFERENCE: EncodingSet = EncodingSet(0b0010);
    pub const GRID: EncodingSet = EncodingSet(0b0100);
    pub const PLANAR_ANGLE: EncodingSet = EncodingSet(0b1000);
    pub const ALL: EncodingSet = EncodingSet(0b1111);

    pub const fn contains(&self, kind: EncodingKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// This set plus one more kind.
    pub const fn with(&self, kind: EncodingKind) -> EncodingSet {
        EncodingSet(self.0 | kind.bit())
    }

    /// Selected kinds, in canonical order.
    pub fn kinds(&self) -> impl Iterator<Item = EncodingKind> + '_ {
        EncodingKind::ALL.into_iter().filter(|k| self.contains(*k))
    }

    /// Bits set here that name no known kind.
    ///
    /// Always zero for sets composed from the named constants; a nonzero
    /// value can only arrive from outside the crate, e.g. a stored file
    /// written by a corrupted or newer producer, and fails validation.
    pub const fn unknown_bits(&self) -> u8 {
        self.0 & !EncodingSet::ALL.0
    }

    /// Number of known kinds selected.
    pub fn len(&self) -> usize {
        (self.0 & EncodingSet::ALL.0).count_ones() as usize
    }

    /// True iff no known kind is selected.
    pub fn is_empty(&self) -> bool {
        self.0 & EncodingSet::ALL.0 == 0
    }
}

impl Default for EncodingSet {
    fn default() -> Self {
        EncodingSet::CROSS_PRODUCT
    }
}

impl BitOr for EncodingSet {
    type Output = EncodingSet;

    fn bitor(self, other: EncodingSet) -> EncodingSet {
        EncodingSet(self.0 | other.0)
    }
}

// ── Encoding ───────────────────────────────────────────────

/// One computed encoding of a joint-pair relation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encoding {
    pub kind: EncodingKind,
    pub vector: Vec3,
}

impl Encoding {
    pub const fn new(kind: EncodingKind, vector: Vec3) -> Self {
        Self { kind, vector }
    }
}

/// Compute every encoding selected in `kinds` for the positions `a`, `b`.
///
/// Output order is canonical (see `EncodingKind::ALL`), so results from
/// the same set are directly comparable element by element.
pub fn encode_pair(a: Vec3, b: Vec3, kinds: EncodingSet, scalar_epsilon: f32) -> Vec<Encoding> {
    kinds
        .kinds()
        .map(|kind| Encoding::new(kind, kind.encode(a, b, scalar_epsilon)))
        .collect()
}

// ── Tests ──────────────────────────────────────────────────
