//! Matching tolerances and encoding selection.

use crate::encoding::EncodingSet;
use crate::error::{BuildError, Result};

/// Upper bound for `vector_epsilon`.  Unit-sphere encodings span [-1, 1]
/// per axis, so anything above 2.0 would accept every vector.
pub const MAX_VECTOR_EPSILON: f32 = 2.0;

/// Upper bound for `scalar_epsilon` (the grid dead-zone half-width).
pub const MAX_SCALAR_EPSILON: f32 = 1.0;

// ── MatchConfig ────────────────────────────────────────────

/// Tunables shared by every step of a sequence.
///
/// A sequence captures its config at build time; steps recorded or
/// matched under it always use the same tolerances and the same encoding
/// set.  Sequences built from different configs are independent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchConfig {
    /// Per-axis tolerance for comparing encoding vectors.
    pub vector_epsilon: f32,
    /// Dead-zone half-width for the grid encoding's sign function.
    pub scalar_epsilon: f32,
    /// Which encodings each step computes and compares.
    pub encodings: EncodingSet,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            vector_epsilon: 0.1,
            scalar_epsilon: 0.02,
            encodings: EncodingSet::CROSS_PRODUCT,
        }
    }
}

impl MatchConfig {
    /// Build a validated config.
    pub fn new(vector_epsilon: f32, scalar_epsilon: f32, encodings: EncodingSet) -> Result<Self> {
        let config = Self {
            vector_epsilon,
            scalar_epsilon,
            encodings,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check tolerances and encoding selection.
    ///
    /// Called by every sequence constructor; a config that passes here
    /// can be matched against indefinitely without further checks.
    pub fn validate(&self) -> Result<()> {
        check_tolerance("vector_epsilon", self.vector_epsilon, MAX_VECTOR_EPSILON)?;
        check_tolerance("scalar_epsilon", self.scalar_epsilon, MAX_SCALAR_EPSILON)?;
        let unknown = self.encodings.unknown_bits();
        if unknown != 0 {
            return Err(BuildError::UnknownEncodingBits { bits: unknown });
        }
        if self.encodings.is_empty() {
            return Err(BuildError::EmptyEncodingSet);
        }
        Ok(())
    }
}

fn check_tolerance(name: &'static str, value: f32, max: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value > max {
        return Err(BuildError::ToleranceOutOfRange { name, value, max });
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────
