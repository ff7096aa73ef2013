//! Construction-time errors.
//!
//! Everything that can go wrong is rejected while a config or sequence is
//! being built or loaded.  Steady-state matching never errors: missing
//! joints and out-of-tolerance input are ordinary non-matches that reset
//! progress, not failures of the API.

use thiserror::Error;

use crate::encoding::EncodingKind;

#[derive(Debug, Error)]
pub enum BuildError {
    /// A tolerance was non-finite, non-positive, or above its cap.
    #[error("{name} must be finite, positive, and at most {max} (got {value})")]
    ToleranceOutOfRange {
        name: &'static str,
        value: f32,
        max: f32,
    },

    /// The config selects no encodings, so no step could ever match.
    #[error("encoding set is empty; select at least one encoding")]
    EmptyEncodingSet,

    /// The config's encoding set carries bits that name no known kind.
    #[error("encoding set contains unknown encoding bits ({bits:#07b})")]
    UnknownEncodingBits { bits: u8 },

    /// The final step is marked concurrent with a step that does not exist.
    #[error("last step cannot be concurrent with a following step")]
    TrailingConcurrentStep,

    /// `concurrent_with_next` was requested before any step was added.
    #[error("no step to mark concurrent; add a step first")]
    ConcurrentMarkWithoutStep,

    /// A loaded step's encodings do not line up with the config's set.
    #[error("step encodings {found:?} do not match configured set {expected:?}")]
    EncodingMismatch {
        expected: Vec<EncodingKind>,
        found: Vec<EncodingKind>,
    },

    /// A loaded step's back-link points at a later step, or at a step for
    /// a different joint pair.
    #[error("step {index} has an invalid previous-step link")]
    InvalidBackLink { index: usize },
}

pub type Result<T> = std::result::Result<T, BuildError>;
