//! Temporal gesture recognition over 3D joint streams.
//!
//! A gesture is an ordered list of steps, each constraining one joint
//! pair's relative geometry.  Feeding joint positions to
//! [`GestureSequence::advance`] once per tick drives a progress pointer
//! through the steps: in-tolerance input advances it, in-between input
//! holds it, and anything else resets it to the start.  The call that
//! satisfies the final step reports completion.
//!
//! Gestures come from two places.  They can be built by hand with
//! [`SequenceBuilder`], or captured live with [`GestureRecorder`] and
//! then compressed by [`GestureSequence::simplify`], which collapses the
//! per-tick jitter of a recording into a handful of representative
//! steps.  [`GestureSet`] drives any number of gestures from one joint
//! stream.
//!
//! All matching runs against [`MatchConfig`] tolerances fixed when the
//! sequence is built; nothing in steady-state matching allocates global
//! state or returns errors.
//!
//! ```
//! use std::collections::HashMap;
//! use kinesic::{EncodingSet, GestureSequence, Joint, JointPair, MatchConfig, Vec3};
//!
//! # fn main() -> kinesic::Result<()> {
//! let config = MatchConfig {
//!     encodings: EncodingSet::UNIT_DIFFERENCE,
//!     ..MatchConfig::default()
//! };
//! // Right hand out from the torso, then raised above it.
//! let pair = JointPair::new(Joint::RightHand, Joint::Torso);
//! let mut raise = GestureSequence::builder(config)
//!     .step(pair, Vec3::new(0.5, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0))
//!     .step(pair, Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, 1.0, 0.0))
//!     .build()?;
//!
//! let mut frame = HashMap::new();
//! frame.insert(Joint::RightHand, Vec3::new(0.5, 1.0, 0.0));
//! frame.insert(Joint::Torso, Vec3::new(0.0, 1.0, 0.0));
//! assert!(!raise.advance(&frame));
//!
//! frame.insert(Joint::RightHand, Vec3::new(0.0, 1.6, 0.0));
//! assert!(raise.advance(&frame));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoding;
pub mod error;
pub mod joint;
pub mod recorder;
pub mod sequence;
pub mod set;
pub mod simplify;
pub mod step;
pub mod vec3;

pub use config::{MatchConfig, MAX_SCALAR_EPSILON, MAX_VECTOR_EPSILON};
pub use encoding::{encode_pair, Encoding, EncodingKind, EncodingSet};
pub use error::{BuildError, Result};
pub use joint::{Joint, JointFrame, JointPair, JointSource, JOINT_COUNT};
pub use recorder::GestureRecorder;
pub use sequence::{GestureSequence, SequenceBuilder, SequenceData};
pub use set::{GestureId, GestureSet};
pub use simplify::{SimplifyStats, Strategy};
pub use step::Step;
pub use vec3::Vec3;
