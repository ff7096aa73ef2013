//! Record a noisy arm sweep, compress it, and recognize a replay.
//!
//! Run with `cargo run --example sweep`.  Set `RUST_LOG=debug` to watch
//! the matcher's internal transitions.

use std::collections::HashMap;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use kinesic::{
    EncodingSet, GestureRecorder, GestureSet, Joint, JointPair, MatchConfig, Strategy, Vec3,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kinesic=debug".into()),
        )
        .init();

    let config = MatchConfig {
        encodings: EncodingSet::UNIT_DIFFERENCE,
        ..MatchConfig::default()
    };
    let pair = JointPair::new(Joint::RightHand, Joint::Torso);
    let torso = Vec3::new(0.0, 1.0, 0.0);
    let poses = [
        ("out", Vec3::new(0.6, 1.0, 0.0)),
        ("overhead", Vec3::new(0.0, 1.6, 0.0)),
        ("across", Vec3::new(-0.6, 1.0, 0.0)),
    ];

    // Record each pose for a handful of ticks with a shaky hand.
    let mut rng = StdRng::seed_from_u64(42);
    let mut recorder = GestureRecorder::new(config, vec![pair])?;
    for (name, pose) in poses {
        info!(pose = name, "holding");
        for _ in 0..8 {
            let hand = Vec3::new(
                pose.x + rng.gen_range(-0.005..0.005),
                pose.y + rng.gen_range(-0.005..0.005),
                pose.z,
            );
            recorder.record_frame(&frame(hand, torso));
        }
    }

    let mut sweep = recorder.finish();
    if let Some(stats) = sweep.simplify(Strategy::DoubleAverage) {
        info!(
            original = stats.original_len,
            reduced = stats.reduced_len,
            groups = stats.groups,
            "recording compressed"
        );
    }

    // Perform the gesture again and watch the set recognize it.
    let targets: Vec<Vec3> = sweep.steps().iter().map(|s| s.encodings[0].vector).collect();
    let mut set = GestureSet::new();
    let id = set.register("arm-sweep", sweep);
    for target in targets {
        let hand = torso + target;
        for done in set.advance_all(&frame(hand, torso)) {
            info!(name = set.name(done).unwrap_or("?"), "recognized");
            assert_eq!(done, id);
        }
    }

    Ok(())
}

fn frame(hand: Vec3, torso: Vec3) -> HashMap<Joint, Vec3> {
    [(Joint::RightHand, hand), (Joint::Torso, torso)]
        .into_iter()
        .collect()
}
