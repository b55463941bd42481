//! Randomized, non-overlapping episode starts.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::config::Config;
use crate::geometry::{Planar, Pose};

/// Initial poses for one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnResult {
    pub seeker: Pose,
    pub target: Pose,
    /// Target draws made, including the accepted one.
    pub attempts: u32,
    /// The retry budget ran out and the target went to the far corner.
    pub fallback_used: bool,
}

impl SpawnResult {
    pub fn separation(&self) -> f32 {
        self.seeker.planar_distance(&self.target)
    }
}

/// Draws seeker and target poses inside the arena.
///
/// The seeker gets a uniform position and heading. The target is redrawn
/// until it is at least `min_spawn_separation` away, at most
/// `spawn_retry_limit` times; after that it is placed on the arena corner
/// farthest from the seeker. Heights are taken from the arguments.
pub fn spawn<R: Rng + ?Sized>(
    config: &Config,
    rng: &mut R,
    seeker_height: f32,
    target_height: f32,
) -> SpawnResult {
    let h = config.half_size;
    let seeker = Pose::new(
        rng.gen_range(-h..=h),
        seeker_height,
        rng.gen_range(-h..=h),
        rng.gen_range(0.0..TAU),
    );

    for attempt in 1..=config.spawn_retry_limit {
        let candidate = Pose::new(rng.gen_range(-h..=h), target_height, rng.gen_range(-h..=h), 0.0);
        if seeker.planar_distance(&candidate) >= config.min_spawn_separation {
            return SpawnResult {
                seeker,
                target: candidate,
                attempts: attempt,
                fallback_used: false,
            };
        }
    }

    let corner = farthest_corner(seeker.position(), h);
    SpawnResult {
        seeker,
        target: Pose::new(corner.x, target_height, corner.z, 0.0),
        attempts: config.spawn_retry_limit,
        fallback_used: true,
    }
}

/// Corner of `[-h, h]²` farthest from `from`.
pub fn farthest_corner(from: Planar, h: f32) -> Planar {
    let x = if from.x >= 0.0 { -h } else { h };
    let z = if from.z >= 0.0 { -h } else { h };
    Planar::new(x, z)
}
