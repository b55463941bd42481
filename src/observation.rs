//! Fixed-size feature vector handed to a policy.
//!
//! Extended layout, in order:
//!
//! | index | feature                                   | range     |
//! |-------|-------------------------------------------|-----------|
//! | 0     | target.x − seeker.x, over half size       | `[-1, 1]` |
//! | 1     | target.z − seeker.z, over half size       | `[-1, 1]` |
//! | 2     | seeker forward.x                          | `[-1, 1]` |
//! | 3     | seeker forward.z                          | `[-1, 1]` |
//! | 4     | planar distance over half size            | `[0, 1]`  |
//! | 5     | signed bearing to the target over π       | `[-1, 1]` |
//!
//! The compact layout stops after index 3.

use std::f32::consts::PI;

use crate::config::{Config, ObservationLayout};
use crate::geometry::Pose;

pub type Observation = Vec<f32>;

pub fn encode(seeker: &Pose, target: Option<&Pose>, config: &Config) -> Observation {
    let forward = seeker.forward();
    let mut features = Vec::with_capacity(config.observation.size());

    let Some(target) = target else {
        features.extend([0.0, 0.0, forward.x, forward.z]);
        if config.observation == ObservationLayout::Extended {
            features.extend([0.0, 0.0]);
        }
        return features;
    };

    let h = config.half_size;
    let rel = target.position() - seeker.position();
    features.extend([
        (rel.x / h).clamp(-1.0, 1.0),
        (rel.z / h).clamp(-1.0, 1.0),
        forward.x,
        forward.z,
    ]);

    if config.observation == ObservationLayout::Extended {
        features.push((rel.length() / h).clamp(0.0, 1.0));
        features.push((seeker.signed_angle_to(target) / PI).clamp(-1.0, 1.0));
    }

    features
}
