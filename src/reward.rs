//! Per-step reward: time penalty, clamped distance shaping, success bonus.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// The parts that make up one step's reward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub time_penalty: f32,
    pub shaped: f32,
    pub bonus: f32,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.time_penalty + self.shaped + self.bonus
    }
}

/// Tracks the last seeker/target distance between steps.
#[derive(Debug, Clone)]
pub struct RewardShaper {
    last_distance: Option<f32>,
}

impl RewardShaper {
    /// Starts a new episode at `initial_distance` (or with no target bound).
    pub fn new(initial_distance: Option<f32>) -> Self {
        Self { last_distance: initial_distance }
    }

    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    /// Reward for a step that ended at `new_distance`, without the bonus.
    ///
    /// With no target bound only the time penalty applies. A target that
    /// appears mid-episode starts shaping on the following step.
    pub fn step(&mut self, new_distance: Option<f32>, config: &Config) -> RewardBreakdown {
        let shaped = match (self.last_distance, new_distance) {
            (Some(last), Some(new)) => ((last - new) * config.distance_reward_scale)
                .clamp(config.distance_reward_min, config.distance_reward_max),
            _ => 0.0,
        };
        if new_distance.is_some() {
            self.last_distance = new_distance;
        }
        RewardBreakdown { time_penalty: config.time_penalty, shaped, bonus: 0.0 }
    }
}
