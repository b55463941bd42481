// pursuit/src/config/mod.rs
mod errors;

pub use errors::ConfigError;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted `half_size`. Positions stay resolvable to well under one
/// step of movement at the default speed.
pub const MAX_HALF_SIZE: f32 = 1.0e5;

/// Structure of the actions a policy emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSpaceKind {
    /// One index in `0..4`: forward, backward, left, right.
    Discrete4,
    /// Two floats in `[-1, 1]`: forward axis, then strafe (or turn) axis.
    Continuous2,
}

impl ActionSpaceKind {
    /// Number of scalars a policy produces per action.
    pub fn action_size(self) -> usize {
        match self {
            ActionSpaceKind::Discrete4 => 1,
            ActionSpaceKind::Continuous2 => 2,
        }
    }
}

/// Kinematic model used to move the seeker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    /// Translate relative to the current facing; heading never changes.
    Strafe,
    /// Rotate the heading, then advance along the new forward vector.
    Turn,
}

/// Which features the observation vector carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationLayout {
    /// Relative position and forward vector.
    Compact,
    /// Compact plus normalized distance and signed bearing.
    Extended,
}

impl ObservationLayout {
    pub fn size(self) -> usize {
        match self {
            ObservationLayout::Compact => 4,
            ObservationLayout::Extended => 6,
        }
    }
}

/// Immutable episode parameters.
///
/// Construct with [`Config::default`] and the `with_*` helpers, or load from
/// JSON. Fields missing from a JSON document fall back to the defaults.
/// Every environment validates its config once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Half the side length of the square arena. Spawns are drawn from
    /// `[-half_size, half_size]` on both planar axes and observations are
    /// normalized by it.
    pub half_size: f32,
    /// Seeker speed in units per second.
    pub move_speed: f32,
    /// Turn rate in degrees per second, used by [`IntegrationMode::Turn`].
    pub rotate_speed: f32,
    /// Simulated seconds per step.
    pub dt: f32,
    /// Planar distance at which the target counts as reached.
    pub success_distance: f32,
    /// Reward added every step; zero or negative.
    pub time_penalty: f32,
    pub distance_reward_scale: f32,
    pub distance_reward_min: f32,
    pub distance_reward_max: f32,
    /// Added on top of the step reward when the target is reached.
    pub success_bonus: f32,
    pub max_steps: u32,
    pub action_space: ActionSpaceKind,
    pub integration: IntegrationMode,
    pub observation: ObservationLayout,
    pub min_spawn_separation: f32,
    /// Target redraws before falling back to the far corner.
    pub spawn_retry_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            half_size: 5.0,
            move_speed: 2.0,
            rotate_speed: 120.0,
            dt: 0.02,
            success_distance: 0.8,
            time_penalty: -0.001,
            distance_reward_scale: 1.0,
            distance_reward_min: -0.05,
            distance_reward_max: 0.05,
            success_bonus: 1.0,
            max_steps: 500,
            action_space: ActionSpaceKind::Discrete4,
            integration: IntegrationMode::Strafe,
            observation: ObservationLayout::Extended,
            min_spawn_separation: 1.0,
            spawn_retry_limit: 100,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("half_size", self.half_size)?;
        positive("success_distance", self.success_distance)?;
        positive("dt", self.dt)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("min_spawn_separation", self.min_spawn_separation)?;
        non_negative("success_bonus", self.success_bonus)?;
        non_negative("distance_reward_scale", self.distance_reward_scale)?;

        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if !self.time_penalty.is_finite() || self.time_penalty > 0.0 {
            return Err(ConfigError::PositiveTimePenalty(self.time_penalty));
        }
        if !self.distance_reward_min.is_finite()
            || !self.distance_reward_max.is_finite()
            || self.distance_reward_min > self.distance_reward_max
        {
            return Err(ConfigError::InvertedRewardClamp {
                min: self.distance_reward_min,
                max: self.distance_reward_max,
            });
        }

        if self.half_size > MAX_HALF_SIZE {
            return Err(ConfigError::ArenaTooLarge {
                half_size: self.half_size,
                max: MAX_HALF_SIZE,
            });
        }

        let diameter = 2.0 * self.half_size;
        if self.min_spawn_separation >= diameter {
            return Err(ConfigError::SpawnSeparationTooLarge {
                separation: self.min_spawn_separation,
                diameter,
            });
        }

        if self.integration == IntegrationMode::Turn
            && !(self.rotate_speed.is_finite() && self.rotate_speed > 0.0)
        {
            return Err(ConfigError::MissingRotateSpeed(self.rotate_speed));
        }

        Ok(())
    }

    pub fn observation_size(&self) -> usize {
        self.observation.size()
    }

    pub fn action_size(&self) -> usize {
        self.action_space.action_size()
    }

    pub fn rotate_speed_radians(&self) -> f32 {
        self.rotate_speed.to_radians()
    }

    pub fn with_action_space(mut self, kind: ActionSpaceKind) -> Self {
        self.action_space = kind;
        self
    }

    pub fn with_integration(mut self, mode: IntegrationMode) -> Self {
        self.integration = mode;
        self
    }

    pub fn with_observation(mut self, layout: ObservationLayout) -> Self {
        self.observation = layout;
        self
    }

    pub fn with_half_size(mut self, half_size: f32) -> Self {
        self.half_size = half_size;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_success_distance(mut self, distance: f32) -> Self {
        self.success_distance = distance;
        self
    }

    pub fn with_reward_clamp(mut self, min: f32, max: f32) -> Self {
        self.distance_reward_min = min;
        self.distance_reward_max = max;
        self
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
