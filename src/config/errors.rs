use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("max_steps must be greater than zero")]
    ZeroMaxSteps,

    #[error("time_penalty must not be positive, got {0}")]
    PositiveTimePenalty(f32),

    #[error("shaped reward clamp is inverted: min {min} > max {max}")]
    InvertedRewardClamp { min: f32, max: f32 },

    #[error("half_size {half_size} exceeds the supported maximum of {max}")]
    ArenaTooLarge { half_size: f32, max: f32 },

    #[error("spawn separation {separation} cannot be met inside an arena of diameter {diameter}")]
    SpawnSeparationTooLarge { separation: f32, diameter: f32 },

    #[error("turn integration needs a positive rotate_speed, got {0}")]
    MissingRotateSpeed(f32),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}
