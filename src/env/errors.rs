use thiserror::Error;

use super::types::Phase;
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("step called while the episode is {0:?}; call reset first")]
    InvalidState(Phase),

    #[error("got {got} actions for {expected} environments")]
    ActionCount { expected: usize, got: usize },

    #[error("environment index {index} out of range for {len} environments")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Environment error: {0}")]
    EnvError(#[from] Box<dyn std::error::Error + Send + Sync>),
}
