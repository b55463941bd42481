use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("policy returned {got} actions for {expected} observations")]
    BatchSize { expected: usize, got: usize },

    #[error("Control error: {0}")]
    ControlError(#[from] Box<dyn std::error::Error + Send + Sync>),
}
