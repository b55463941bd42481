mod errors;
mod sources;
mod traits;

pub use errors::ControlError;
pub use sources::{GreedyPursuer, KeyState, KeyboardSource, RandomSource, SourcePolicy};
pub use traits::{ActionSource, Policy};
