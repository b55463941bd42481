// pursuit/src/env/mod.rs
mod errors;
mod pursuit;
mod traits;
mod types;
mod vec_env;
mod world;

pub use errors::EnvError;
pub use pursuit::{PursuitEnv, ResetInfo};
pub use traits::{ContactSignal, Env, HostWorld, MovementSink, PoseProvider};
pub use types::{
    EntityState, EpisodeState, Outcome, Phase, ReachedVia, Recovered, Step, StepInfo,
    TrajectoryShard,
};
pub use vec_env::VecEnv;
pub use world::KinematicWorld;
