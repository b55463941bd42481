use super::errors::EnvError;
use crate::geometry::Pose;

/// Gym-style environment: reset, then step until `done`.
pub trait Env: Send {
    type Obs: Send + Clone + 'static;
    type Act: Send + Clone + 'static;
    type Info: Send + Clone + 'static;

    fn reset(&mut self) -> Result<Self::Obs, EnvError>;
    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError>;
    fn close(&mut self) -> Result<(), EnvError>;
}

/// Where the seeker and target currently are, as the host world sees them.
pub trait PoseProvider {
    fn seeker_pose(&self) -> Pose;
    /// `None` when no target is bound to the episode.
    fn target_pose(&self) -> Option<Pose>;
}

/// Writes integrated poses back into the host world.
pub trait MovementSink {
    fn commit_seeker(&mut self, pose: Pose);
    /// Places both entities at the start of an episode. Hosts without a
    /// bound target ignore `target`.
    fn place(&mut self, seeker: Pose, target: Pose);
}

/// Host-reported contact between seeker and target.
pub trait ContactSignal {
    /// Returns whether contact happened since the last call and clears it.
    fn take_contact(&mut self) -> bool;
}

/// Everything the episode controller needs from the host world.
pub trait HostWorld: PoseProvider + MovementSink + ContactSignal + Send {}

impl<T> HostWorld for T where T: PoseProvider + MovementSink + ContactSignal + Send {}
