//! Episodic seeker/target pursuit environment for reinforcement learning.
//!
//! A seeker moves inside a square arena and is rewarded for closing in on a
//! target. [`env::PursuitEnv`] drives the episode; the leaf modules each
//! handle one stage of a step:
//!
//! - [`action`] decodes a discrete index or a continuous pair into a
//!   movement intent,
//! - [`movement`] integrates that intent (strafe or turn kinematics),
//! - [`reward`] shapes the step reward from the change in distance,
//! - [`observation`] encodes the poses into the policy's feature vector,
//! - [`spawn`] draws non-overlapping starts on reset.
//!
//! Host engines plug in through the [`env::HostWorld`] traits; the bundled
//! [`env::KinematicWorld`] keeps everything in process. [`control`] and
//! [`rollout`] provide action sources and episode drivers.

pub mod action;
pub mod config;
pub mod control;
pub mod env;
pub mod geometry;
pub mod movement;
pub mod observation;
pub mod reward;
pub mod rollout;
pub mod spawn;

#[cfg(feature = "python")]
mod python;

pub use action::{Action, ActionError, MovementIntent};
pub use config::{ActionSpaceKind, Config, ConfigError, IntegrationMode, ObservationLayout};
pub use env::{Env, EnvError, KinematicWorld, Outcome, PursuitEnv, StepInfo, VecEnv};
pub use geometry::Pose;
pub use observation::Observation;
