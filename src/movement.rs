//! Kinematic integration of the seeker.
//!
//! There is no collision handling here: the seeker may leave the arena.
//! Observations clamp and the next reset re-randomizes, so episodes recover
//! on their own.

use crate::action::MovementIntent;
use crate::config::{Config, IntegrationMode};
use crate::geometry::{Planar, Pose, wrap_angle};

/// Advances `pose` by one step of `config.dt`.
pub fn integrate(pose: &Pose, intent: &MovementIntent, config: &Config) -> Pose {
    let step = config.move_speed * config.dt;
    match config.integration {
        IntegrationMode::Strafe => {
            let dir = intent.world_direction(pose);
            pose.with_position(pose.position() + dir * step)
        }
        IntegrationMode::Turn => {
            let mut next = *pose;
            let turn = intent.turn * config.rotate_speed_radians() * config.dt;
            next.heading = wrap_angle(pose.heading + turn);
            next.with_position(next.position() + next.forward() * (intent.forward * step))
        }
    }
}

/// Planar velocity implied by moving from `before` to `after` in one step.
pub fn velocity(before: &Pose, after: &Pose, dt: f32) -> Planar {
    (after.position() - before.position()) * (1.0 / dt)
}
