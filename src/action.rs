//! Policy output → movement intent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ActionSpaceKind, IntegrationMode};
use crate::geometry::{Planar, Pose};

/// Raw action as produced by a policy or another action source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// 0 forward, 1 backward, 2 left, 3 right.
    Discrete(i64),
    /// Forward axis, then strafe (or turn) axis; each clamped to `[-1, 1]`.
    Continuous([f32; 2]),
}

impl Action {
    pub const FORWARD: Action = Action::Discrete(0);
    pub const BACKWARD: Action = Action::Discrete(1);
    pub const LEFT: Action = Action::Discrete(2);
    pub const RIGHT: Action = Action::Discrete(3);

    pub fn kind(&self) -> ActionSpaceKind {
        match self {
            Action::Discrete(_) => ActionSpaceKind::Discrete4,
            Action::Continuous(_) => ActionSpaceKind::Continuous2,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionError {
    #[error("discrete action {0} is outside 0..4")]
    IndexOutOfRange(i64),

    #[error("continuous action has a non-finite component: {0:?}")]
    NonFinite([f32; 2]),

    #[error("expected a {expected:?} action, got {got:?}")]
    KindMismatch { expected: ActionSpaceKind, got: ActionSpaceKind },

    /// The caller's raw value could not be read as an action at all.
    #[error("malformed action: {0}")]
    Malformed(String),
}

/// Desired motion in the seeker's own frame.
///
/// `forward` and `strafe` scale the local forward and right axes; `turn`
/// scales the configured rotate speed (positive turns right).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
}

impl MovementIntent {
    pub const NONE: MovementIntent = MovementIntent { forward: 0.0, strafe: 0.0, turn: 0.0 };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// `forward * pose.forward() + strafe * pose.right()`.
    pub fn world_direction(&self, pose: &Pose) -> Planar {
        pose.forward() * self.forward + pose.right() * self.strafe
    }
}

pub fn decode(
    action: &Action,
    kind: ActionSpaceKind,
    mode: IntegrationMode,
) -> Result<MovementIntent, ActionError> {
    if action.kind() != kind {
        return Err(ActionError::KindMismatch { expected: kind, got: action.kind() });
    }

    match *action {
        Action::Discrete(index) => decode_discrete(index, mode),
        Action::Continuous(raw) => decode_continuous(raw, mode),
    }
}

fn decode_discrete(index: i64, mode: IntegrationMode) -> Result<MovementIntent, ActionError> {
    let (forward, lateral) = match index {
        0 => (1.0, 0.0),
        1 => (-1.0, 0.0),
        2 => (0.0, -1.0),
        3 => (0.0, 1.0),
        _ => return Err(ActionError::IndexOutOfRange(index)),
    };

    Ok(match mode {
        IntegrationMode::Strafe => MovementIntent { forward, strafe: lateral, turn: 0.0 },
        IntegrationMode::Turn => MovementIntent { forward, strafe: 0.0, turn: lateral },
    })
}

fn decode_continuous(raw: [f32; 2], mode: IntegrationMode) -> Result<MovementIntent, ActionError> {
    if !raw.iter().all(|v| v.is_finite()) {
        return Err(ActionError::NonFinite(raw));
    }
    let f = raw[0].clamp(-1.0, 1.0);
    let s = raw[1].clamp(-1.0, 1.0);

    Ok(match mode {
        IntegrationMode::Strafe => {
            // Unit length so diagonals reach the same speed as a single axis.
            let dir = Planar::new(f, s).normalized().unwrap_or(Planar::ZERO);
            MovementIntent { forward: dir.x, strafe: dir.z, turn: 0.0 }
        }
        IntegrationMode::Turn => MovementIntent { forward: f, strafe: 0.0, turn: s },
    })
}
