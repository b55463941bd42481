use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::action::ActionError;
use crate::geometry::{Planar, Pose};
use crate::reward::{RewardBreakdown, RewardShaper};

/// Lifecycle of one episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Constructed or reconfigured; waiting for a reset.
    #[default]
    Idle,
    Active,
    Terminal,
}

/// How a reached target was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReachedVia {
    Proximity,
    Contact,
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Outcome {
    Reached { via: ReachedVia },
    Timeout,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Reached { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Reached { via: ReachedVia::Proximity } => "reached_proximity",
            Outcome::Reached { via: ReachedVia::Contact } => "reached_contact",
            Outcome::Timeout => "timeout",
        }
    }
}

/// A condition the environment recovered from instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovered {
    /// The action was replaced by a no-op for this step.
    InvalidAction(ActionError),
    /// No target is bound; relative features were zeroed.
    MissingTarget,
    /// Spawn retries ran out; the target went to the far corner.
    SpawnFallback { attempts: u32 },
}

impl fmt::Display for Recovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recovered::InvalidAction(err) => write!(f, "invalid action: {err}"),
            Recovered::MissingTarget => f.write_str("missing target"),
            Recovered::SpawnFallback { attempts } => {
                write!(f, "spawn fallback after {attempts} attempts")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub pose: Pose,
    /// Last integrated planar velocity. Always `None` for the target.
    pub velocity: Option<Planar>,
}

/// Per-episode bookkeeping, replaced wholesale on every reset.
#[derive(Debug, Clone)]
pub struct EpisodeState {
    pub id: Uuid,
    pub phase: Phase,
    pub step_count: u32,
    pub outcome: Option<Outcome>,
    /// Sum of step rewards so far. Diagnostic only.
    pub total_reward: f32,
    pub seeker: EntityState,
    pub target: Option<EntityState>,
    pub(crate) shaper: RewardShaper,
}

impl EpisodeState {
    pub(crate) fn idle() -> Self {
        Self {
            id: Uuid::nil(),
            phase: Phase::Idle,
            step_count: 0,
            outcome: None,
            total_reward: 0.0,
            seeker: EntityState::default(),
            target: None,
            shaper: RewardShaper::new(None),
        }
    }

    pub(crate) fn start(seeker: Pose, target: Option<Pose>) -> Self {
        let distance = target.map(|t| seeker.planar_distance(&t));
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Active,
            step_count: 0,
            outcome: None,
            total_reward: 0.0,
            seeker: EntityState { pose: seeker, velocity: None },
            target: target.map(|pose| EntityState { pose, velocity: None }),
            shaper: RewardShaper::new(distance),
        }
    }

    /// Seeker/target distance recorded at the end of the last step (or at
    /// reset). `None` while no target has been seen.
    pub fn last_distance(&self) -> Option<f32> {
        self.shaper.last_distance()
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Terminal
    }
}

/// Diagnostics returned with every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub episode_id: Uuid,
    /// Steps taken in this episode, including this one.
    pub step: u32,
    pub distance: Option<f32>,
    pub reward: RewardBreakdown,
    pub outcome: Option<Outcome>,
    pub recovered: Vec<Recovered>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step<O, A> {
    pub obs: O,
    pub act: A,
    pub rew: f32,
    pub done: bool,
    pub info: serde_json::Value,
}

/// One recorded episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryShard<O, A> {
    pub id: Uuid,
    pub steps: Vec<Step<O, A>>,
    pub outcome: Option<Outcome>,
}

impl<O, A> TrajectoryShard<O, A> {
    pub fn total_reward(&self) -> f32 {
        self.steps.iter().map(|s| s.rew).sum()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
