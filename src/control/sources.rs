use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;

use super::errors::ControlError;
use super::traits::{ActionSource, Policy};
use crate::action::Action;
use crate::config::{ActionSpaceKind, IntegrationMode};
use crate::geometry::Planar;
use crate::observation::Observation;

/// Snapshot of the movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
}

impl KeyState {
    pub fn to_action(self, kind: ActionSpaceKind) -> Action {
        match kind {
            ActionSpaceKind::Discrete4 => {
                let mut index = 0;
                if self.w {
                    index = 0;
                }
                if self.s {
                    index = 1;
                }
                if self.a {
                    index = 2;
                }
                if self.d {
                    index = 3;
                }
                Action::Discrete(index)
            }
            ActionSpaceKind::Continuous2 => {
                let axis =
                    |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
                Action::Continuous([axis(self.w, self.s), axis(self.d, self.a)])
            }
        }
    }
}

/// Manual control through a key poller, for testing an environment by hand.
///
/// Discrete mode mirrors the classic WASD mapping: with nothing pressed the
/// action is forward, and when several keys are held the later of W, S, A, D
/// wins. Continuous mode combines the keys into the two axes.
pub struct KeyboardSource<P> {
    poll: P,
    kind: ActionSpaceKind,
}

impl<P> KeyboardSource<P>
where
    P: FnMut() -> KeyState + Send,
{
    pub fn new(kind: ActionSpaceKind, poll: P) -> Self {
        Self { poll, kind }
    }
}

impl<P> ActionSource for KeyboardSource<P>
where
    P: FnMut() -> KeyState + Send,
{
    fn act(&mut self, _obs: &Observation) -> Action {
        (self.poll)().to_action(self.kind)
    }
}

/// Scripted pursuer that heads straight for the target using only the
/// observation vector. Useful as a baseline and for smoke tests.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPursuer {
    kind: ActionSpaceKind,
    mode: IntegrationMode,
    /// Bearing (radians) under which turn mode stops turning and advances.
    tolerance: f32,
}

impl GreedyPursuer {
    pub fn new(kind: ActionSpaceKind, mode: IntegrationMode) -> Self {
        Self { kind, mode, tolerance: 10f32.to_radians() }
    }

    /// Target offset split into (ahead, to the right), from features 0..4.
    fn local_offset(obs: &Observation) -> Option<(f32, f32)> {
        let [rx, rz, fx, fz]: [f32; 4] = obs.get(..4)?.try_into().ok()?;
        let rel = Planar::new(rx, rz);
        let forward = Planar::new(fx, fz);
        let right = Planar::new(fz, -fx);
        Some((rel.dot(forward), rel.dot(right)))
    }
}

impl ActionSource for GreedyPursuer {
    fn act(&mut self, obs: &Observation) -> Action {
        let Some((ahead, side)) = Self::local_offset(obs) else {
            return match self.kind {
                ActionSpaceKind::Discrete4 => Action::FORWARD,
                ActionSpaceKind::Continuous2 => Action::Continuous([1.0, 0.0]),
            };
        };
        let bearing = side.atan2(ahead);

        match (self.kind, self.mode) {
            (ActionSpaceKind::Discrete4, IntegrationMode::Strafe) => {
                if ahead.abs() >= side.abs() {
                    if ahead >= 0.0 { Action::FORWARD } else { Action::BACKWARD }
                } else if side > 0.0 {
                    Action::RIGHT
                } else {
                    Action::LEFT
                }
            }
            (ActionSpaceKind::Discrete4, IntegrationMode::Turn) => {
                if bearing.abs() <= self.tolerance {
                    Action::FORWARD
                } else if bearing > 0.0 {
                    Action::RIGHT
                } else {
                    Action::LEFT
                }
            }
            (ActionSpaceKind::Continuous2, IntegrationMode::Strafe) => {
                Action::Continuous([ahead, side])
            }
            (ActionSpaceKind::Continuous2, IntegrationMode::Turn) => {
                let throttle = if bearing.abs() <= self.tolerance { 1.0 } else { 0.0 };
                Action::Continuous([throttle, (bearing / self.tolerance).clamp(-1.0, 1.0)])
            }
        }
    }
}

/// Uniformly random actions from a seeded generator.
pub struct RandomSource {
    kind: ActionSpaceKind,
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn new(kind: ActionSpaceKind, seed: u64) -> Self {
        Self { kind, rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl ActionSource for RandomSource {
    fn act(&mut self, _obs: &Observation) -> Action {
        match self.kind {
            ActionSpaceKind::Discrete4 => Action::Discrete(self.rng.gen_range(0..4)),
            ActionSpaceKind::Continuous2 => Action::Continuous([
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            ]),
        }
    }
}

/// Serves any [`ActionSource`] through the batched [`Policy`] interface.
pub struct SourcePolicy<S> {
    source: Mutex<S>,
}

impl<S: ActionSource> SourcePolicy<S> {
    pub fn new(source: S) -> Self {
        Self { source: Mutex::new(source) }
    }

    pub fn into_inner(self) -> S {
        self.source.into_inner()
    }
}

#[async_trait]
impl<S: ActionSource> Policy for SourcePolicy<S> {
    async fn act(&self, obs: Vec<Observation>) -> Result<Vec<Action>, ControlError> {
        let mut source = self.source.lock().await;
        Ok(obs.iter().map(|o| source.act(o)).collect())
    }
}
