use async_trait::async_trait;

use super::errors::ControlError;
use crate::action::Action;
use crate::observation::Observation;

/// Anything that picks one action per observation: a scripted controller,
/// a keyboard mapping, or a local copy of a trained policy.
pub trait ActionSource: Send {
    fn act(&mut self, obs: &Observation) -> Action;
}

impl<S: ActionSource + ?Sized> ActionSource for Box<S> {
    fn act(&mut self, obs: &Observation) -> Action {
        (**self).act(obs)
    }
}

/// Batched, possibly remote policy: one action per observation, in order.
#[async_trait]
pub trait Policy: Send + Sync {
    async fn act(&self, obs: Vec<Observation>) -> Result<Vec<Action>, ControlError>;
}
