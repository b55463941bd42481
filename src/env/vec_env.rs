use super::{Env, EnvError};

/// A batch of independent environments stepped in lockstep.
///
/// Every instance owns its own state; nothing is shared between them.
pub struct VecEnv<E> {
    envs: Vec<E>,
}

impl<E: Env> VecEnv<E> {
    pub fn new<F>(make_env: F, num_envs: usize) -> Self
    where
        F: FnMut() -> E,
    {
        let envs = std::iter::repeat_with(make_env).take(num_envs).collect();
        Self { envs }
    }

    /// Builds from a fallible constructor, e.g. one that validates a config.
    pub fn try_new<F, Err>(mut make_env: F, num_envs: usize) -> Result<Self, Err>
    where
        F: FnMut(usize) -> Result<E, Err>,
    {
        let envs = (0..num_envs).map(&mut make_env).collect::<Result<_, _>>()?;
        Ok(Self { envs })
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.envs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.envs.get_mut(index)
    }

    pub fn reset(&mut self) -> Result<Vec<E::Obs>, EnvError> {
        self.envs.iter_mut().map(|env| env.reset()).collect()
    }

    pub fn reset_one(&mut self, index: usize) -> Result<E::Obs, EnvError> {
        let len = self.envs.len();
        self.envs
            .get_mut(index)
            .ok_or(EnvError::IndexOutOfRange { index, len })?
            .reset()
    }

    pub fn step(
        &mut self,
        actions: Vec<E::Act>,
    ) -> Result<Vec<(E::Obs, f32, bool, E::Info)>, EnvError> {
        if actions.len() != self.envs.len() {
            return Err(EnvError::ActionCount {
                expected: self.envs.len(),
                got: actions.len(),
            });
        }

        self.envs
            .iter_mut()
            .zip(actions)
            .map(|(env, action)| env.step(action))
            .collect()
    }

    pub fn close(&mut self) -> Result<(), EnvError> {
        for env in &mut self.envs {
            env.close()?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> Vec<E> {
        self.envs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::config::Config;
    use crate::env::{KinematicWorld, PursuitEnv};

    fn batch(n: usize) -> VecEnv<PursuitEnv> {
        VecEnv::try_new(
            |i| PursuitEnv::with_seed(Config::default(), KinematicWorld::new(), i as u64 + 1),
            n,
        )
        .unwrap()
    }

    #[test]
    fn instances_are_isolated() {
        let mut envs = batch(3);
        let obs = envs.reset().unwrap();
        assert_eq!(obs.len(), 3);
        // Different seeds give different spawns.
        assert_ne!(obs[0], obs[1]);

        envs.get_mut(0).unwrap().close().unwrap();
        assert!(envs.get(0).unwrap().episode().id.is_nil());
        assert!(!envs.get(1).unwrap().episode().id.is_nil());
    }

    #[test]
    fn action_count_must_match() {
        let mut envs = batch(2);
        envs.reset().unwrap();
        let err = envs.step(vec![Action::FORWARD]).unwrap_err();
        assert!(matches!(err, EnvError::ActionCount { expected: 2, got: 1 }));
    }

    #[test]
    fn steps_every_instance() {
        let mut envs = batch(2);
        envs.reset().unwrap();
        let results = envs.step(vec![Action::FORWARD, Action::LEFT]).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(_, _, _, info)| info.step == 1));
    }

    #[test]
    fn reset_one_checks_bounds() {
        let mut envs = batch(1);
        assert!(envs.reset_one(0).is_ok());
        assert!(matches!(envs.reset_one(5), Err(EnvError::IndexOutOfRange { index: 5, len: 1 })));
    }
}
