// pursuit/src/rollout.rs
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::action::Action;
use crate::control::{ActionSource, ControlError, Policy};
use crate::env::{Env, EnvError, Outcome, Step, StepInfo, TrajectoryShard, VecEnv};
use crate::observation::Observation;

#[derive(Error, Debug)]
pub enum RolloutError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error("rollout needs a step or episode budget")]
    Unbounded,

    #[error("rollout needs at least one environment")]
    EmptyBatch,

    #[error("episode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode_id: Uuid,
    pub steps: u32,
    pub total_reward: f32,
    pub outcome: Option<Outcome>,
}

impl EpisodeSummary {
    pub fn reached(&self) -> bool {
        self.outcome.is_some_and(|o| o.is_success())
    }
}

#[derive(Debug, Clone)]
pub struct RolloutConfig {
    pub max_steps: Option<u64>,
    pub max_episodes: Option<u64>,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(100_000),
            max_episodes: None,
        }
    }
}

#[derive(Debug)]
pub struct RolloutStats {
    pub total_steps: u64,
    pub total_episodes: u64,
    pub episodes: Vec<EpisodeSummary>,
    pub elapsed: Duration,
}

impl RolloutStats {
    pub fn success_rate(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        let reached = self.episodes.iter().filter(|e| e.reached()).count();
        reached as f32 / self.episodes.len() as f32
    }

    pub fn mean_return(&self) -> f32 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().map(|e| e.total_reward).sum::<f32>() / self.episodes.len() as f32
    }
}

/// Runs one full episode: reset, then step until done.
pub fn run_episode<E, S>(env: &mut E, source: &mut S) -> Result<EpisodeSummary, EnvError>
where
    E: Env<Obs = Observation, Act = Action, Info = StepInfo>,
    S: ActionSource + ?Sized,
{
    let mut total_reward = 0.0;
    let mut obs = env.reset()?;

    loop {
        let action = source.act(&obs);
        let (next_obs, reward, done, info) = env.step(action)?;
        total_reward += reward;

        if done {
            return Ok(EpisodeSummary {
                episode_id: info.episode_id,
                steps: info.step,
                total_reward,
                outcome: info.outcome,
            });
        }
        obs = next_obs;
    }
}

/// Like [`run_episode`], keeping every transition.
pub fn record_episode<E, S>(
    env: &mut E,
    source: &mut S,
) -> Result<TrajectoryShard<Observation, Action>, EnvError>
where
    E: Env<Obs = Observation, Act = Action, Info = StepInfo>,
    S: ActionSource + ?Sized,
{
    let mut steps = Vec::new();
    let mut obs = env.reset()?;

    loop {
        let action = source.act(&obs);
        let (next_obs, rew, done, info) = env.step(action)?;
        let payload = serde_json::to_value(&info)
            .map_err(|e| EnvError::EnvError(Box::new(e)))?;
        steps.push(Step { obs, act: action, rew, done, info: payload });

        if done {
            return Ok(TrajectoryShard { id: info.episode_id, steps, outcome: info.outcome });
        }
        obs = next_obs;
    }
}

/// Steps a batch of environments with a batched policy, resetting each
/// environment as soon as its episode ends, until a budget is spent.
pub async fn collect<E, P>(
    envs: &mut VecEnv<E>,
    policy: &P,
    cfg: &RolloutConfig,
) -> Result<RolloutStats, RolloutError>
where
    E: Env<Obs = Observation, Act = Action, Info = StepInfo>,
    P: Policy + ?Sized,
{
    if cfg.max_steps.is_none() && cfg.max_episodes.is_none() {
        return Err(RolloutError::Unbounded);
    }
    if envs.is_empty() {
        return Err(RolloutError::EmptyBatch);
    }

    let start = Instant::now();
    let mut stats = RolloutStats {
        total_steps: 0,
        total_episodes: 0,
        episodes: Vec::new(),
        elapsed: Duration::ZERO,
    };
    let mut obs = envs.reset()?;
    let mut returns = vec![0.0f32; envs.len()];

    let budget_spent = |stats: &RolloutStats| {
        cfg.max_steps.is_some_and(|max| stats.total_steps >= max)
            || cfg.max_episodes.is_some_and(|max| stats.total_episodes >= max)
    };

    while !budget_spent(&stats) {
        let actions = policy.act(obs.clone()).await?;
        if actions.len() != obs.len() {
            let err = ControlError::BatchSize { expected: obs.len(), got: actions.len() };
            return Err(err.into());
        }

        for (i, (next_obs, reward, done, info)) in envs.step(actions)?.into_iter().enumerate() {
            stats.total_steps += 1;
            returns[i] += reward;

            if done {
                let summary = EpisodeSummary {
                    episode_id: info.episode_id,
                    steps: info.step,
                    total_reward: returns[i],
                    outcome: info.outcome,
                };
                debug!(
                    env = i,
                    episode = %summary.episode_id,
                    outcome = ?summary.outcome,
                    "episode collected"
                );
                stats.episodes.push(summary);
                stats.total_episodes += 1;
                returns[i] = 0.0;
                obs[i] = envs.reset_one(i)?;
            } else {
                obs[i] = next_obs;
            }
        }
    }

    stats.elapsed = start.elapsed();
    info!(
        steps = stats.total_steps,
        episodes = stats.total_episodes,
        success_rate = stats.success_rate(),
        "rollout finished"
    );
    Ok(stats)
}

/// Runs `episodes` independent episodes concurrently, each on its own
/// blocking task with its own environment and action source.
pub async fn evaluate_parallel<E, S, FE, FS>(
    make_env: FE,
    make_source: FS,
    episodes: usize,
) -> Result<Vec<EpisodeSummary>, RolloutError>
where
    E: Env<Obs = Observation, Act = Action, Info = StepInfo> + 'static,
    S: ActionSource + 'static,
    FE: Fn(usize) -> Result<E, EnvError>,
    FS: Fn(usize) -> S,
{
    let mut handles = Vec::with_capacity(episodes);
    for i in 0..episodes {
        let mut env = make_env(i)?;
        let mut source = make_source(i);
        handles.push(tokio::task::spawn_blocking(move || run_episode(&mut env, &mut source)));
    }

    let mut summaries = Vec::with_capacity(episodes);
    for result in join_all(handles).await {
        summaries.push(result??);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ActionSpaceKind, Config, IntegrationMode};
    use crate::control::{GreedyPursuer, RandomSource, SourcePolicy};
    use crate::env::{KinematicWorld, PursuitEnv};
    use std::collections::HashSet;

    fn greedy() -> GreedyPursuer {
        GreedyPursuer::new(ActionSpaceKind::Discrete4, IntegrationMode::Strafe)
    }

    // Axis-by-axis pursuit can need more than the default 500 steps from a
    // far corner.
    fn roomy() -> Config {
        Config::default().with_max_steps(2_000)
    }

    #[test]
    fn greedy_pursuer_reaches_target() {
        let mut env = PursuitEnv::with_seed(roomy(), KinematicWorld::new(), 11).unwrap();
        let summary = run_episode(&mut env, &mut greedy()).unwrap();
        assert!(summary.reached(), "outcome was {:?}", summary.outcome);
        assert!(summary.total_reward > 0.0);
        assert!(summary.steps <= env.config().max_steps);
    }

    #[test]
    fn recorded_shard_matches_episode() {
        let mut env = PursuitEnv::with_seed(Config::default(), KinematicWorld::new(), 4).unwrap();
        let shard = record_episode(&mut env, &mut greedy()).unwrap();
        assert!(!shard.is_empty());
        assert!(shard.steps.last().unwrap().done);
        assert!(shard.steps[..shard.len() - 1].iter().all(|s| !s.done));
        assert_eq!(shard.id, env.episode().id);
        assert!((shard.total_reward() - env.episode().total_reward).abs() < 1e-4);
        assert_eq!(shard.steps[0].info["step"], 1);
    }

    #[tokio::test]
    async fn collect_respects_episode_budget() {
        let mut envs = VecEnv::try_new(
            |i| {
                let config = Config::default().with_max_steps(20);
                PursuitEnv::with_seed(config, KinematicWorld::new(), i as u64)
            },
            3,
        )
        .unwrap();
        let policy = SourcePolicy::new(RandomSource::new(ActionSpaceKind::Discrete4, 0));
        let cfg = RolloutConfig { max_steps: None, max_episodes: Some(6) };

        let stats = collect(&mut envs, &policy, &cfg).await.unwrap();
        assert!(stats.total_episodes >= 6);
        assert_eq!(stats.total_episodes as usize, stats.episodes.len());
        assert!(stats.episodes.iter().all(|e| e.steps <= 20));
    }

    #[tokio::test]
    async fn collect_needs_a_budget() {
        let mut envs = VecEnv::new(|| PursuitEnv::kinematic(Config::default()).unwrap(), 1);
        let policy = SourcePolicy::new(greedy());
        let cfg = RolloutConfig { max_steps: None, max_episodes: None };
        assert!(matches!(collect(&mut envs, &policy, &cfg).await, Err(RolloutError::Unbounded)));
    }

    struct ShortPolicy;

    #[async_trait::async_trait]
    impl Policy for ShortPolicy {
        async fn act(&self, _obs: Vec<Observation>) -> Result<Vec<Action>, ControlError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn collect_rejects_short_batches() {
        let mut envs = VecEnv::new(|| PursuitEnv::kinematic(Config::default()).unwrap(), 2);
        let err = collect(&mut envs, &ShortPolicy, &RolloutConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RolloutError::Control(ControlError::BatchSize { expected: 2, got: 0 })
        ));
    }

    #[tokio::test]
    async fn collect_rejects_an_empty_batch() {
        let mut envs = VecEnv::new(|| PursuitEnv::kinematic(Config::default()).unwrap(), 0);
        let policy = SourcePolicy::new(greedy());
        let cfg = RolloutConfig { max_steps: Some(10), max_episodes: None };

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(3),
            collect(&mut envs, &policy, &cfg),
        )
        .await
        .expect("collect should return immediately");
        assert!(matches!(result, Err(RolloutError::EmptyBatch)));
    }

    #[tokio::test]
    async fn parallel_episodes_are_independent() {
        let summaries = evaluate_parallel(
            |i| Ok(PursuitEnv::with_seed(roomy(), KinematicWorld::new(), 100 + i as u64)?),
            |_| greedy(),
            4,
        )
        .await
        .unwrap();
        assert_eq!(summaries.len(), 4);
        assert!(summaries.iter().all(|s| s.reached()));
        let ids: HashSet<_> = summaries.iter().map(|s| s.episode_id).collect();
        assert_eq!(ids.len(), 4);
    }
}
