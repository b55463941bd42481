use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use super::errors::EnvError;
use super::traits::{Env, HostWorld};
use super::types::{EntityState, EpisodeState, Outcome, Phase, ReachedVia, Recovered, StepInfo};
use super::world::KinematicWorld;
use crate::action::{self, Action, ActionError, MovementIntent};
use crate::config::{Config, ConfigError};
use crate::geometry::Pose;
use crate::movement;
use crate::observation::{self, Observation};
use crate::spawn::{self, SpawnResult};

/// Diagnostics from the most recent reset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetInfo {
    /// `None` when the episode started from explicit poses.
    pub spawn: Option<SpawnResult>,
    pub recovered: Vec<Recovered>,
}

/// The seeker/target pursuit episode controller.
///
/// Owns the configuration, the random source and the per-episode state, and
/// talks to the host world only through [`HostWorld`]. One instance runs one
/// episode at a time; run several instances for vectorized training.
pub struct PursuitEnv<W: HostWorld = KinematicWorld> {
    config: Config,
    world: W,
    rng: ChaCha8Rng,
    episode: EpisodeState,
    last_reset: Option<ResetInfo>,
    missing_target_warned: bool,
}

impl PursuitEnv<KinematicWorld> {
    /// Environment over an in-process [`KinematicWorld`] with a bound target.
    pub fn kinematic(config: Config) -> Result<Self, ConfigError> {
        Self::new(config, KinematicWorld::new())
    }
}

impl<W: HostWorld> PursuitEnv<W> {
    pub fn new(config: Config, world: W) -> Result<Self, ConfigError> {
        Self::build(config, world, ChaCha8Rng::from_entropy())
    }

    /// Like [`PursuitEnv::new`] with a fixed seed, for reproducible runs.
    pub fn with_seed(config: Config, world: W, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, world, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(config: Config, world: W, rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            world,
            rng,
            episode: EpisodeState::idle(),
            last_reset: None,
            missing_target_warned: false,
        })
    }

    /// Installs a new configuration. The environment returns to idle and
    /// must be reset; on error the previous configuration stays in force.
    pub fn configure(&mut self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.episode = EpisodeState::idle();
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn episode(&self) -> &EpisodeState {
        &self.episode
    }

    pub fn phase(&self) -> Phase {
        self.episode.phase
    }

    pub fn last_reset(&self) -> Option<&ResetInfo> {
        self.last_reset.as_ref()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn observation_size(&self) -> usize {
        self.config.observation_size()
    }

    pub fn action_size(&self) -> usize {
        self.config.action_size()
    }

    /// Observation of the current world state, without stepping.
    pub fn observe(&self) -> Observation {
        let target = self.world.target_pose();
        observation::encode(&self.world.seeker_pose(), target.as_ref(), &self.config)
    }

    /// Reseeds the random source, then resets.
    pub fn reset_with_seed(&mut self, seed: u64) -> Result<Observation, EnvError> {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.reset()
    }

    /// Starts an episode from explicit poses instead of random spawns.
    pub fn reset_with_poses(
        &mut self,
        seeker: Pose,
        target: Pose,
    ) -> Result<Observation, EnvError> {
        self.begin(seeker, target, None)
    }

    fn begin(
        &mut self,
        seeker: Pose,
        target: Pose,
        spawn: Option<SpawnResult>,
    ) -> Result<Observation, EnvError> {
        self.world.place(seeker, target);
        // Contacts from the previous episode must not leak into this one.
        self.world.take_contact();

        let seeker = self.world.seeker_pose();
        let target = self.world.target_pose();
        self.episode = EpisodeState::start(seeker, target);
        self.missing_target_warned = false;

        let mut recovered = Vec::new();
        if let Some(spawned) = &spawn {
            if spawned.fallback_used {
                debug!(
                    attempts = spawned.attempts,
                    "spawn retries exhausted, target placed at far corner"
                );
                recovered.push(Recovered::SpawnFallback { attempts: spawned.attempts });
            }
        }
        if target.is_none() {
            self.warn_missing_target();
            recovered.push(Recovered::MissingTarget);
        }

        debug!(
            episode = %self.episode.id,
            seeker_x = seeker.x,
            seeker_z = seeker.z,
            distance = ?self.episode.last_distance(),
            "episode reset"
        );
        self.last_reset = Some(ResetInfo { spawn, recovered });

        Ok(observation::encode(&seeker, target.as_ref(), &self.config))
    }

    fn warn_missing_target(&mut self) {
        if !self.missing_target_warned {
            warn!(
                episode = %self.episode.id,
                "no target bound, observing zeros for relative features"
            );
            self.missing_target_warned = true;
        }
    }

    /// Steps with a raw action the caller could not parse into an [`Action`].
    /// The step is recovered as a no-op, like any other invalid action.
    pub fn step_malformed(
        &mut self,
        reason: impl Into<String>,
    ) -> Result<(Observation, f32, bool, StepInfo), EnvError> {
        self.advance(Err(ActionError::Malformed(reason.into())))
    }

    fn intent_or_no_op(
        &self,
        decoded: Result<MovementIntent, ActionError>,
        recovered: &mut Vec<Recovered>,
    ) -> MovementIntent {
        match decoded {
            Ok(intent) => intent,
            Err(err) => {
                warn!(
                    episode = %self.episode.id,
                    step = self.episode.step_count,
                    error = %err,
                    "invalid action replaced with no-op"
                );
                recovered.push(Recovered::InvalidAction(err));
                MovementIntent::NONE
            }
        }
    }

    fn advance(
        &mut self,
        decoded: Result<MovementIntent, ActionError>,
    ) -> Result<(Observation, f32, bool, StepInfo), EnvError> {
        if self.episode.phase != Phase::Active {
            return Err(EnvError::InvalidState(self.episode.phase));
        }

        let mut recovered = Vec::new();
        let intent = self.intent_or_no_op(decoded, &mut recovered);

        let before = self.world.seeker_pose();
        let after = movement::integrate(&before, &intent, &self.config);
        self.world.commit_seeker(after);
        self.episode.seeker = EntityState {
            pose: after,
            velocity: Some(movement::velocity(&before, &after, self.config.dt)),
        };

        let target = self.world.target_pose();
        if target.is_none() {
            self.warn_missing_target();
            recovered.push(Recovered::MissingTarget);
        }
        self.episode.target = target.map(|pose| EntityState { pose, velocity: None });

        let distance = target.map(|t| after.planar_distance(&t));
        let mut reward = self.episode.shaper.step(distance, &self.config);

        // Drained every step so a contact never carries into a later one.
        let contact = self.world.take_contact();
        self.episode.step_count += 1;

        let outcome = if distance.is_some_and(|d| d <= self.config.success_distance) {
            Some(Outcome::Reached { via: ReachedVia::Proximity })
        } else if contact {
            Some(Outcome::Reached { via: ReachedVia::Contact })
        } else if self.episode.step_count >= self.config.max_steps {
            Some(Outcome::Timeout)
        } else {
            None
        };

        if outcome.is_some_and(|o| o.is_success()) {
            reward.bonus = self.config.success_bonus;
        }
        let total = reward.total();
        self.episode.total_reward += total;

        trace!(
            episode = %self.episode.id,
            step = self.episode.step_count,
            distance = ?distance,
            reward = total,
            "step"
        );

        let done = outcome.is_some();
        if let Some(outcome) = outcome {
            self.episode.phase = Phase::Terminal;
            self.episode.outcome = Some(outcome);
            info!(
                episode = %self.episode.id,
                outcome = ?outcome,
                steps = self.episode.step_count,
                episode_return = self.episode.total_reward,
                "episode finished"
            );
        }

        let obs = observation::encode(&after, target.as_ref(), &self.config);
        let info = StepInfo {
            episode_id: self.episode.id,
            step: self.episode.step_count,
            distance,
            reward,
            outcome,
            recovered,
        };
        Ok((obs, total, done, info))
    }
}

impl<W: HostWorld> Env for PursuitEnv<W> {
    type Obs = Observation;
    type Act = Action;
    type Info = StepInfo;

    fn reset(&mut self) -> Result<Self::Obs, EnvError> {
        let seeker_height = self.world.seeker_pose().y;
        let target_height = self.world.target_pose().map_or(0.0, |t| t.y);
        let spawned = spawn::spawn(&self.config, &mut self.rng, seeker_height, target_height);
        self.begin(spawned.seeker, spawned.target, Some(spawned))
    }

    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError> {
        let decoded = action::decode(&act, self.config.action_space, self.config.integration);
        self.advance(decoded)
    }

    fn close(&mut self) -> Result<(), EnvError> {
        self.episode = EpisodeState::idle();
        Ok(())
    }
}
