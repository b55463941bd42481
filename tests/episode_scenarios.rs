use pursuit::env::{
    Env, EnvError, KinematicWorld, Outcome, Phase, PoseProvider, PursuitEnv, ReachedVia,
};
use pursuit::{Action, ActionSpaceKind, Config, IntegrationMode, ObservationLayout, Pose};

const EPS: f32 = 1e-5;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

fn seeded(config: Config, seed: u64) -> PursuitEnv {
    PursuitEnv::with_seed(config, KinematicWorld::new(), seed).unwrap()
}

#[test]
fn forward_step_closes_distance() {
    let mut env = seeded(Config::default(), 0);
    env.reset_with_poses(Pose::planar(0.0, 0.0, 0.0), Pose::planar(0.0, 2.0, 0.0)).unwrap();

    let (obs, reward, done, info) = env.step(Action::FORWARD).unwrap();
    assert!(!done);

    // move_speed * dt = 0.04 toward the target.
    let seeker = env.world().seeker_pose();
    assert!(close(seeker.x, 0.0));
    assert!(close(seeker.z, 0.04));
    assert!(close(info.distance.unwrap(), 1.96));
    assert!(close(info.reward.shaped, 0.04));
    assert!(close(reward, -0.001 + 0.04));

    assert!(close(obs[0], 0.0));
    assert!(close(obs[1], 1.96 / 5.0));
    assert!(close(obs[2], 0.0));
    assert!(close(obs[3], 1.0));
    assert!(close(obs[4], 1.96 / 5.0));
    assert!(close(obs[5], 0.0));
}

#[test]
fn standing_at_success_distance_reaches() {
    let config = Config::default()
        .with_action_space(ActionSpaceKind::Continuous2)
        .with_success_distance(0.8);
    let mut env = seeded(config, 0);
    env.reset_with_poses(Pose::planar(0.0, 0.0, 0.0), Pose::planar(0.0, 0.8, 0.0)).unwrap();

    let (_, reward, done, info) = env.step(Action::Continuous([0.0, 0.0])).unwrap();
    assert!(done);
    assert_eq!(info.outcome, Some(Outcome::Reached { via: ReachedVia::Proximity }));
    assert!(reward >= 1.0 + env.config().time_penalty - EPS);
    assert_eq!(env.phase(), Phase::Terminal);
}

#[test]
fn times_out_after_exactly_max_steps() {
    let config = Config::default()
        .with_action_space(ActionSpaceKind::Continuous2)
        .with_max_steps(5);
    let mut env = seeded(config, 0);
    env.reset_with_poses(Pose::planar(0.0, 0.0, 0.0), Pose::planar(4.0, 4.0, 0.0)).unwrap();

    for step in 1..5 {
        let (_, reward, done, info) = env.step(Action::Continuous([0.0, 0.0])).unwrap();
        assert!(!done, "ended early at step {step}");
        assert_eq!(info.step, step);
        assert!(close(reward, -0.001));
    }
    let (_, reward, done, info) = env.step(Action::Continuous([0.0, 0.0])).unwrap();
    assert!(done);
    assert_eq!(info.outcome, Some(Outcome::Timeout));
    assert_eq!(info.reward.bonus, 0.0);
    assert!(close(reward, -0.001));
    assert!(matches!(
        env.step(Action::Continuous([0.0, 0.0])),
        Err(EnvError::InvalidState(Phase::Terminal))
    ));
}

#[test]
fn same_seed_same_episodes() {
    let mut a = seeded(Config::default(), 42);
    let mut b = seeded(Config::default(), 42);
    for _ in 0..3 {
        assert_eq!(a.reset().unwrap(), b.reset().unwrap());
        for action in [Action::FORWARD, Action::RIGHT, Action::BACKWARD] {
            let (obs_a, rew_a, done_a, _) = a.step(action).unwrap();
            let (obs_b, rew_b, done_b, _) = b.step(action).unwrap();
            assert_eq!(obs_a, obs_b);
            assert_eq!(rew_a, rew_b);
            assert_eq!(done_a, done_b);
        }
    }

    let mut c = seeded(Config::default(), 43);
    let mut d = seeded(Config::default(), 42);
    assert_ne!(c.reset().unwrap(), d.reset().unwrap());
}

#[test]
fn reseeding_replays_a_reset() {
    let mut env = seeded(Config::default(), 1);
    let first = env.reset_with_seed(9).unwrap();
    env.reset().unwrap();
    assert_eq!(env.reset_with_seed(9).unwrap(), first);
}

#[test]
fn turn_mode_rotates_in_place_then_advances() {
    let config = Config::default().with_integration(IntegrationMode::Turn);
    let mut env = seeded(config, 0);
    env.reset_with_poses(Pose::planar(0.0, 0.0, 0.0), Pose::planar(3.0, 3.0, 0.0)).unwrap();

    env.step(Action::RIGHT).unwrap();
    let turned = env.world().seeker_pose();
    // 120 deg/s over 0.02 s.
    assert!(close(turned.heading, 2.4f32.to_radians()));
    assert!(close(turned.x, 0.0) && close(turned.z, 0.0));

    env.step(Action::FORWARD).unwrap();
    let moved = env.world().seeker_pose();
    assert!(close(moved.x, 0.04 * turned.heading.sin()));
    assert!(close(moved.z, 0.04 * turned.heading.cos()));

    // Turning left past zero wraps into [0, 2π).
    env.step(Action::LEFT).unwrap();
    env.step(Action::LEFT).unwrap();
    let wrapped = env.world().seeker_pose().heading;
    assert!((0.0..std::f32::consts::TAU).contains(&wrapped));
    assert!(close(wrapped, std::f32::consts::TAU - 2.4f32.to_radians()));
}

#[test]
fn continuous_input_is_clamped() {
    let config = Config::default()
        .with_action_space(ActionSpaceKind::Continuous2)
        .with_integration(IntegrationMode::Turn);
    let mut env = seeded(config, 0);
    env.reset_with_poses(Pose::planar(0.0, 0.0, 0.0), Pose::planar(4.0, 4.0, 0.0)).unwrap();

    // (2, -3) behaves like (1, -1): full throttle, full left turn.
    env.step(Action::Continuous([2.0, -3.0])).unwrap();
    let pose = env.world().seeker_pose();
    let heading = std::f32::consts::TAU - 2.4f32.to_radians();
    assert!(close(pose.heading, heading));
    assert!(close(pose.x, 0.04 * heading.sin()));
    assert!(close(pose.z, 0.04 * heading.cos()));
}

#[test]
fn wrong_action_kind_is_recovered() {
    let mut env = seeded(Config::default(), 0);
    env.reset_with_poses(Pose::planar(0.0, 0.0, 0.0), Pose::planar(4.0, 4.0, 0.0)).unwrap();
    let (_, _, done, info) = env.step(Action::Continuous([1.0, 0.0])).unwrap();
    assert!(!done);
    assert_eq!(info.recovered.len(), 1);
    assert_eq!(env.world().seeker_pose(), Pose::planar(0.0, 0.0, 0.0));
}

#[test]
fn config_from_json_drives_layout() {
    let config = Config::from_json_str(
        r#"{ "action_space": "continuous2", "observation": "compact", "half_size": 4.0 }"#,
    )
    .unwrap();
    assert_eq!(config.observation, ObservationLayout::Compact);

    let mut env = seeded(config, 5);
    assert_eq!(env.observation_size(), 4);
    assert_eq!(env.action_size(), 2);
    let obs = env.reset().unwrap();
    assert_eq!(obs.len(), 4);
    let spawn = env.last_reset().unwrap().spawn.unwrap();
    for pose in [spawn.seeker, spawn.target] {
        assert!(pose.x.abs() <= 4.0 && pose.z.abs() <= 4.0);
    }
}

#[test]
fn contact_radius_reaches_through_host_signal() {
    let world = KinematicWorld::new().with_contact_radius(1.5);
    let mut env = PursuitEnv::with_seed(Config::default(), world, 0).unwrap();
    env.reset_with_poses(Pose::planar(0.0, 0.0, 0.0), Pose::planar(0.0, 1.2, 0.0)).unwrap();
    let (_, _, done, info) = env.step(Action::BACKWARD).unwrap();
    assert!(done);
    assert_eq!(info.outcome, Some(Outcome::Reached { via: ReachedVia::Contact }));
    assert_eq!(info.reward.bonus, 1.0);
}
