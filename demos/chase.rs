use clap::Parser;
use tracing_subscriber::EnvFilter;

use pursuit::control::{GreedyPursuer, RandomSource, SourcePolicy};
use pursuit::rollout::{RolloutConfig, collect, evaluate_parallel};
use pursuit::{ActionSpaceKind, Config, IntegrationMode, KinematicWorld, PursuitEnv, VecEnv};

/// Runs the scripted pursuer and a random baseline against the pursuit env.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Base seed; episode `i` uses `seed + i`.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    #[arg(long, default_value_t = 8)]
    episodes: usize,

    /// Use the two-axis continuous action space.
    #[arg(long)]
    continuous: bool,

    /// Turn-and-advance kinematics instead of strafing.
    #[arg(long)]
    turn: bool,

    /// JSON config file; flags above override its action space and mode.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    let kind = if args.continuous {
        ActionSpaceKind::Continuous2
    } else {
        ActionSpaceKind::Discrete4
    };
    let mode = if args.turn { IntegrationMode::Turn } else { IntegrationMode::Strafe };
    config = config.with_action_space(kind).with_integration(mode);
    config.validate()?;

    println!("greedy pursuer, {} episodes ({kind:?}, {mode:?})", args.episodes);
    let env_config = config.clone();
    let summaries = evaluate_parallel(
        move |i| {
            let seed = args.seed + i as u64;
            Ok(PursuitEnv::with_seed(env_config.clone(), KinematicWorld::new(), seed)?)
        },
        move |_| GreedyPursuer::new(kind, mode),
        args.episodes,
    )
    .await?;
    for (i, summary) in summaries.iter().enumerate() {
        println!(
            "  episode {i}: {:>4} steps, return {:>7.3}, {}",
            summary.steps,
            summary.total_reward,
            summary.outcome.map_or("unfinished", |o| o.label()),
        );
    }

    println!("random baseline, {} episodes", args.episodes);
    let mut envs = VecEnv::try_new(
        |i| PursuitEnv::with_seed(config.clone(), KinematicWorld::new(), args.seed + i as u64),
        4,
    )?;
    let policy = SourcePolicy::new(RandomSource::new(kind, args.seed));
    let rollout = RolloutConfig { max_steps: None, max_episodes: Some(args.episodes as u64) };
    let stats = collect(&mut envs, &policy, &rollout).await?;
    println!(
        "  {} steps in {:?}, success rate {:.2}, mean return {:.3}",
        stats.total_steps,
        stats.elapsed,
        stats.success_rate(),
        stats.mean_return(),
    );

    envs.close()?;
    Ok(())
}
