use clap::Parser;
use lander_a2c::cli::{Command, EvaluateOptions, Options, TrainOptions};
use lander_a2c::envs::{CartPole, CartPoleConfig, Environment, StepLimit};
use lander_a2c::logging::DisplayLogger;
use lander_a2c::{evaluate, train, EvaluationReport, Hyperparameters, Prng, TrainOutcome};
use log::info;
use rand::SeedableRng;
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Scores written by `--scores-out`.
#[derive(Serialize)]
struct ScoresReport<'a> {
    hyperparameters: &'a Hyperparameters,
    training: Option<&'a TrainOutcome>,
    evaluation: Option<&'a EvaluationReport>,
}

/// Cart-pole environment with the configured episode step limit.
///
/// Sets the environment dimensions in `hyperparameters`.
fn build_env(hyperparameters: &mut Hyperparameters) -> StepLimit<CartPole> {
    let env = StepLimit::new(
        CartPoleConfig::default().build(hyperparameters.seed.wrapping_add(1)),
        hyperparameters.max_steps as u64,
    );
    hyperparameters.observation_dim = env.observation_dim();
    hyperparameters.num_actions = env.num_actions();
    env
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), value)?;
    info!("wrote {}", path.display());
    Ok(())
}

fn log_evaluation(report: &EvaluationReport) {
    info!(
        "evaluation over {} episodes: mean reward {:.2}, mean steps {:.1}",
        report.rewards.len(),
        report.mean_reward,
        report.mean_steps
    );
}

fn run_train(opts: &TrainOptions) -> Result<(), Box<dyn Error>> {
    let mut hyperparameters = opts.hyperparameters.hyperparameters()?;
    let mut env = build_env(&mut hyperparameters);
    info!("{:?}", hyperparameters);

    #[allow(clippy::cast_possible_wrap)]
    let torch_seed = hyperparameters.seed as i64;
    tch::manual_seed(torch_seed);
    let mut agent = hyperparameters
        .agent_config()
        .build_agent(hyperparameters.observation_dim, hyperparameters.num_actions)?;
    let mut rng = Prng::seed_from_u64(hyperparameters.seed);
    let mut logger = DisplayLogger::new(opts.display_interval);

    let outcome = train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut logger)?;
    info!(
        "training finished: {:?} after {} episodes",
        outcome.state, outcome.episodes
    );
    if let Some(window) = &outcome.window {
        info!(
            "final window: mean {:.2}, max {:.2}, min {:.2}",
            window.mean, window.max, window.min
        );
    }

    if let Some(path) = &opts.checkpoint {
        agent.policy().save(path)?;
        info!("saved policy to {}", path.display());
    }

    let evaluation = if opts.eval_episodes > 0 {
        let report = evaluate(
            agent.policy(),
            &mut env,
            opts.eval_episodes,
            hyperparameters.max_steps,
            &mut rng,
        )?;
        log_evaluation(&report);
        Some(report)
    } else {
        None
    };

    if let Some(path) = &opts.scores_out {
        let report = ScoresReport {
            hyperparameters: &hyperparameters,
            training: Some(&outcome),
            evaluation: evaluation.as_ref(),
        };
        write_json(path, &report)?;
    }
    Ok(())
}

fn run_evaluate(opts: &EvaluateOptions) -> Result<(), Box<dyn Error>> {
    let mut hyperparameters = opts.hyperparameters.hyperparameters()?;
    let mut env = build_env(&mut hyperparameters);

    let mut policy = hyperparameters.agent_config().policy_config.build_policy(
        hyperparameters.observation_dim,
        hyperparameters.num_actions,
        hyperparameters.device,
    )?;
    policy.load(&opts.checkpoint)?;
    info!("loaded policy from {}", opts.checkpoint.display());

    let mut rng = Prng::seed_from_u64(hyperparameters.seed);
    let report = evaluate(
        &policy,
        &mut env,
        opts.episodes,
        hyperparameters.max_steps,
        &mut rng,
    )?;
    log_evaluation(&report);

    if let Some(path) = &opts.scores_out {
        let report = ScoresReport {
            hyperparameters: &hyperparameters,
            training: None,
            evaluation: Some(&report),
        };
        write_json(path, &report)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let opts = Options::parse();
    match &opts.command {
        Command::Train(train_opts) => run_train(train_opts),
        Command::Evaluate(evaluate_opts) => run_evaluate(evaluate_opts),
    }
}
