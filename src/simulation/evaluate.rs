//! Policy evaluation without learning
use crate::envs::{self, Environment};
use crate::error::ConfigError;
use crate::torch::agents::Policy;
use crate::utils::stats::OnlineMeanVariance;
use crate::{A2cError, Prng};
use serde::{Deserialize, Serialize};

/// Per-episode results of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Total reward of each episode.
    pub rewards: Vec<f64>,
    /// Number of steps of each episode.
    pub steps: Vec<usize>,
    pub mean_reward: f64,
    pub mean_steps: f64,
}

/// Run a policy for a number of episodes without updating it.
///
/// Actions are sampled from the policy distribution. No gradients are tracked.
/// Each episode runs until the environment terminates or truncates it, or for `max_steps` steps.
pub fn evaluate<E, P>(
    policy: &P,
    env: &mut E,
    num_episodes: usize,
    max_steps: usize,
    rng: &mut Prng,
) -> Result<EvaluationReport, A2cError>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    if num_episodes == 0 {
        return Err(ConfigError::NotPositive {
            name: "num_episodes",
        }
        .into());
    }
    if max_steps == 0 {
        return Err(ConfigError::NotPositive { name: "max_steps" }.into());
    }

    let mut rewards = Vec::with_capacity(num_episodes);
    let mut steps = Vec::with_capacity(num_episodes);
    tch::no_grad(|| {
        for _ in 0..num_episodes {
            let (reward, length) = run_episode(policy, env, max_steps, rng)?;
            rewards.push(reward);
            steps.push(length);
        }
        Ok::<_, A2cError>(())
    })?;

    let mean_reward = rewards.iter().copied().collect::<OnlineMeanVariance<f64>>().mean();
    #[allow(clippy::cast_precision_loss)]
    let mean_steps = steps
        .iter()
        .map(|&s| s as f64)
        .collect::<OnlineMeanVariance<f64>>()
        .mean();
    Ok(EvaluationReport {
        rewards,
        steps,
        mean_reward,
        mean_steps,
    })
}

/// Run one episode, returning its total reward and number of steps.
fn run_episode<E, P>(
    policy: &P,
    env: &mut E,
    max_steps: usize,
    rng: &mut Prng,
) -> Result<(f64, usize), A2cError>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
{
    let mut observation = env.reset()?;
    envs::check_observation(env, &observation)?;
    let mut total_reward = 0.0;
    let mut num_steps = 0;
    while num_steps < max_steps {
        let (action, _) = policy.act(&observation, rng)?;
        let step = env.step(action)?;
        total_reward += step.reward;
        num_steps += 1;
        if step.episode_done() {
            break;
        }
        envs::check_observation(env, &step.observation)?;
        observation = step.observation;
    }
    Ok((total_reward, num_steps))
}
