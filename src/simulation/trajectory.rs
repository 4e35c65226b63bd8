//! Single-episode rollouts
use crate::envs::{self, Environment};
use crate::torch::agents::{Policy, StateValue};
use crate::{A2cError, Prng};
use tch::Tensor;

/// One step of a rollout.
#[derive(Debug)]
pub struct Transition {
    /// Log probability of the action taken. Tracks gradients to the policy parameters.
    pub log_prob: Tensor,
    /// Reward received for the step.
    pub reward: f64,
    /// Value estimate of the state the action was taken in.
    /// Tracks gradients to the critic parameters.
    pub value: Tensor,
}

/// How an episode ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EpisodeEnd {
    /// The environment reached a terminal state.
    Terminated,
    /// The episode was cut off, either by the environment or by the step limit of the rollout.
    Truncated,
}

/// The transitions of one episode, in order.
#[derive(Debug)]
pub struct Trajectory {
    transitions: Vec<Transition>,
    end: EpisodeEnd,
}

impl Trajectory {
    pub const fn new(transitions: Vec<Transition>, end: EpisodeEnd) -> Self {
        Self { transitions, end }
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub const fn end(&self) -> EpisodeEnd {
        self.end
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Per-step rewards
    pub fn rewards(&self) -> Vec<f64> {
        self.transitions.iter().map(|t| t.reward).collect()
    }

    /// Undiscounted sum of rewards
    pub fn total_reward(&self) -> f64 {
        self.transitions.iter().map(|t| t.reward).sum()
    }

    /// Action log probabilities stacked into a tensor of shape `[NUM_STEPS]`.
    ///
    /// # Panics
    /// If the trajectory is empty.
    pub fn log_probs(&self) -> Tensor {
        let log_probs: Vec<_> = self.transitions.iter().map(|t| &t.log_prob).collect();
        Tensor::stack(&log_probs, 0)
    }

    /// State value estimates stacked into a tensor of shape `[NUM_STEPS]`.
    ///
    /// # Panics
    /// If the trajectory is empty.
    pub fn values(&self) -> Tensor {
        let values: Vec<_> = self.transitions.iter().map(|t| &t.value).collect();
        Tensor::stack(&values, 0)
    }
}

/// Run one episode of `policy` in `env`, recording the critic value estimate of each state.
///
/// The episode ends when the environment terminates or truncates it,
/// or after `max_steps` steps, whichever comes first.
///
/// # Args
/// * `env` - Environment. Reset at the start of the episode.
/// * `policy` - Samples the actions.
/// * `critic` - Evaluates each state an action is taken in.
/// * `max_steps` - Maximum number of steps in the episode.
/// * `rng` - Random state for action sampling.
pub fn generate_trajectory<E, P, C>(
    env: &mut E,
    policy: &P,
    critic: &C,
    max_steps: usize,
    rng: &mut Prng,
) -> Result<Trajectory, A2cError>
where
    E: Environment + ?Sized,
    P: Policy + ?Sized,
    C: StateValue + ?Sized,
{
    let mut observation = env.reset()?;
    envs::check_observation(env, &observation)?;

    let mut transitions = Vec::with_capacity(max_steps);
    let mut end = EpisodeEnd::Truncated;
    for _ in 0..max_steps {
        let (action, log_prob) = policy.act(&observation, rng)?;
        let value = critic.evaluate(&observation);
        let step = env.step(action)?;
        transitions.push(Transition {
            log_prob,
            reward: step.reward,
            value,
        });

        if step.terminated {
            end = EpisodeEnd::Terminated;
            break;
        }
        if step.truncated {
            break;
        }
        envs::check_observation(env, &step.observation)?;
        observation = step.observation;
    }
    Ok(Trajectory::new(transitions, end))
}
