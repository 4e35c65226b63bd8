//! Advantage actor-critic agent
use super::critic::{LearningCritic, ValueCritic, ValueCriticConfig};
use super::policy::{CategoricalPolicy, CategoricalPolicyConfig, LearningPolicy};
use crate::logging::StatsLogger;
use crate::simulation::Trajectory;
use crate::torch::modules::MlpConfig;
use crate::torch::optimizers::{AdamConfig, OptimizerStepError};
use crate::torch::serialize::DeviceDef;
use crate::utils::{discounted_returns, standardize};
use log::warn;
use serde::{Deserialize, Serialize};
use tch::{Device, Kind, TchError, Tensor};

/// Configuration for [`ActorCriticAgent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorCriticConfig {
    pub policy_config: CategoricalPolicyConfig,
    pub critic_config: ValueCriticConfig,
    #[serde(with = "DeviceDef")]
    pub device: Device,
}

impl Default for ActorCriticConfig {
    #[inline]
    fn default() -> Self {
        Self {
            policy_config: CategoricalPolicyConfig::default(),
            critic_config: ValueCriticConfig::default(),
            device: Device::Cpu,
        }
    }
}

impl ActorCriticConfig {
    /// Actor and critic with one hidden layer each, both trained by Adam at the same rate.
    pub fn new(hidden_size: usize, learning_rate: f64, device: Device) -> Self {
        Self {
            policy_config: CategoricalPolicyConfig {
                policy_fn_config: MlpConfig::single_hidden(hidden_size),
                optimizer_config: AdamConfig::with_learning_rate(learning_rate),
            },
            critic_config: ValueCriticConfig {
                value_fn_config: MlpConfig::single_hidden(hidden_size),
                optimizer_config: AdamConfig::with_learning_rate(learning_rate),
            },
            device,
        }
    }

    pub fn build_agent(
        &self,
        observation_dim: usize,
        num_actions: usize,
    ) -> Result<ActorCriticAgent, TchError> {
        let policy = self
            .policy_config
            .build_policy(observation_dim, num_actions, self.device)?;
        let critic = self
            .critic_config
            .build_critic(observation_dim, self.device)?;
        Ok(ActorCriticAgent::new(policy, critic, self.device))
    }
}

/// Statistics of one actor-critic update.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct UpdateStats {
    /// Mean squared error of the critic before its update.
    pub critic_loss: f64,
    /// Policy gradient surrogate loss before the actor update.
    pub policy_loss: f64,
    /// Mean advantage over the trajectory.
    pub mean_advantage: f64,
}

/// Actor-critic agent. Consists of a [`Policy`](super::Policy) (actor) and a
/// [`StateValue`](super::StateValue) critic,
/// each with its own parameters and optimizer.
#[derive(Debug)]
pub struct ActorCriticAgent<P = CategoricalPolicy, C = ValueCritic> {
    policy: P,
    critic: C,
    /// Device on which update targets are created.
    device: Device,
}

impl<P, C> ActorCriticAgent<P, C> {
    pub const fn new(policy: P, critic: C, device: Device) -> Self {
        Self {
            policy,
            critic,
            device,
        }
    }

    pub const fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub const fn critic(&self) -> &C {
        &self.critic
    }
}

impl<P, C> ActorCriticAgent<P, C>
where
    P: LearningPolicy,
    C: LearningCritic,
{
    /// Update the critic and then the actor from one complete episode.
    ///
    /// The discounted returns of the episode are standardized and used as regression targets
    /// for the critic. The advantage of each step is its standardized return minus the value
    /// estimate recorded during the rollout (before the critic update).
    ///
    /// If either loss is NaN, an error is returned and that module is not stepped.
    /// A NaN critic loss skips the actor update as well.
    pub fn update(
        &mut self,
        trajectory: &Trajectory,
        discount_factor: f64,
        logger: &mut dyn StatsLogger,
    ) -> Result<UpdateStats, OptimizerStepError> {
        if trajectory.is_empty() {
            warn!("skipping update on an empty trajectory");
            return Ok(UpdateStats::default());
        }

        let returns = discounted_returns(&trajectory.rewards(), discount_factor);
        #[allow(clippy::cast_possible_truncation)]
        let targets: Vec<f32> = standardize(&returns)
            .into_iter()
            .map(|x| x as f32)
            .collect();
        let targets = Tensor::of_slice(&targets).to_device(self.device);

        let values = trajectory.values();
        let critic_loss = self.critic.update(&values, &targets)?;

        let advantages = &targets - values.detach();
        let mean_advantage = f64::from(&advantages.mean(Kind::Float));
        let policy_loss = self
            .policy
            .update(&trajectory.log_probs(), &advantages, logger)?;

        Ok(UpdateStats {
            critic_loss,
            policy_loss,
            mean_advantage,
        })
    }
}
