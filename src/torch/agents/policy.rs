//! Stochastic policies over a finite action set
use crate::logging::StatsLogger;
use crate::torch::checkpoint::{self, CheckpointError};
use crate::torch::distributions::{Categorical, DistributionError};
use crate::torch::modules::{BuildModule, Mlp, MlpConfig};
use crate::torch::optimizers::{AdamConfig, BuildOptimizer, OnceOptimizer, OptimizerStepError};
use crate::Prng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tch::nn::{Module, VarStore};
use tch::{nn, Device, Kind, Tensor};

/// A stochastic policy that samples actions given an observation.
pub trait Policy {
    /// Sample an action for an observation.
    ///
    /// # Returns
    /// The action index and its log probability under the policy.
    /// The log probability tracks gradients to the policy parameters.
    fn act(
        &self,
        observation: &[f32],
        rng: &mut Prng,
    ) -> Result<(usize, Tensor), DistributionError>;
}

/// A policy that can be improved with policy gradient updates.
pub trait LearningPolicy: Policy {
    /// Take a gradient step on `Σ_t −log_prob[t] · advantage[t]`.
    ///
    /// # Args
    /// * `log_probs` - Log probabilities of the actions taken, as returned by [`Policy::act`].
    ///                 A tensor of shape `[NUM_STEPS]`.
    /// * `advantages` - Advantage of each action. Must not track gradients.
    /// * `logger` - Statistics logger with an open group.
    ///
    /// # Returns
    /// The policy loss.
    fn update(
        &mut self,
        log_probs: &Tensor,
        advantages: &Tensor,
        logger: &mut dyn StatsLogger,
    ) -> Result<f64, OptimizerStepError>;
}

/// Configuration for [`CategoricalPolicy`]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalPolicyConfig<OC = AdamConfig> {
    pub policy_fn_config: MlpConfig,
    pub optimizer_config: OC,
}

impl<OC> CategoricalPolicyConfig<OC>
where
    OC: BuildOptimizer,
{
    /// Build a policy for `num_actions` actions given `observation_dim` observation features.
    pub fn build_policy(
        &self,
        observation_dim: usize,
        num_actions: usize,
        device: Device,
    ) -> Result<CategoricalPolicy<OC::Optimizer>, OC::Error> {
        let vs = VarStore::new(device);
        let policy_fn = self
            .policy_fn_config
            .build_module(&(&vs.root() / "policy"), observation_dim, num_actions);
        let optimizer = self.optimizer_config.build_optimizer(&vs)?;
        Ok(CategoricalPolicy {
            vs,
            policy_fn,
            optimizer,
        })
    }
}

/// Policy that samples from a categorical distribution over the logits of an MLP.
pub struct CategoricalPolicy<O = nn::Optimizer> {
    vs: VarStore,
    policy_fn: Mlp,
    optimizer: O,
}

impl<O> fmt::Debug for CategoricalPolicy<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CategoricalPolicy")
            .field("policy_fn", &self.policy_fn)
            .field("device", &self.vs.device())
            .finish_non_exhaustive()
    }
}

impl<O> CategoricalPolicy<O> {
    /// Action distribution for an observation.
    pub fn distribution(&self, observation: &[f32]) -> Categorical {
        let input = Tensor::of_slice(observation).to_device(self.vs.device());
        Categorical::new(&self.policy_fn.forward(&input))
    }

    /// Trainable parameters of the policy.
    pub const fn vars(&self) -> &VarStore {
        &self.vs
    }

    /// Save the policy parameters to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        checkpoint::save_vars(&self.vs, path)
    }

    /// Restore the policy parameters from a file written by [`CategoricalPolicy::save`].
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CheckpointError> {
        checkpoint::load_vars(&mut self.vs, path)
    }
}

impl<O> Policy for CategoricalPolicy<O> {
    fn act(
        &self,
        observation: &[f32],
        rng: &mut Prng,
    ) -> Result<(usize, Tensor), DistributionError> {
        self.distribution(observation).sample(rng)
    }
}

impl<O: OnceOptimizer> LearningPolicy for CategoricalPolicy<O> {
    fn update(
        &mut self,
        log_probs: &Tensor,
        advantages: &Tensor,
        logger: &mut dyn StatsLogger,
    ) -> Result<f64, OptimizerStepError> {
        let loss = -(log_probs * advantages).sum(Kind::Float);
        let policy_loss = self.optimizer.backward_step_once(&loss)?;

        // Monte Carlo estimate of the entropy over the sampled actions
        let entropy = -f64::from(&log_probs.detach().mean(Kind::Float));
        logger.group_log_scalar("policy_entropy", entropy);
        Ok(policy_loss)
    }
}
