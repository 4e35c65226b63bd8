//! State value critics
use crate::torch::modules::{BuildModule, Mlp, MlpConfig};
use crate::torch::optimizers::{AdamConfig, BuildOptimizer, OnceOptimizer, OptimizerStepError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tch::nn::{Module, VarStore};
use tch::{nn, Device, Reduction, Tensor};

/// Estimates the value of a state (expected discounted return) from its observation.
pub trait StateValue {
    /// Estimated value of the state with the given observation.
    ///
    /// A scalar tensor that tracks gradients to the critic parameters.
    fn evaluate(&self, observation: &[f32]) -> Tensor;
}

/// A critic that can be trained by regression onto target returns.
pub trait LearningCritic: StateValue {
    /// Take a gradient step on the mean squared error between `values` and `targets`.
    ///
    /// # Returns
    /// The critic loss.
    fn update(&mut self, values: &Tensor, targets: &Tensor) -> Result<f64, OptimizerStepError>;
}

/// Configuration for [`ValueCritic`]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCriticConfig<OC = AdamConfig> {
    pub value_fn_config: MlpConfig,
    pub optimizer_config: OC,
}

impl<OC> ValueCriticConfig<OC>
where
    OC: BuildOptimizer,
{
    pub fn build_critic(
        &self,
        observation_dim: usize,
        device: Device,
    ) -> Result<ValueCritic<OC::Optimizer>, OC::Error> {
        let vs = VarStore::new(device);
        let value_fn = self
            .value_fn_config
            .build_module(&(&vs.root() / "value"), observation_dim, 1);
        let optimizer = self.optimizer_config.build_optimizer(&vs)?;
        Ok(ValueCritic {
            vs,
            value_fn,
            optimizer,
        })
    }
}

/// Critic that predicts state values with an MLP.
pub struct ValueCritic<O = nn::Optimizer> {
    vs: VarStore,
    value_fn: Mlp,
    optimizer: O,
}

impl<O> fmt::Debug for ValueCritic<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ValueCritic")
            .field("value_fn", &self.value_fn)
            .field("device", &self.vs.device())
            .finish_non_exhaustive()
    }
}

impl<O> ValueCritic<O> {
    /// Trainable parameters of the critic.
    pub const fn vars(&self) -> &VarStore {
        &self.vs
    }
}

impl<O> StateValue for ValueCritic<O> {
    fn evaluate(&self, observation: &[f32]) -> Tensor {
        let input = Tensor::of_slice(observation).to_device(self.vs.device());
        self.value_fn.forward(&input).squeeze()
    }
}

impl<O: OnceOptimizer> LearningCritic for ValueCritic<O> {
    fn update(&mut self, values: &Tensor, targets: &Tensor) -> Result<f64, OptimizerStepError> {
        let loss = values.mse_loss(targets, Reduction::Mean);
        self.optimizer.backward_step_once(&loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn critic() -> ValueCritic {
        ValueCriticConfig {
            value_fn_config: MlpConfig::single_hidden(16),
            optimizer_config: AdamConfig::with_learning_rate(0.01),
        }
        .build_critic(3, Device::Cpu)
        .unwrap()
    }

    #[rstest]
    fn evaluate_is_scalar(critic: ValueCritic) {
        let value = critic.evaluate(&[0.1, 0.2, 0.3]);
        assert_eq!(value.size(), Vec::<i64>::new());
        assert!(value.requires_grad());
    }

    #[rstest]
    fn update_fits_targets(mut critic: ValueCritic) {
        let observations = [[1.0_f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let targets = Tensor::of_slice(&[1.0_f32, -1.0, 0.5]);
        let mut losses = Vec::new();
        for _ in 0..200 {
            let values = Tensor::stack(
                &observations
                    .iter()
                    .map(|o| critic.evaluate(o))
                    .collect::<Vec<_>>(),
                0,
            );
            losses.push(critic.update(&values, &targets).unwrap());
        }
        assert!(losses.last().unwrap() < &1e-2, "final loss {:?}", losses.last());
        assert!(losses.last().unwrap() < losses.first().unwrap());
    }
}
