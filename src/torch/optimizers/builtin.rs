//! Torch optimizer wrappers and configuration
use super::{BaseOptimizer, BuildOptimizer, OnceOptimizer, OptimizerStepError};
use serde::{Deserialize, Serialize};
use tch::nn::{self, OptimizerConfig, VarStore};
use tch::{TchError, Tensor};

impl BaseOptimizer for nn::Optimizer {
    fn zero_grad(&mut self) {
        nn::Optimizer::zero_grad(self);
    }
}

impl OnceOptimizer for nn::Optimizer {
    fn step_once(&mut self) -> Result<(), OptimizerStepError> {
        nn::Optimizer::step(self);
        Ok(())
    }

    fn backward_step_once(&mut self, loss: &Tensor) -> Result<f64, OptimizerStepError> {
        let loss_value = f64::from(loss);
        if loss_value.is_nan() {
            return Err(OptimizerStepError::NaNLoss);
        }
        BaseOptimizer::zero_grad(self);
        loss.backward();
        self.step_once()?;
        Ok(loss_value)
    }
}

/// Configuration for the Adam optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    /// Learning rate
    pub learning_rate: f64,
    /// Coefficient for the running average of the gradient
    pub beta1: f64,
    /// Coefficient for the running average of the square of the gradient
    pub beta2: f64,
    /// Weight decay (L2 penalty)
    pub weight_decay: f64,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            weight_decay: 0.0,
        }
    }
}

impl AdamConfig {
    /// Default Adam coefficients with the given learning rate.
    pub fn with_learning_rate(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..Self::default()
        }
    }
}

impl BuildOptimizer for AdamConfig {
    type Optimizer = nn::Optimizer;
    type Error = TchError;

    fn build_optimizer(&self, vs: &VarStore) -> Result<Self::Optimizer, Self::Error> {
        nn::Adam {
            beta1: self.beta1,
            beta2: self.beta2,
            wd: self.weight_decay,
        }
        .build(vs, self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing;
    use super::*;
    use tch::{Device, Kind};

    #[test]
    fn adam_optimizes_quadratic() {
        testing::check_optimizes_quadratic(&AdamConfig::with_learning_rate(1e-1), 500);
    }

    #[test]
    fn nan_loss_leaves_parameters_unchanged() {
        let vs = VarStore::new(Device::Cpu);
        let x = vs.root().zeros("x", &[2]);
        let mut optimizer = AdamConfig::default().build_optimizer(&vs).unwrap();
        #[allow(clippy::eq_op)]
        let loss = (&x / &x).sum(Kind::Float);
        assert_eq!(
            optimizer.backward_step_once(&loss),
            Err(OptimizerStepError::NaNLoss)
        );
        assert_eq!(Vec::<f32>::from(&x), vec![0.0, 0.0]);
    }

    #[test]
    fn only_updates_own_variables() {
        let vs_a = VarStore::new(Device::Cpu);
        let vs_b = VarStore::new(Device::Cpu);
        let a = vs_a.root().ones("a", &[1]);
        let b = vs_b.root().ones("b", &[1]);
        let mut optimizer = AdamConfig::with_learning_rate(0.1)
            .build_optimizer(&vs_a)
            .unwrap();

        let loss = (&a * &b).sum(Kind::Float);
        optimizer.backward_step_once(&loss).unwrap();

        assert!(f64::from(&a.sum(Kind::Float)) < 1.0);
        assert!((f64::from(&b.sum(Kind::Float)) - 1.0).abs() < f64::EPSILON);
    }
}
