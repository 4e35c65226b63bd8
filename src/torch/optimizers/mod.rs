//! Optimizers
mod builtin;

pub use builtin::AdamConfig;

use std::error::Error;
use tch::{nn::VarStore, Tensor};
use thiserror::Error;

/// Base optimizer interface
pub trait BaseOptimizer {
    /// Zero out the gradients of all optimized tensors
    fn zero_grad(&mut self);
}

/// Optimizer that minimizes a loss tensor using a single gradient evaluation per step.
///
/// An optimizer only ever updates the variables it was built from.
pub trait OnceOptimizer: BaseOptimizer {
    /// Perform a loss minimization step (parameter update).
    ///
    /// Uses the existing gradients stored with the parameter tensors.
    fn step_once(&mut self) -> Result<(), OptimizerStepError>;

    /// Clear the gradients, back-propagate `loss` and perform an optimization step.
    ///
    /// If the loss is NaN the parameters are left unchanged and an error is returned.
    ///
    /// # Returns
    /// The value of `loss` on success.
    fn backward_step_once(&mut self, loss: &Tensor) -> Result<f64, OptimizerStepError>;
}

/// Error performing an optimization step.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OptimizerStepError {
    #[error("loss is NaN")]
    NaNLoss,
}

/// Build an optimizer
pub trait BuildOptimizer {
    type Optimizer;
    type Error: Error;

    /// Build an optimizer for the trainable variables in a variable store.
    fn build_optimizer(&self, vs: &VarStore) -> Result<Self::Optimizer, Self::Error>;
}
