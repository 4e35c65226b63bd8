//! Categorical distribution
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;
use tch::{Device, Kind, Tensor};
use thiserror::Error;

/// Categorical distribution over `0..num_events`.
#[derive(Debug)]
pub struct Categorical {
    /// Normalized log probability of each event.
    ///
    /// An f32 tensor of shape `[NUM_EVENTS]`.
    log_probs: Tensor,
}

impl Categorical {
    /// Initialize from possibly unnormalized log probabilities.
    ///
    /// The log probabilities are normalized by adding some value `C` to each
    /// such that `sum_i exp(log_prob[i] + C) = 1`.
    pub fn new(logits: &Tensor) -> Self {
        Self {
            log_probs: logits.log_softmax(-1, Kind::Float),
        }
    }

    /// Number of events
    pub fn num_events(&self) -> usize {
        self.log_probs.size().last().map_or(0, |&n| n as usize)
    }

    /// Probability of each event.
    pub fn probabilities(&self) -> Tensor {
        self.log_probs.exp()
    }

    /// Differentiable log probability of an event.
    #[allow(clippy::cast_possible_wrap)]
    pub fn log_prob(&self, index: usize) -> Tensor {
        self.log_probs.get(index as i64)
    }

    /// Sample an event, returning it with its differentiable log probability.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(usize, Tensor), DistributionError> {
        let probabilities = Vec::<f32>::from(&self.probabilities().detach().to_device(Device::Cpu));
        let (index, _) = sample(&probabilities, rng)?;
        Ok((index, self.log_prob(index)))
    }
}

/// Sample an index from a vector of event probabilities.
///
/// # Returns
/// The sampled index and its log probability.
pub fn sample<R: Rng + ?Sized>(
    probabilities: &[f32],
    rng: &mut R,
) -> Result<(usize, f64), DistributionError> {
    let dist = WeightedIndex::<f32>::new(probabilities)?;
    let index = dist.sample(rng);
    Ok((index, f64::from(probabilities[index]).ln()))
}

/// Invalid event probabilities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid event probabilities")]
pub struct DistributionError(#[from] WeightedError);
