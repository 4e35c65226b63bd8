//! Discounted returns and return standardization
use super::stats::OnlineMeanVariance;

/// Discounted return of each step of an episode.
///
/// `returns[t] = rewards[t] + discount_factor * returns[t + 1]`
/// where the return following the final step is 0.
pub fn discounted_returns(rewards: &[f64], discount_factor: f64) -> Vec<f64> {
    let mut returns = vec![0.0; rewards.len()];
    let mut next_return = 0.0;
    for (ret, reward) in returns.iter_mut().zip(rewards).rev() {
        next_return = reward + discount_factor * next_return;
        *ret = next_return;
    }
    returns
}

/// Stabilizing constant added to the standard deviation in [`standardize`].
///
/// Machine epsilon of the `f32` precision used by the networks.
pub const STANDARDIZE_EPS: f64 = f32::EPSILON as f64;

/// Shift to zero mean and scale to unit (sample) standard deviation.
///
/// The denominator is `std + STANDARDIZE_EPS` so a constant sequence maps to all zeros instead
/// of dividing by zero. Sequences with fewer than two elements have a standard deviation of 0.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    let stats: OnlineMeanVariance<f64> = values.iter().copied().collect();
    let mean = stats.mean();
    let denominator = stats.sample_stddev().unwrap_or(0.0) + STANDARDIZE_EPS;
    values.iter().map(|v| (v - mean) / denominator).collect()
}
