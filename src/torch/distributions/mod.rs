//! Torch statistical distributions
mod categorical;

pub use categorical::{sample, Categorical, DistributionError};
