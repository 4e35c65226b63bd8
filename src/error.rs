//! Error type
use crate::envs::EnvError;
use crate::torch::checkpoint::CheckpointError;
use crate::torch::distributions::DistributionError;
use std::io;
use std::path::PathBuf;
use tch::TchError;
use thiserror::Error;

/// Error from the A2C crate.
#[derive(Error, Debug)]
pub enum A2cError {
    #[error("environment error")]
    Env(#[from] EnvError),
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    #[error("checkpoint error")]
    Checkpoint(#[from] CheckpointError),
    #[error("unable to sample an action")]
    Distribution(#[from] DistributionError),
    #[error("torch error")]
    Torch(#[from] TchError),
}

/// Invalid hyperparameter or configuration source.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be positive")]
    NotPositive { name: &'static str },
    #[error("discount factor must be in (0, 1], got {0}")]
    DiscountFactor(f64),
    #[error("learning rate must be positive and finite, got {0}")]
    LearningRate(f64),
    #[error(
        "environment has {env_observation_dim} observation features and {env_num_actions} \
         actions; configured for {observation_dim} and {num_actions}"
    )]
    DimensionMismatch {
        observation_dim: usize,
        num_actions: usize,
        env_observation_dim: usize,
        env_num_actions: usize,
    },
    #[error("unable to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
