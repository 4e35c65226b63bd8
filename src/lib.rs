//! Advantage actor-critic training for a simulated lander.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)]
pub mod cli;
pub mod envs;
mod error;
pub mod logging;
pub mod simulation;
pub mod torch;
pub mod utils;

pub use envs::{EnvError, EnvStep, Environment};
pub use error::{A2cError, ConfigError};
pub use simulation::{
    evaluate, generate_trajectory, train, EvaluationReport, Hyperparameters, TrainOutcome,
    TrainState, Trajectory,
};
pub use torch::agents::{ActorCriticAgent, CategoricalPolicy, ValueCritic};

/// Pseudo-random number generator used for all sampling.
pub type Prng = rand_chacha::ChaCha8Rng;
