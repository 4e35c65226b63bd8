//! Training and evaluation drivers
mod evaluate;
mod hyperparameters;
mod train;
mod trajectory;

pub use evaluate::{evaluate, EvaluationReport};
pub use hyperparameters::Hyperparameters;
pub use train::{train, TrainOutcome, TrainState};
pub use trajectory::{generate_trajectory, EpisodeEnd, Trajectory, Transition};
