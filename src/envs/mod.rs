//! Reinforcement learning environments
mod cartpole;
mod step_limit;
#[cfg(test)]
pub mod testing;

pub use cartpole::{CartPole, CartPoleConfig, EnvironmentParams, PhysicalConstants, Push};
pub use step_limit::StepLimit;

use thiserror::Error;

/// A fixed-length observation vector.
pub type Observation = Vec<f32>;

/// The result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvStep {
    /// Observation of the resulting state.
    ///
    /// Still present when the episode terminated; its value is then irrelevant to learning.
    pub observation: Observation,
    /// Reward for this transition.
    pub reward: f64,
    /// The simulator reached one of its own terminal states.
    pub terminated: bool,
    /// The episode was cut off before reaching a terminal state (e.g. by a step limit).
    pub truncated: bool,
}

impl EnvStep {
    /// Whether this step ends the episode, for any reason.
    #[inline]
    pub const fn episode_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A reinforcement learning environment with internal state.
///
/// Observations are fixed-length vectors of [`Environment::observation_dim`] features and
/// actions are indices in `0..num_actions()`.
pub trait Environment {
    /// Number of features in each observation.
    fn observation_dim(&self) -> usize;

    /// Size of the finite action set.
    fn num_actions(&self) -> usize;

    /// Reset the environment to an initial state.
    ///
    /// Must be called before each new episode.
    fn reset(&mut self) -> Result<Observation, EnvError>;

    /// Take a step in the environment.
    ///
    /// Returns an error if the environment has not been reset since the last step that ended
    /// the episode, or if the action is outside of the action set.
    fn step(&mut self, action: usize) -> Result<EnvStep, EnvError>;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn observation_dim(&self) -> usize {
        E::observation_dim(self)
    }
    fn num_actions(&self) -> usize {
        E::num_actions(self)
    }
    fn reset(&mut self) -> Result<Observation, EnvError> {
        E::reset(self)
    }
    fn step(&mut self, action: usize) -> Result<EnvStep, EnvError> {
        E::step(self, action)
    }
}

/// Malformed environment interaction.
///
/// Always fatal for the episode in progress; episode state is not resumable mid-step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    #[error("observation has {actual} features, expected {expected}")]
    ObservationShape { expected: usize, actual: usize },
    #[error("action {action} is outside of the action set of size {num_actions}")]
    InvalidAction { action: usize, num_actions: usize },
    #[error("step called on a finished episode; the environment must be reset")]
    EpisodeFinished,
    #[error("simulator failure: {0}")]
    Simulator(String),
}

/// Check that an observation has the expected number of features.
pub fn check_observation<E: Environment + ?Sized>(
    env: &E,
    observation: &[f32],
) -> Result<(), EnvError> {
    let expected = env.observation_dim();
    if observation.len() == expected {
        Ok(())
    } else {
        Err(EnvError::ObservationShape {
            expected,
            actual: observation.len(),
        })
    }
}
