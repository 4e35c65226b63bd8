use super::{EnvError, EnvStep, Environment, Observation};

/// Environment wrapper that cuts off episodes after a set number of steps.
///
/// The step that reaches the limit is marked `truncated` unless the inner environment already
/// terminated on that step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepLimit<E> {
    inner: E,
    /// Maximum number of steps per episode
    max_steps_per_episode: u64,
    current_steps: u64,
}

impl<E> StepLimit<E> {
    pub const fn new(inner: E, max_steps_per_episode: u64) -> Self {
        Self {
            inner,
            max_steps_per_episode,
            current_steps: 0,
        }
    }

    /// The wrapped environment.
    pub const fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Environment> Environment for StepLimit<E> {
    fn observation_dim(&self) -> usize {
        self.inner.observation_dim()
    }

    fn num_actions(&self) -> usize {
        self.inner.num_actions()
    }

    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.current_steps = 0;
        self.inner.reset()
    }

    fn step(&mut self, action: usize) -> Result<EnvStep, EnvError> {
        let mut step = self.inner.step(action)?;
        self.current_steps += 1;
        if self.current_steps >= self.max_steps_per_episode && !step.terminated {
            step.truncated = true;
        }
        Ok(step)
    }
}
