//! Deterministic stub environments for tests
use super::{EnvError, EnvStep, Environment, Observation};

/// Every episode lasts exactly `episode_len` steps and each step yields the same reward.
///
/// Actions are accepted but ignored. The observation encodes the step index.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedEpisodeEnv {
    pub episode_len: usize,
    pub reward: f64,
    pub observation_dim: usize,
    pub num_actions: usize,
    /// Current step in the episode, `None` when the episode is finished.
    step: Option<usize>,
    pub num_resets: usize,
}

impl FixedEpisodeEnv {
    pub const fn new(episode_len: usize, reward: f64) -> Self {
        Self {
            episode_len,
            reward,
            observation_dim: 4,
            num_actions: 2,
            step: None,
            num_resets: 0,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn observation(&self, step: usize) -> Observation {
        let mut observation = vec![0.0; self.observation_dim];
        observation[0] = step as f32 / self.episode_len as f32;
        observation
    }
}

impl Environment for FixedEpisodeEnv {
    fn observation_dim(&self) -> usize {
        self.observation_dim
    }

    fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.step = Some(0);
        self.num_resets += 1;
        Ok(self.observation(0))
    }

    fn step(&mut self, action: usize) -> Result<EnvStep, EnvError> {
        if action >= self.num_actions {
            return Err(EnvError::InvalidAction {
                action,
                num_actions: self.num_actions,
            });
        }
        let step = self.step.ok_or(EnvError::EpisodeFinished)? + 1;
        let terminated = step >= self.episode_len;
        self.step = if terminated { None } else { Some(step) };
        Ok(EnvStep {
            observation: self.observation(step),
            reward: self.reward,
            terminated,
            truncated: false,
        })
    }
}

/// Single-step episodes whose reward is a function of the (1-based) episode index.
pub struct ScheduledRewardEnv<F> {
    schedule: F,
    episode: usize,
    done: bool,
}

impl<F: FnMut(usize) -> f64> ScheduledRewardEnv<F> {
    pub const fn new(schedule: F) -> Self {
        Self {
            schedule,
            episode: 0,
            done: true,
        }
    }
}

impl<F: FnMut(usize) -> f64> Environment for ScheduledRewardEnv<F> {
    fn observation_dim(&self) -> usize {
        4
    }

    fn num_actions(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.episode += 1;
        self.done = false;
        Ok(vec![0.0; 4])
    }

    fn step(&mut self, _action: usize) -> Result<EnvStep, EnvError> {
        if self.done {
            return Err(EnvError::EpisodeFinished);
        }
        self.done = true;
        Ok(EnvStep {
            observation: vec![0.0; 4],
            reward: (self.schedule)(self.episode),
            terminated: true,
            truncated: false,
        })
    }
}

/// Wraps an environment and reports a simulator failure on the `fail_at`-th step overall.
pub struct FailingEnv<E> {
    pub inner: E,
    pub fail_at: usize,
    steps: usize,
}

impl<E> FailingEnv<E> {
    pub const fn new(inner: E, fail_at: usize) -> Self {
        Self {
            inner,
            fail_at,
            steps: 0,
        }
    }
}

impl<E: Environment> Environment for FailingEnv<E> {
    fn observation_dim(&self) -> usize {
        self.inner.observation_dim()
    }

    fn num_actions(&self) -> usize {
        self.inner.num_actions()
    }

    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.inner.reset()
    }

    fn step(&mut self, action: usize) -> Result<EnvStep, EnvError> {
        self.steps += 1;
        if self.steps == self.fail_at {
            return Err(EnvError::Simulator("injected failure".into()));
        }
        self.inner.step(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_episode_terminates_on_time() {
        let mut env = FixedEpisodeEnv::new(5, 1.0);
        env.reset().unwrap();
        for _ in 0..4 {
            assert!(!env.step(0).unwrap().terminated);
        }
        assert!(env.step(1).unwrap().terminated);
        assert_eq!(env.step(0), Err(EnvError::EpisodeFinished));
    }

    #[test]
    fn scheduled_reward_follows_episode_index() {
        let mut env = ScheduledRewardEnv::new(|episode| episode as f64);
        for episode in 1..=3 {
            env.reset().unwrap();
            let step = env.step(0).unwrap();
            assert!(step.terminated);
            assert!((step.reward - episode as f64).abs() < f64::EPSILON);
        }
    }
}
