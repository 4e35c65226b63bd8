//! Training run configuration
use crate::envs::Environment;
use crate::error::ConfigError;
use crate::torch::agents::ActorCriticConfig;
use crate::torch::serialize::DeviceDef;
use crate::utils::ScoreWindow;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tch::Device;

/// Hyperparameters of an actor-critic training run.
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Size of the hidden layer of both the actor and the critic.
    pub hidden_size: usize,
    /// Maximum number of training episodes.
    pub num_episodes: usize,
    /// Maximum number of steps per episode.
    pub max_steps: usize,
    /// Discount factor in `(0, 1]`.
    pub discount_factor: f64,
    /// Learning rate of both optimizers.
    pub learning_rate: f64,
    /// Number of observation features.
    pub observation_dim: usize,
    /// Number of actions.
    pub num_actions: usize,
    /// Log the score window statistics every this many episodes.
    pub log_interval: usize,
    /// Stop once the mean score of a full window reaches this value.
    pub early_stopping_threshold: Option<f64>,
    /// Number of recent episode scores in the rolling window.
    pub window_size: usize,
    #[serde(with = "DeviceDef")]
    pub device: Device,
    /// Random seed for parameter initialization, the environment and action sampling.
    pub seed: u64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            hidden_size: 128,
            num_episodes: 2000,
            max_steps: 1000,
            discount_factor: 0.99,
            learning_rate: 1e-3,
            observation_dim: 8,
            num_actions: 4,
            log_interval: 100,
            early_stopping_threshold: Some(230.0),
            window_size: ScoreWindow::DEFAULT_CAPACITY,
            device: Device::Cpu,
            seed: 0,
        }
    }
}

impl Hyperparameters {
    /// Read hyperparameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Check that all values are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("hidden_size", self.hidden_size),
            ("num_episodes", self.num_episodes),
            ("max_steps", self.max_steps),
            ("observation_dim", self.observation_dim),
            ("num_actions", self.num_actions),
            ("log_interval", self.log_interval),
            ("window_size", self.window_size),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive { name: *name });
        }
        if !(self.discount_factor > 0.0 && self.discount_factor <= 1.0) {
            return Err(ConfigError::DiscountFactor(self.discount_factor));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        Ok(())
    }

    /// Check that the configured dimensions match an environment.
    pub fn check_env<E: Environment + ?Sized>(&self, env: &E) -> Result<(), ConfigError> {
        if env.observation_dim() == self.observation_dim && env.num_actions() == self.num_actions {
            Ok(())
        } else {
            Err(ConfigError::DimensionMismatch {
                observation_dim: self.observation_dim,
                num_actions: self.num_actions,
                env_observation_dim: env.observation_dim(),
                env_num_actions: env.num_actions(),
            })
        }
    }

    /// Configuration of the actor-critic agent described by these hyperparameters.
    pub fn agent_config(&self) -> ActorCriticConfig {
        ActorCriticConfig::new(self.hidden_size, self.learning_rate, self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::testing::FixedEpisodeEnv;
    use rstest::rstest;

    #[test]
    fn default_is_valid() {
        assert!(Hyperparameters::default().validate().is_ok());
    }

    #[rstest]
    #[case::hidden_size(Hyperparameters { hidden_size: 0, ..Default::default() }, "hidden_size")]
    #[case::num_episodes(Hyperparameters { num_episodes: 0, ..Default::default() }, "num_episodes")]
    #[case::max_steps(Hyperparameters { max_steps: 0, ..Default::default() }, "max_steps")]
    #[case::log_interval(Hyperparameters { log_interval: 0, ..Default::default() }, "log_interval")]
    #[case::window_size(Hyperparameters { window_size: 0, ..Default::default() }, "window_size")]
    fn zero_rejected(#[case] hyperparameters: Hyperparameters, #[case] expected: &str) {
        match hyperparameters.validate() {
            Err(ConfigError::NotPositive { name }) => assert_eq!(name, expected),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[rstest]
    fn discount_factor_range(#[values(0.0, -0.5, 1.5, f64::NAN)] discount_factor: f64) {
        let hyperparameters = Hyperparameters {
            discount_factor,
            ..Hyperparameters::default()
        };
        assert!(matches!(
            hyperparameters.validate(),
            Err(ConfigError::DiscountFactor(_))
        ));
    }

    #[rstest]
    fn learning_rate_range(#[values(0.0, -1e-3, f64::INFINITY, f64::NAN)] learning_rate: f64) {
        let hyperparameters = Hyperparameters {
            learning_rate,
            ..Hyperparameters::default()
        };
        assert!(matches!(
            hyperparameters.validate(),
            Err(ConfigError::LearningRate(_))
        ));
    }

    #[test]
    fn discount_factor_one_allowed() {
        let hyperparameters = Hyperparameters {
            discount_factor: 1.0,
            ..Hyperparameters::default()
        };
        assert!(hyperparameters.validate().is_ok());
    }

    #[test]
    fn env_dimension_mismatch() {
        let env = FixedEpisodeEnv::new(5, 1.0);
        assert!(matches!(
            Hyperparameters::default().check_env(&env),
            Err(ConfigError::DimensionMismatch {
                env_observation_dim: 4,
                env_num_actions: 2,
                ..
            })
        ));
        let hyperparameters = Hyperparameters {
            observation_dim: 4,
            num_actions: 2,
            ..Hyperparameters::default()
        };
        assert!(hyperparameters.check_env(&env).is_ok());
    }

    #[test]
    fn json_partial_uses_defaults() {
        let hyperparameters: Hyperparameters =
            serde_json::from_str(r#"{"hidden_size": 64, "early_stopping_threshold": null}"#)
                .unwrap();
        assert_eq!(hyperparameters.hidden_size, 64);
        assert_eq!(hyperparameters.early_stopping_threshold, None);
        assert_eq!(hyperparameters.window_size, 100);
        assert_eq!(hyperparameters.device, Device::Cpu);
    }

    #[test]
    fn from_json_file_errors() {
        let missing = std::env::temp_dir().join("lander-a2c-missing-config.json");
        assert!(matches!(
            Hyperparameters::from_json_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let path = std::env::temp_dir().join(format!(
            "lander-a2c-{}-bad-config.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();
        let result = Hyperparameters::from_json_file(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
