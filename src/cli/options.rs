//! Command-line options
use super::{Update, WithUpdate};
use crate::error::ConfigError;
use crate::simulation::Hyperparameters;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tch::Device;

#[derive(Parser, Debug)]
#[command(version, author, about)]
pub struct Options {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Train an actor-critic agent on the cart-pole simulator
    Train(TrainOptions),
    /// Evaluate a saved policy on the cart-pole simulator
    Evaluate(EvaluateOptions),
}

#[derive(Args, Debug)]
pub struct TrainOptions {
    #[command(flatten)]
    pub hyperparameters: HyperparameterOptions,

    #[arg(long)]
    /// Save the trained policy parameters to this file
    pub checkpoint: Option<PathBuf>,

    #[arg(long)]
    /// Write the training scores and evaluation report to this JSON file
    pub scores_out: Option<PathBuf>,

    #[arg(long, default_value_t = 10)]
    /// Number of evaluation episodes run after training (0 to skip)
    pub eval_episodes: usize,

    #[arg(long, default_value_t = 100)]
    /// Display statistics summaries every this many episodes
    pub display_interval: u64,
}

#[derive(Args, Debug)]
pub struct EvaluateOptions {
    #[command(flatten)]
    pub hyperparameters: HyperparameterOptions,

    #[arg(long)]
    /// Policy parameters saved by a training run
    pub checkpoint: PathBuf,

    #[arg(long, default_value_t = 10)]
    /// Number of evaluation episodes
    pub episodes: usize,

    #[arg(long)]
    /// Write the evaluation report to this JSON file
    pub scores_out: Option<PathBuf>,
}

/// Hyperparameter file and per-field overrides.
#[derive(Args, Debug, Default)]
pub struct HyperparameterOptions {
    #[arg(long)]
    /// JSON file of hyperparameters. Flags override its values.
    pub config: Option<PathBuf>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Hidden layer size of the actor and critic networks
    pub hidden_size: Option<usize>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Maximum number of training episodes
    pub num_episodes: Option<usize>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Maximum number of steps per episode
    pub max_steps: Option<usize>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Discount factor in (0, 1]
    pub discount_factor: Option<f64>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Learning rate of the actor and critic optimizers
    pub learning_rate: Option<f64>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Log score window statistics every this many episodes
    pub log_interval: Option<usize>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Stop training once the rolling mean score reaches this value
    pub early_stopping_threshold: Option<f64>,

    #[arg(long, help_heading = "Hyperparameters", conflicts_with = "early_stopping_threshold")]
    /// Disable early stopping
    pub no_early_stopping: bool,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Number of recent episode scores in the rolling window
    pub window_size: Option<usize>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Run on the CUDA device with this index
    pub cuda: Option<usize>,

    #[arg(long, help_heading = "Hyperparameters")]
    /// Random seed
    pub seed: Option<u64>,
}

impl HyperparameterOptions {
    /// Hyperparameters from the configuration file (or defaults) with the flag overrides applied.
    pub fn hyperparameters(&self) -> Result<Hyperparameters, ConfigError> {
        let base = match &self.config {
            Some(path) => Hyperparameters::from_json_file(path)?,
            None => Hyperparameters::default(),
        };
        let hyperparameters = base.with_update(self);
        hyperparameters.validate()?;
        Ok(hyperparameters)
    }
}

impl Update<&HyperparameterOptions> for Hyperparameters {
    fn update(&mut self, opts: &HyperparameterOptions) {
        if let Some(hidden_size) = opts.hidden_size {
            self.hidden_size = hidden_size;
        }
        if let Some(num_episodes) = opts.num_episodes {
            self.num_episodes = num_episodes;
        }
        if let Some(max_steps) = opts.max_steps {
            self.max_steps = max_steps;
        }
        if let Some(discount_factor) = opts.discount_factor {
            self.discount_factor = discount_factor;
        }
        if let Some(learning_rate) = opts.learning_rate {
            self.learning_rate = learning_rate;
        }
        if let Some(log_interval) = opts.log_interval {
            self.log_interval = log_interval;
        }
        if opts.no_early_stopping {
            self.early_stopping_threshold = None;
        } else if let Some(threshold) = opts.early_stopping_threshold {
            self.early_stopping_threshold = Some(threshold);
        }
        if let Some(window_size) = opts.window_size {
            self.window_size = window_size;
        }
        if let Some(index) = opts.cuda {
            self.device = Device::Cuda(index);
        }
        if let Some(seed) = opts.seed {
            self.seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_train_overrides() {
        let opts = Options::try_parse_from([
            "lander-a2c",
            "train",
            "--hidden-size",
            "64",
            "--discount-factor",
            "0.9",
            "--no-early-stopping",
            "--checkpoint",
            "policy.ot",
        ])
        .unwrap();
        let train = match opts.command {
            Command::Train(train) => train,
            Command::Evaluate(_) => panic!("expected train"),
        };
        let hyperparameters = train.hyperparameters.hyperparameters().unwrap();
        assert_eq!(hyperparameters.hidden_size, 64);
        assert!((hyperparameters.discount_factor - 0.9).abs() < f64::EPSILON);
        assert_eq!(hyperparameters.early_stopping_threshold, None);
        assert_eq!(hyperparameters.num_episodes, Hyperparameters::default().num_episodes);
        assert_eq!(train.checkpoint, Some(PathBuf::from("policy.ot")));
        assert_eq!(train.eval_episodes, 10);
    }

    #[test]
    fn evaluate_requires_checkpoint() {
        assert!(Options::try_parse_from(["lander-a2c", "evaluate"]).is_err());
        let opts =
            Options::try_parse_from(["lander-a2c", "evaluate", "--checkpoint", "p.ot"]).unwrap();
        assert!(matches!(opts.command, Command::Evaluate(_)));
    }

    #[test]
    fn invalid_override_rejected() {
        let opts = HyperparameterOptions {
            discount_factor: Some(0.0),
            ..HyperparameterOptions::default()
        };
        assert!(matches!(
            opts.hyperparameters(),
            Err(ConfigError::DiscountFactor(_))
        ));
    }

    #[test]
    fn update_keeps_unset_fields() {
        let opts = HyperparameterOptions {
            cuda: Some(0),
            seed: Some(9),
            ..HyperparameterOptions::default()
        };
        let hyperparameters = Hyperparameters::default().with_update(&opts);
        assert_eq!(hyperparameters.device, Device::Cuda(0));
        assert_eq!(hyperparameters.seed, 9);
        assert_eq!(
            hyperparameters.learning_rate,
            Hyperparameters::default().learning_rate
        );
    }
}
