//! Episodic actor-critic training
use super::{generate_trajectory, Hyperparameters};
use crate::envs::Environment;
use crate::logging::StatsLogger;
use crate::torch::agents::{ActorCriticAgent, LearningCritic, LearningPolicy};
use crate::utils::{ScoreWindow, WindowSummary};
use crate::{A2cError, Prng};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// State of a training run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainState {
    /// Episodes remain and the stopping criterion has not been met.
    Running,
    /// The mean score of a full window reached the early stopping threshold.
    EarlyStopped,
    /// All configured episodes were run.
    Exhausted,
}

/// Result of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainOutcome {
    /// Terminal state
    pub state: TrainState,
    /// Total reward of each episode run, in order.
    pub scores: Vec<f64>,
    /// Number of episodes run.
    pub episodes: usize,
    /// Summary of the score window after the last episode; `None` if no episode was run.
    pub window: Option<WindowSummary>,
}

/// Train an actor-critic agent with one update per episode.
///
/// Each episode is rolled out to completion, then the critic and the actor are updated from
/// its rewards. Training stops after `num_episodes` episodes or as soon as the rolling window
/// of episode scores is full and its mean reaches the early stopping threshold.
///
/// An update with a NaN loss is skipped with a warning; the episode still counts.
///
/// # Args
/// * `agent` - Agent to train.
/// * `env` - Training environment. Must match the configured dimensions.
/// * `hyperparameters` - Run configuration.
/// * `rng` - Random state for action sampling.
/// * `logger` - Receives one group of statistics per episode. Every `log_interval` episodes
///              the group also holds the window mean, max and min.
pub fn train<E, P, C>(
    agent: &mut ActorCriticAgent<P, C>,
    env: &mut E,
    hyperparameters: &Hyperparameters,
    rng: &mut Prng,
    logger: &mut dyn StatsLogger,
) -> Result<TrainOutcome, A2cError>
where
    E: Environment + ?Sized,
    P: LearningPolicy,
    C: LearningCritic,
{
    hyperparameters.validate()?;
    hyperparameters.check_env(env)?;

    let mut window = ScoreWindow::new(hyperparameters.window_size);
    let mut scores = Vec::with_capacity(hyperparameters.num_episodes);
    let mut state = TrainState::Running;

    for episode in 1..=hyperparameters.num_episodes {
        let trajectory = generate_trajectory(
            env,
            agent.policy(),
            agent.critic(),
            hyperparameters.max_steps,
            rng,
        )?;
        let score = trajectory.total_reward();
        window.push(score);
        scores.push(score);

        #[allow(clippy::cast_precision_loss)]
        let length = trajectory.len() as f64;
        logger.group_start();
        logger.group_log_scalar("episode_reward", score);
        logger.group_log_scalar("episode_length", length);
        logger.group_log_counter("env_steps", trajectory.len() as u64);
        match agent.update(&trajectory, hyperparameters.discount_factor, logger) {
            Ok(stats) => {
                logger.group_log_scalar("critic_loss", stats.critic_loss);
                logger.group_log_scalar("policy_loss", stats.policy_loss);
                logger.group_log_scalar("mean_advantage", stats.mean_advantage);
            }
            Err(err) => warn!("episode {}: update skipped: {}", episode, err),
        }
        let summary = window.summary();
        if episode % hyperparameters.log_interval == 0 {
            if let Some(summary) = &summary {
                logger.group_log_scalar("window_mean", summary.mean);
                logger.group_log_scalar("window_max", summary.max);
                logger.group_log_scalar("window_min", summary.min);
                info!("episode {}: {}", episode, DisplayWindow(summary));
            }
        }
        logger.group_end();

        if let (Some(threshold), Some(summary)) =
            (hyperparameters.early_stopping_threshold, &summary)
        {
            if window.is_full() && summary.mean >= threshold {
                info!("solved at episode {}: {}", episode, DisplayWindow(summary));
                state = TrainState::EarlyStopped;
                break;
            }
        }
    }
    logger.flush();

    if state == TrainState::Running {
        state = TrainState::Exhausted;
    }
    Ok(TrainOutcome {
        state,
        episodes: scores.len(),
        scores,
        window: window.summary(),
    })
}

struct DisplayWindow<'a>(&'a WindowSummary);

impl std::fmt::Display for DisplayWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "window mean {:.2}, max {:.2}, min {:.2}",
            self.0.mean, self.0.max, self.0.min
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::testing::{FailingEnv, FixedEpisodeEnv, ScheduledRewardEnv};
    use crate::envs::EnvError;
    use crate::logging::testing::RecordingLogger;
    use crate::torch::agents::testing::{agent, TestAgent};
    use crate::ConfigError;
    use rand::SeedableRng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hyperparameters() -> Hyperparameters {
        Hyperparameters {
            hidden_size: 16,
            num_episodes: 20,
            max_steps: 10,
            observation_dim: 4,
            num_actions: 2,
            log_interval: 5,
            early_stopping_threshold: None,
            ..Hyperparameters::default()
        }
    }

    #[rstest]
    fn early_stop_when_window_mean_reaches_threshold(
        mut agent: TestAgent,
        hyperparameters: Hyperparameters,
    ) {
        // The window of the last 100 scores first averages 230 at episode 150
        let mut env = ScheduledRewardEnv::new(|episode| if episode <= 50 { 0.0 } else { 230.0 });
        let hyperparameters = Hyperparameters {
            num_episodes: 500,
            log_interval: 50,
            early_stopping_threshold: Some(230.0),
            ..hyperparameters
        };
        let mut rng = Prng::seed_from_u64(0);
        let outcome = train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut ()).unwrap();

        assert_eq!(outcome.state, TrainState::EarlyStopped);
        assert_eq!(outcome.episodes, 150);
        assert_eq!(outcome.scores.len(), 150);
        assert!(outcome.scores[..50].iter().all(|&s| s == 0.0));
        assert!(outcome.scores[50..].iter().all(|&s| s == 230.0));
        assert_eq!(
            outcome.window,
            Some(WindowSummary {
                mean: 230.0,
                max: 230.0,
                min: 230.0
            })
        );
    }

    #[rstest]
    fn threshold_not_reached_exhausts(mut agent: TestAgent, hyperparameters: Hyperparameters) {
        let mut env = FixedEpisodeEnv::new(3, 1.0);
        let hyperparameters = Hyperparameters {
            early_stopping_threshold: Some(100.0),
            window_size: 5,
            ..hyperparameters
        };
        let mut rng = Prng::seed_from_u64(1);
        let outcome = train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut ()).unwrap();
        assert_eq!(outcome.state, TrainState::Exhausted);
        assert_eq!(outcome.scores, vec![3.0; 20]);
    }

    #[rstest]
    fn early_stop_requires_full_window(mut agent: TestAgent, hyperparameters: Hyperparameters) {
        let mut env = FixedEpisodeEnv::new(3, 1.0);
        let hyperparameters = Hyperparameters {
            early_stopping_threshold: Some(3.0),
            window_size: 8,
            ..hyperparameters
        };
        let mut rng = Prng::seed_from_u64(2);
        let outcome = train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut ()).unwrap();
        assert_eq!(outcome.state, TrainState::EarlyStopped);
        assert_eq!(outcome.episodes, 8);
    }

    #[rstest]
    fn logs_one_group_per_episode(mut agent: TestAgent, hyperparameters: Hyperparameters) {
        let mut env = FixedEpisodeEnv::new(4, 0.5);
        let mut rng = Prng::seed_from_u64(3);
        let mut logger = RecordingLogger::default();
        let outcome =
            train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut logger).unwrap();

        assert_eq!(logger.groups.len(), outcome.episodes);
        assert_eq!(logger.scalars("episode_reward"), vec![2.0; 20]);
        assert_eq!(logger.scalars("episode_length"), vec![4.0; 20]);
        for name in ["critic_loss", "policy_loss", "policy_entropy", "mean_advantage"] {
            assert_eq!(logger.scalars(name).len(), 20, "{}", name);
        }
        assert_eq!(logger.counter_total("env_steps"), 80);
    }

    #[rstest]
    fn window_statistics_logged_every_interval(
        mut agent: TestAgent,
        hyperparameters: Hyperparameters,
    ) {
        #[allow(clippy::cast_precision_loss)]
        let mut env = ScheduledRewardEnv::new(|episode| (episode % 7) as f64);
        let hyperparameters = Hyperparameters {
            window_size: 8,
            ..hyperparameters
        };
        let mut rng = Prng::seed_from_u64(6);
        let mut logger = RecordingLogger::default();
        let outcome =
            train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut logger).unwrap();

        let mut window = ScoreWindow::new(8);
        let mut expected = Vec::new();
        for (i, (&score, group)) in outcome.scores.iter().zip(&logger.groups).enumerate() {
            window.push(score);
            let logged = group.iter().any(|(name, _)| *name == "window_mean");
            assert_eq!(logged, (i + 1) % 5 == 0, "episode {}", i + 1);
            if logged {
                expected.push(window.summary().unwrap());
            }
        }
        // Episode 5 summarizes a partial window
        assert_eq!(expected.len(), 4);
        assert_eq!(
            logger.scalars("window_mean"),
            expected.iter().map(|s| s.mean).collect::<Vec<_>>()
        );
        assert_eq!(
            logger.scalars("window_max"),
            expected.iter().map(|s| s.max).collect::<Vec<_>>()
        );
        assert_eq!(
            logger.scalars("window_min"),
            expected.iter().map(|s| s.min).collect::<Vec<_>>()
        );
        assert_eq!(outcome.window, window.summary());
    }

    #[rstest]
    fn environment_failure_stops_training(mut agent: TestAgent, hyperparameters: Hyperparameters) {
        // Fails on the first step of the third episode
        let mut env = FailingEnv::new(FixedEpisodeEnv::new(3, 1.0), 7);
        let mut rng = Prng::seed_from_u64(4);
        let mut logger = RecordingLogger::default();
        let result = train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut logger);
        assert!(matches!(
            result,
            Err(A2cError::Env(EnvError::Simulator(_)))
        ));
        assert_eq!(logger.groups.len(), 2);
    }

    #[rstest]
    fn dimension_mismatch_rejected(mut agent: TestAgent, hyperparameters: Hyperparameters) {
        let mut env = FixedEpisodeEnv::new(3, 1.0);
        let hyperparameters = Hyperparameters {
            observation_dim: 8,
            ..hyperparameters
        };
        let mut rng = Prng::seed_from_u64(5);
        let result = train(&mut agent, &mut env, &hyperparameters, &mut rng, &mut ());
        assert!(matches!(
            result,
            Err(A2cError::Config(ConfigError::DimensionMismatch { .. }))
        ));
        assert_eq!(env.num_resets, 0);
    }
}
