//! Torch agents
mod actor_critic;
mod critic;
mod policy;

pub use actor_critic::{ActorCriticAgent, ActorCriticConfig, UpdateStats};
pub use critic::{LearningCritic, StateValue, ValueCritic, ValueCriticConfig};
pub use policy::{CategoricalPolicy, CategoricalPolicyConfig, LearningPolicy, Policy};

#[cfg(test)]
pub mod testing {
    use super::{ActorCriticAgent, ActorCriticConfig};
    use rstest::fixture;
    use tch::Device;

    pub type TestAgent = ActorCriticAgent;

    /// Small agent for 4 observation features and 2 actions.
    #[fixture]
    pub fn agent() -> TestAgent {
        ActorCriticConfig::new(16, 0.01, Device::Cpu)
            .build_agent(4, 2)
            .unwrap()
    }
}
