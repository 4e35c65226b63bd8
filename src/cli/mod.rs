//! Command-line interface
mod options;

pub use options::{Command, EvaluateOptions, HyperparameterOptions, Options, TrainOptions};

/// Update a configuration with values from `source`, leaving unspecified values unchanged.
pub trait Update<T> {
    fn update(&mut self, source: T);
}

/// Helper for [`Update`] that returns the updated value.
pub trait WithUpdate<T> {
    #[must_use]
    fn with_update(self, source: T) -> Self;
}

impl<T, U: Update<T>> WithUpdate<T> for U {
    fn with_update(mut self, source: T) -> Self {
        self.update(source);
        self
    }
}
