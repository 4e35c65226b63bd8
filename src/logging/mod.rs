//! Logging statistics from training runs
//!
//! Free-form progress messages use the [`log`] facade.
//! Numeric time series go through a [`StatsLogger`], which groups the values logged for one
//! episode and summarizes them over chunks of episodes.
mod display;

pub use display::DisplayLogger;

use std::fmt;
use thiserror::Error;

/// A value that can be logged.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Loggable {
    /// A scalar value. Aggregated by mean and standard deviation.
    Scalar(f64),
    /// Increment of a monotonic counter. Aggregated by summing.
    CounterIncrement(u64),
}

impl Loggable {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::CounterIncrement(_) => "counter",
        }
    }
}

impl From<f64> for Loggable {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<f32> for Loggable {
    #[inline]
    fn from(value: f32) -> Self {
        Self::Scalar(value.into())
    }
}

/// Logged value incompatible with earlier values of the same name.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("\"{name}\": incompatible value {value:?}, expected {expected}")]
pub struct LogError {
    name: String,
    value: Loggable,
    expected: &'static str,
}

impl LogError {
    pub fn new(name: impl Into<String>, value: Loggable, expected: &'static str) -> Self {
        Self {
            name: name.into(),
            value,
            expected,
        }
    }
}

/// Log statistics from a training run.
///
/// Values are logged in groups; one group per episode.
pub trait StatsLogger {
    /// Start a new group of logs.
    fn group_start(&mut self);

    /// Log a value within the current group.
    ///
    /// # Returns
    /// An error if the value is structurally incompatible with previous values logged under the
    /// same name.
    fn group_log(&mut self, name: &'static str, value: Loggable) -> Result<(), LogError>;

    /// End the current group.
    fn group_end(&mut self);

    /// Write out any pending summaries.
    fn flush(&mut self);

    /// Log a scalar value within the current group.
    ///
    /// Incompatible values are reported as a warning and otherwise ignored.
    fn group_log_scalar(&mut self, name: &'static str, value: f64) {
        if let Err(err) = self.group_log(name, Loggable::Scalar(value)) {
            log::warn!("{}", err);
        }
    }

    /// Log a counter increment within the current group.
    ///
    /// Incompatible values are reported as a warning and otherwise ignored.
    fn group_log_counter(&mut self, name: &'static str, increment: u64) {
        if let Err(err) = self.group_log(name, Loggable::CounterIncrement(increment)) {
            log::warn!("{}", err);
        }
    }
}

/// Logger that does nothing
impl StatsLogger for () {
    #[inline]
    fn group_start(&mut self) {}
    #[inline]
    fn group_log(&mut self, _: &'static str, _: Loggable) -> Result<(), LogError> {
        Ok(())
    }
    #[inline]
    fn group_end(&mut self) {}
    #[inline]
    fn flush(&mut self) {}
}

impl<T: StatsLogger + ?Sized> StatsLogger for &mut T {
    #[inline]
    fn group_start(&mut self) {
        T::group_start(self)
    }
    #[inline]
    fn group_log(&mut self, name: &'static str, value: Loggable) -> Result<(), LogError> {
        T::group_log(self, name, value)
    }
    #[inline]
    fn group_end(&mut self) {
        T::group_end(self)
    }
    #[inline]
    fn flush(&mut self) {
        T::flush(self)
    }
}

/// Display a [`Loggable`] kind name, used in error messages.
impl fmt::Display for Loggable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{} {}", self.kind(), v),
            Self::CounterIncrement(v) => write!(f, "{} +{}", self.kind(), v),
        }
    }
}
