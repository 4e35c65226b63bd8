//! Rolling window of episode scores
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Fixed-capacity FIFO window of the most recent episode scores.
///
/// Pushing past capacity evicts the oldest score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWindow {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl ScoreWindow {
    /// Default capacity of the window.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Create an empty window.
    ///
    /// # Panics
    /// If `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be positive");
        Self {
            scores: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, score: f64) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.scores.len() == self.capacity
    }

    /// Scores in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().copied()
    }

    /// Mean, max and min of the scores in the window; `None` if empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> Option<WindowSummary> {
        if self.scores.is_empty() {
            return None;
        }
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        let mut sum = 0.0;
        for score in self.iter() {
            max = max.max(score);
            min = min.min(score);
            sum += score;
        }
        Some(WindowSummary {
            mean: sum / self.scores.len() as f64,
            max,
            min,
        })
    }
}

impl Default for ScoreWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Statistics of a [`ScoreWindow`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}
