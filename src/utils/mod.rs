//! Utilities
pub mod fmt;
pub mod returns;
pub mod stats;
pub mod window;

pub use returns::{discounted_returns, standardize};
pub use window::{ScoreWindow, WindowSummary};
