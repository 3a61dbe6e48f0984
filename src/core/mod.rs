pub mod planner;
pub mod progress;
pub mod tracker;

pub use progress::{evaluate, Countdown, Dashboard, Evaluation, Risk, RiskThresholds};
pub use tracker::{Award, Tracker};
