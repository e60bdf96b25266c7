//! Speaking-time evaluator.
//!
//! A pure function of elapsed seconds. Answers inside the optimal window
//! get the full score; outside it the score drops by one point for every
//! `step_seconds` away from the midpoint, floored at zero.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::model::{TimingLabel, TimingResult};

/// Highest score the timing evaluator awards.
pub const MAX_TIMING_SCORE: u8 = 10;

/// Tuning constants for the timing evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingPolicy {
    /// Lower bound of the optimal window, inclusive.
    pub optimal_min_secs: u64,
    /// Upper bound of the optimal window, inclusive.
    pub optimal_max_secs: u64,
    /// Reference point the out-of-window penalty is measured from.
    pub midpoint_secs: u64,
    /// Seconds of distance that cost one point.
    pub step_secs: u64,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            optimal_min_secs: 90,
            optimal_max_secs: 120,
            midpoint_secs: 105,
            step_secs: 5,
        }
    }
}

impl TimingPolicy {
    /// Reject policies the evaluator cannot apply.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.step_secs > 0, "timing.step_secs must be positive");
        anyhow::ensure!(
            self.optimal_min_secs <= self.optimal_max_secs,
            "timing.optimal_min_secs ({}) exceeds timing.optimal_max_secs ({})",
            self.optimal_min_secs,
            self.optimal_max_secs
        );
        Ok(())
    }

    /// Score an elapsed speaking time.
    pub fn evaluate(&self, elapsed_secs: u64) -> TimingResult {
        if (self.optimal_min_secs..=self.optimal_max_secs).contains(&elapsed_secs) {
            return TimingResult {
                score: MAX_TIMING_SCORE,
                label: TimingLabel::AppropriatePacing,
            };
        }

        let penalty = elapsed_secs.abs_diff(self.midpoint_secs) / self.step_secs.max(1);
        let score = u64::from(MAX_TIMING_SCORE).saturating_sub(penalty) as u8;
        TimingResult {
            score,
            label: TimingLabel::OutsideOptimalRange,
        }
    }
}

/// Score an elapsed speaking time with the default policy.
pub fn evaluate_timing(elapsed_secs: u64) -> TimingResult {
    TimingPolicy::default().evaluate(elapsed_secs)
}
