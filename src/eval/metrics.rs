//! Classification counters and the metrics derived from them.

use serde::{Deserialize, Serialize};

/// Bucket a single evaluated case falls into.
///
/// There is no true-negative bucket: every case carries a label, so a
/// correct "no property" answer cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    FalseNegative,
}

impl Outcome {
    /// Short label used for metrics.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::TruePositive => "tp",
            Outcome::FalsePositive => "fp",
            Outcome::FalseNegative => "fn",
        }
    }
}

/// Running tally of classified cases. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub true_positive: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one case.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TruePositive => self.true_positive += 1,
            Outcome::FalsePositive => self.false_positive += 1,
            Outcome::FalseNegative => self.false_negative += 1,
        }
    }

    /// Number of cases counted so far.
    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.false_negative
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::from_counters(self)
    }
}

/// Precision, recall, F1 and accuracy over a finished tally.
///
/// Every ratio whose denominator is zero is exactly `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
}

impl Metrics {
    pub fn from_counters(counters: &Counters) -> Self {
        Self::compute(
            counters.true_positive,
            counters.false_positive,
            counters.false_negative,
        )
    }

    pub fn compute(tp: u64, fp: u64, fn_: u64) -> Self {
        let precision = ratio(tp as f64, (tp + fp) as f64);
        let recall = ratio(tp as f64, (tp + fn_) as f64);
        let f1 = ratio(2.0 * precision * recall, precision + recall);
        let accuracy = ratio(tp as f64, (tp + fp + fn_) as f64);
        Self {
            precision,
            recall,
            f1,
            accuracy,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
