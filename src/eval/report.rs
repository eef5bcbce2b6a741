//! Evaluation results and their console rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metrics::{Counters, Metrics, Outcome};

/// What the suggester produced for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseResult {
    Prediction(String),
    Error(String),
}

/// Per-case evaluation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Position in the test-case list (0-based).
    pub index: usize,
    pub key: String,
    /// Lowercased label; absent when the entry could not be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub status: Outcome,
    #[serde(flatten)]
    pub result: CaseResult,
}

impl CaseRecord {
    pub fn prediction(&self) -> Option<&str> {
        match &self.result {
            CaseResult::Prediction(p) => Some(p),
            CaseResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.result {
            CaseResult::Error(e) => Some(e),
            CaseResult::Prediction(_) => None,
        }
    }

    /// Console glyph for the record.
    pub fn glyph(&self) -> &'static str {
        match (&self.result, self.status) {
            (CaseResult::Error(_), _) => "💥",
            (_, Outcome::TruePositive) => "✅",
            (_, Outcome::FalsePositive) => "❌",
            (_, Outcome::FalseNegative) => "➖",
        }
    }
}

/// Outcome of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub counters: Counters,
    pub metrics: Metrics,
    pub records: Vec<CaseRecord>,
}

impl EvaluationReport {
    pub fn new(counters: Counters, records: Vec<CaseRecord>) -> Self {
        Self {
            metrics: counters.metrics(),
            counters,
            records,
        }
    }

    /// Number of cases processed.
    pub fn evaluated(&self) -> usize {
        self.records.len()
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        let m = &self.metrics;

        writeln!(f, "📊 Evaluation results ({} cases)", self.evaluated())?;
        writeln!(f, "{}", "─".repeat(40))?;
        writeln!(f, "✅ True positives:  {}", c.true_positive)?;
        writeln!(f, "❌ False positives: {}", c.false_positive)?;
        writeln!(f, "➖ False negatives: {}", c.false_negative)?;
        writeln!(f, "🎯 Precision: {}", percent(m.precision))?;
        writeln!(f, "📈 Recall:    {}", percent(m.recall))?;
        writeln!(f, "🔷 F1-score:  {}", percent(m.f1))?;
        writeln!(f, "🎯 Accuracy:  {}", percent(m.accuracy))?;

        writeln!(f)?;
        writeln!(f, "🧪 Cases:")?;
        for record in &self.records {
            writeln!(
                f,
                "{} {:03} | key: {:<15} | expected: {:<15} | predicted: {:<15}",
                record.glyph(),
                record.index + 1,
                record.key,
                record.expected.as_deref().unwrap_or("n/a"),
                record.prediction().unwrap_or("ERROR"),
            )?;
        }
        Ok(())
    }
}
