//! Drives a suggester over labeled cases and tallies the outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::metrics::{Counters, Outcome};
use super::pacing::Pacing;
use super::report::{CaseRecord, CaseResult, EvaluationReport};
use crate::suggest::Suggest;
use crate::telemetry;
use crate::types::{Prediction, TestCase, error_marker};
use crate::AnnotatorError;

/// Most cases evaluated per run. Configuration may lower it, never raise it.
pub const DEFAULT_MAX_CASES: usize = 20;

/// How a backend failure during evaluation is scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Count a false negative and record the error.
    #[default]
    FalseNegative,
    /// Treat the `"erro: …"` marker as the prediction, which normally lands
    /// in the false-positive bucket.
    Legacy,
}

/// Evaluation settings.
#[derive(Debug, Clone)]
pub struct Evaluator {
    max_cases: usize,
    pacing: Pacing,
    error_policy: ErrorPolicy,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            max_cases: DEFAULT_MAX_CASES,
            pacing: Pacing::default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on the number of cases taken from the front of the list.
    ///
    /// Values above [`DEFAULT_MAX_CASES`] are clamped to it.
    pub fn max_cases(mut self, n: usize) -> Self {
        self.max_cases = n.min(DEFAULT_MAX_CASES);
        self
    }

    /// Number of cases [`evaluate`](Self::evaluate) takes from a list of `available`.
    pub fn batch_len(&self, available: usize) -> usize {
        available.min(self.max_cases)
    }

    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Evaluate the first `max_cases` raw entries in order.
    ///
    /// Entries that do not decode into a [`TestCase`] are counted as false
    /// negatives without contacting the backend.
    pub async fn evaluate<S>(&self, suggester: &S, cases: &[Value]) -> EvaluationReport
    where
        S: Suggest + ?Sized,
    {
        let batch = &cases[..self.batch_len(cases.len())];
        info!(
            cases = batch.len(),
            available = cases.len(),
            "starting evaluation"
        );

        let mut counters = Counters::new();
        let mut records = Vec::with_capacity(batch.len());

        for (index, raw) in batch.iter().enumerate() {
            let case = match TestCase::from_value(raw) {
                Ok(case) => case,
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed test case");
                    record_outcome(&mut counters, Outcome::FalseNegative);
                    records.push(CaseRecord {
                        index,
                        key: TestCase::raw_key(raw).to_string(),
                        expected: None,
                        status: Outcome::FalseNegative,
                        result: CaseResult::Error(e.to_string()),
                    });
                    continue;
                }
            };

            let expected = case.expected_normalized();
            let suggestion = suggester.suggest(&case.key, &case.value).await;
            let (status, result) = self.score(suggestion, &expected);
            record_outcome(&mut counters, status);

            records.push(CaseRecord {
                index,
                key: case.key,
                expected: Some(expected),
                status,
                result,
            });

            self.pacing.pause(index, batch.len()).await;
        }

        info!(
            tp = counters.true_positive,
            fp = counters.false_positive,
            fn_ = counters.false_negative,
            "evaluation finished"
        );

        EvaluationReport::new(counters, records)
    }

    fn score(
        &self,
        suggestion: crate::Result<Prediction>,
        expected: &str,
    ) -> (Outcome, CaseResult) {
        match suggestion {
            Ok(prediction) => {
                let outcome = classify(&prediction, expected);
                (outcome, CaseResult::Prediction(prediction.into()))
            }
            Err(e) => self.score_failure(&e, expected),
        }
    }

    fn score_failure(&self, err: &AnnotatorError, expected: &str) -> (Outcome, CaseResult) {
        warn!(error = %err, policy = ?self.error_policy, "suggestion failed");
        match self.error_policy {
            ErrorPolicy::FalseNegative => {
                (Outcome::FalseNegative, CaseResult::Error(err.to_string()))
            }
            ErrorPolicy::Legacy => {
                let marker = error_marker(err);
                let outcome = classify(&Prediction::from_normalized(marker.clone()), expected);
                (outcome, CaseResult::Prediction(marker))
            }
        }
    }
}

/// Classify a prediction against a lowercase label.
///
/// A match wins over the sentinel, so a case labeled `n/a` answered with
/// `n/a` is a true positive.
pub fn classify(prediction: &Prediction, expected: &str) -> Outcome {
    if prediction.as_str() == expected {
        Outcome::TruePositive
    } else if prediction.is_not_applicable() {
        Outcome::FalseNegative
    } else {
        Outcome::FalsePositive
    }
}

fn record_outcome(counters: &mut Counters, outcome: Outcome) {
    counters.record(outcome);
    metrics::counter!(telemetry::CASES_TOTAL, "outcome" => outcome.label()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_buckets() {
        let price = Prediction::Property("price".to_string());
        assert_eq!(classify(&price, "price"), Outcome::TruePositive);
        assert_eq!(classify(&price, "color"), Outcome::FalsePositive);
        assert_eq!(classify(&Prediction::NotApplicable, "price"), Outcome::FalseNegative);
        assert_eq!(classify(&Prediction::NotApplicable, "n/a"), Outcome::TruePositive);
    }

    #[test]
    fn error_marker_is_a_false_positive_under_legacy_policy() {
        let evaluator = Evaluator::new().error_policy(ErrorPolicy::Legacy);
        let (outcome, result) =
            evaluator.score(Err(AnnotatorError::Http("boom".into())), "price");
        assert_eq!(outcome, Outcome::FalsePositive);
        assert_eq!(result, CaseResult::Prediction("erro: HTTP error: boom".into()));
    }

    #[test]
    fn error_is_a_false_negative_by_default() {
        let (outcome, result) =
            Evaluator::new().score(Err(AnnotatorError::EmptyResponse), "price");
        assert_eq!(outcome, Outcome::FalseNegative);
        assert!(matches!(result, CaseResult::Error(_)));
    }

    #[test]
    fn case_cap_can_be_lowered_but_not_raised() {
        assert_eq!(Evaluator::new().batch_len(1000), 20);
        assert_eq!(Evaluator::new().max_cases(5).batch_len(1000), 5);
        assert_eq!(Evaluator::new().max_cases(1000).batch_len(1000), 20);
        assert_eq!(Evaluator::new().max_cases(1000).batch_len(3), 3);
    }

    #[test]
    fn error_policy_parses_from_kebab_case() {
        let policy: ErrorPolicy = serde_json::from_str("\"false-negative\"").unwrap();
        assert_eq!(policy, ErrorPolicy::FalseNegative);
        let policy: ErrorPolicy = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(policy, ErrorPolicy::Legacy);
    }
}
