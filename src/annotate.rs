//! Annotation sessions: one suggestion per top-level key, optionally reviewed
//! by an operator, collected into a Schema.org `Dataset` document.

use serde::ser::Serializer;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::prompt::type_name;
use crate::source::SourceDocument;
use crate::suggest::Suggest;
use crate::types::Prediction;
use crate::{AnnotatorError, Result};

/// What the operator decided for one suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Keep the suggested property.
    Accept,
    /// Use this property instead.
    Override(String),
    /// Leave the key out of the result.
    Skip,
}

/// Reviews suggestions one key at a time.
pub trait Reviewer {
    /// Decide on a suggestion. `suggestion` is an error when the backend
    /// failed; accepting an error leaves the key out.
    fn review(
        &mut self,
        key: &str,
        value: &Value,
        suggestion: &Result<Prediction>,
    ) -> Result<Decision>;
}

/// Whether suggestions go past an operator before being recorded.
pub enum ReviewMode<'a> {
    Interactive(&'a mut dyn Reviewer),
    /// Record every successful suggestion as-is.
    Automatic,
}

/// One annotated key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    #[serde(rename = "anotacao")]
    pub property: String,
    #[serde(rename = "valor")]
    pub value: Value,
    #[serde(rename = "tipo")]
    pub type_name: String,
}

/// The printed result of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedDataset {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "fonte")]
    pub source: String,
    #[serde(serialize_with = "ordered_map")]
    pub data: Vec<(String, Annotation)>,
}

impl AnnotatedDataset {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            context: "https://schema.org".to_string(),
            kind: "Dataset".to_string(),
            source: source.into(),
            data: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Annotation> {
        self.data.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn ordered_map<S: Serializer>(
    entries: &[(String, Annotation)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

/// Top-level key/value pairs of a document.
///
/// Objects yield their own pairs; arrays yield the pairs of their first
/// element, which must be an object.
pub fn document_entries(data: &Value) -> Result<Vec<(String, Value)>> {
    let object = match data {
        Value::Object(map) => map,
        Value::Array(items) => match items.first() {
            Some(Value::Object(map)) => map,
            _ => {
                return Err(AnnotatorError::InvalidInput(
                    "array input must start with a JSON object".to_string(),
                ));
            }
        },
        _ => {
            return Err(AnnotatorError::InvalidInput(
                "expected a JSON object or an array of objects".to_string(),
            ));
        }
    };
    Ok(object.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Annotate every top-level key of `doc`, in document order.
pub async fn annotate_document<S>(
    doc: &SourceDocument,
    suggester: &S,
    mut mode: ReviewMode<'_>,
) -> Result<AnnotatedDataset>
where
    S: Suggest + ?Sized,
{
    let entries = document_entries(&doc.data)?;
    let mut dataset = AnnotatedDataset::new(&doc.label);
    info!(keys = entries.len(), source = %doc.label, "annotating document");

    for (key, value) in entries {
        let suggestion = suggester.suggest(&key, &value).await;

        let property = match &mut mode {
            ReviewMode::Automatic => match suggestion {
                Ok(prediction) => Some(String::from(prediction)),
                Err(e) => {
                    warn!(%key, error = %e, "no suggestion, leaving key out");
                    None
                }
            },
            ReviewMode::Interactive(reviewer) => {
                match reviewer.review(&key, &value, &suggestion)? {
                    Decision::Accept => match suggestion {
                        Ok(prediction) => Some(String::from(prediction)),
                        Err(e) => {
                            warn!(%key, error = %e, "accepted a failed suggestion, leaving key out");
                            None
                        }
                    },
                    Decision::Override(property) => Some(property.trim().to_string()),
                    Decision::Skip => None,
                }
            }
        };

        if let Some(property) = property.filter(|p| !p.is_empty()) {
            let annotation = Annotation {
                property,
                type_name: type_name(&value).to_string(),
                value,
            };
            dataset.data.push((key, annotation));
        }
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_of_object_keep_order() {
        let keys: Vec<String> = document_entries(&json!({"z": 1, "a": 2, "m": 3}))
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn entries_of_array_use_first_element() {
        let entries = document_entries(&json!([{"name": "a"}, {"other": 1}])).unwrap();
        assert_eq!(entries, vec![("name".to_string(), json!("a"))]);
    }

    #[test]
    fn scalars_and_empty_arrays_are_rejected() {
        assert!(document_entries(&json!(3)).is_err());
        assert!(document_entries(&json!([])).is_err());
        assert!(document_entries(&json!([1, 2])).is_err());
    }

    #[test]
    fn dataset_serializes_with_json_ld_header() {
        let mut dataset = AnnotatedDataset::new("Manual");
        dataset.data.push((
            "preco".to_string(),
            Annotation {
                property: "price".to_string(),
                value: json!(19.9),
                type_name: "number".to_string(),
            },
        ));
        let json: Value = serde_json::from_str(&dataset.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "@context": "https://schema.org",
                "@type": "Dataset",
                "fonte": "Manual",
                "data": {"preco": {"anotacao": "price", "valor": 19.9, "tipo": "number"}}
            })
        );
    }
}
