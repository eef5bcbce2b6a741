//! Prompt construction and answer normalization.
//!
//! Both chat backends share this module: the prompt is built the same way
//! regardless of where it is sent, and every reply goes through
//! [`normalize_response`] before anything compares or displays it.

use serde_json::Value;

use crate::types::Prediction;

/// Build the instruction sent to the model for one key/value pair.
///
/// The output depends only on the inputs, so the same pair always yields
/// the same prompt.
pub fn build_prompt(key: &str, value: &Value) -> String {
    format!(
        "Baseado no Schema.org, responda APENAS com o nome da propriedade mais adequada para:\n\
         Chave: {key}\n\
         Valor: {} (tipo: {})\n\
         Formato de resposta EXCLUSIVO: NomeDaPropriedade\n\
         Se não encontrar correspondência exata, responda 'N/A'",
        display_value(value),
        type_name(value),
    )
}

/// Printed form of a value: strings without quotes, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JSON type name of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reduce a raw model reply to a prediction.
///
/// Only the first line counts; it is trimmed and lowercased. `"N/A"` in any
/// case becomes [`Prediction::NotApplicable`].
pub fn normalize_response(text: &str) -> Prediction {
    Prediction::from_normalized(normalize_text(text))
}

/// The string half of [`normalize_response`].
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .split('\n')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_line_only() {
        assert_eq!(normalize_text("Name\nExtra commentary"), "name");
        assert_eq!(normalize_text("Name\nignored"), "name");
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize_text("  MixedCase  "), "mixedcase");
        assert_eq!(normalize_text("\n\n  Price \r\nmore"), "price");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["Name\nignored", "  MixedCase  ", "N/A", "", "\tgivenName\n"] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn sentinel_in_any_case() {
        assert_eq!(normalize_response("N/A"), Prediction::NotApplicable);
        assert_eq!(normalize_response(" n/a \nno match"), Prediction::NotApplicable);
        assert_eq!(
            normalize_response("Price"),
            Prediction::Property("price".to_string())
        );
    }

    #[test]
    fn prompt_embeds_key_value_and_type() {
        let prompt = build_prompt("price", &json!(19.9));
        assert!(prompt.starts_with("Baseado no Schema.org"));
        assert!(prompt.contains("Chave: price\n"));
        assert!(prompt.contains("Valor: 19.9 (tipo: number)\n"));
        assert!(prompt.ends_with("responda 'N/A'"));
        assert_eq!(prompt, build_prompt("price", &json!(19.9)));
    }

    #[test]
    fn strings_print_without_quotes() {
        let prompt = build_prompt("name", &json!("Ada"));
        assert!(prompt.contains("Valor: Ada (tipo: string)"));
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(3)), "integer");
        assert_eq!(type_name(&json!(-3)), "integer");
        assert_eq!(type_name(&json!(3.5)), "number");
        assert_eq!(type_name(&json!([1])), "array");
        assert_eq!(type_name(&json!({"a": 1})), "object");
    }

    #[test]
    fn structures_print_as_compact_json() {
        assert_eq!(display_value(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
    }
}
