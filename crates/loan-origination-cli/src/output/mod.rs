pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Result field holding per-period rows.
const ROWS_KEY: &str = "entries";

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Split a result object into its scalar fields and its schedule rows, if any.
fn split_rows(result: &Map<String, Value>) -> (Map<String, Value>, Option<&[Value]>) {
    let mut fields = result.clone();
    let rows = match fields.remove(ROWS_KEY) {
        Some(Value::Array(_)) => result.get(ROWS_KEY).and_then(Value::as_array).map(Vec::as_slice),
        Some(other) => {
            fields.insert(ROWS_KEY.to_string(), other);
            None
        }
        None => None,
    };
    (fields, rows)
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_rows_extracts_entries() {
        let result = json!({
            "periodic_payment": "100.00",
            "entries": [{ "period_index": 1 }, { "period_index": 2 }]
        });
        let (fields, rows) = split_rows(result.as_object().unwrap());
        assert_eq!(rows.map(|r| r.len()), Some(2));
        assert!(fields.get("entries").is_none());
        assert_eq!(fields.get("periodic_payment"), Some(&json!("100.00")));
    }

    #[test]
    fn test_split_rows_without_entries() {
        let result = json!({ "monthly_payment": "888.49" });
        let (fields, rows) = split_rows(result.as_object().unwrap());
        assert!(rows.is_none());
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_format_scalar() {
        assert_eq!(format_scalar(&json!("888.49")), "888.49");
        assert_eq!(format_scalar(&json!(12)), "12");
        assert_eq!(format_scalar(&Value::Null), "");
    }
}
