use serde_json::Value;

/// Result fields printed by `--output minimal`, in priority order.
const PRIORITY_KEYS: [&str; 3] = ["monthly_payment", "periodic_payment", "total_repayment"];

/// Print just the key answer: the payment for calculations and schedules,
/// the new status for reviews.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", minimal_answer(result));
}

fn minimal_answer(result: &Value) -> String {
    let Value::Object(map) = result else {
        return format_minimal(result);
    };

    if let Some(val) = PRIORITY_KEYS
        .iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
    {
        return format_minimal(val);
    }

    if let Some(status) = map.get("application").and_then(|a| a.get("status")) {
        return format_minimal(status);
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
        None => String::new(),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
