use serde_json::Value;

/// Key answer fields, most important first. Nested paths cover the full
/// model, whose returns sit under `returns`.
const PRIORITY_POINTERS: [&str; 5] = [
    "/returns/irr",
    "/irr",
    "/ending_term_loan",
    "/total_principal",
    "/purchase_price",
];

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object. A list result
/// (sensitivity points) prints one `multiple irr` line per point.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for line in minimal_lines(result_obj) {
        println!("{line}");
    }
}

fn minimal_lines(result: &Value) -> Vec<String> {
    match result {
        Value::Array(points) => points
            .iter()
            .map(|p| match (p.get("exit_multiple"), p.get("irr")) {
                (Some(m), Some(irr)) => {
                    format!("{} {}", format_minimal(m), format_minimal(irr))
                }
                _ => format_minimal(p),
            })
            .collect(),
        Value::Object(map) => {
            for pointer in &PRIORITY_POINTERS {
                if let Some(val) = result.pointer(pointer) {
                    if !val.is_null() {
                        return vec![format_minimal(val)];
                    }
                }
            }
            match map.iter().next() {
                Some((key, val)) => vec![format!("{}: {}", key, format_minimal(val))],
                None => Vec::new(),
            }
        }
        other => vec![format_minimal(other)],
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
