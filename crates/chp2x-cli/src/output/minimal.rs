use serde_json::{Map, Value};

/// Headline fields in order of priority. The result objects nest their
/// summaries one level deep, so lookup checks the top level first and then
/// each section.
const PRIORITY_KEYS: [&str; 5] = [
    "npv",
    "monthly_payout",
    "lcoe",
    "required_hectares",
    "total_revenue",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(found) = lookup(map, key) {
                println!("{}", minimal_text(found));
                return;
            }
        }

        // The sweep has no single headline number; report the sample count
        if let Some(Value::Array(points)) = map.get("points") {
            println!("{} points", points.len());
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, minimal_text(val));
            return;
        }
    }

    println!("{}", minimal_text(result));
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(v) = map.get(key) {
        if !v.is_null() {
            return Some(v);
        }
    }
    for nested in map.values() {
        if let Value::Object(section) = nested {
            if let Some(v) = section.get(key) {
                if !v.is_null() {
                    return Some(v);
                }
            }
        }
    }
    None
}

fn minimal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
