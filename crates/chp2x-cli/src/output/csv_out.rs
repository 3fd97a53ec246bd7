use serde_json::Value;
use std::io;

/// Keys whose array value is the chartable series for a command.
const SERIES_KEYS: [&str; 2] = ["monthly_series", "points"];

/// Write output as CSV to stdout. When the result carries a month- or
/// temperature-indexed series, the series rows ARE the output (ready for a
/// charting tool); otherwise every field flattens to `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            for key in SERIES_KEYS {
                if let Some(Value::Array(rows)) = map.get(key) {
                    write_rows(&mut wtr, rows);
                    let _ = wtr.flush();
                    return;
                }
            }

            let _ = wtr.write_record(["field", "value"]);
            write_flattened(&mut wtr, map, "");
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let _ = wtr.write_record([&csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for row in rows {
            if let Value::Object(map) = row {
                let record: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&record);
            }
        }
    } else {
        for row in rows {
            let _ = wtr.write_record([&csv_value(row)]);
        }
    }
}

/// Flatten nested summary sections into dotted `section.field` keys.
fn write_flattened(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
    prefix: &str,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(nested) => write_flattened(wtr, nested, &name),
            Value::Array(_) => {}
            other => {
                let _ = wtr.write_record([name.as_str(), &csv_value(other)]);
            }
        }
    }
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
