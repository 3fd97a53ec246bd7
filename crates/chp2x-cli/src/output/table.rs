use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Render the computation envelope as tables: scalar fields and summary
/// sections become two-column tables, the monthly/temperature series becomes
/// a row table, followed by any warnings and the methodology trailer.
pub fn print_table(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{}", value);
        return;
    };

    if let Some(result) = map.get("result") {
        print_result(result);

        if let Some(Value::Array(warnings)) = map.get("warnings") {
            if !warnings.is_empty() {
                println!("\nWarnings:");
                for w in warnings {
                    if let Value::String(s) = w {
                        println!("  - {}", s);
                    }
                }
            }
        }

        if let Some(Value::String(meth)) = map.get("methodology") {
            println!("\nMethodology: {}", meth);
        }
    } else {
        print_result(value);
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Object(map) => {
            // Top-level scalars first, then each summary section, then series
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            let mut has_scalars = false;
            for (key, val) in map {
                if !matches!(val, Value::Object(_) | Value::Array(_)) {
                    builder.push_record([key.as_str(), &scalar_text(val)]);
                    has_scalars = true;
                }
            }
            if has_scalars {
                println!("{}", Table::from(builder));
            }

            for (key, val) in map {
                match val {
                    Value::Object(section) => print_section(key, section),
                    Value::Array(rows) => print_rows(key, rows),
                    _ => {}
                }
            }
        }
        Value::Array(rows) => print_rows("results", rows),
        _ => println!("{}", result),
    }
}

fn print_section(name: &str, section: &serde_json::Map<String, Value>) {
    println!("\n{}", name);
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in section {
        builder.push_record([key.as_str(), &scalar_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(name: &str, rows: &[Value]) {
    println!("\n{}", name);
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", scalar_text(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(scalar_text).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
