use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalars of an object go into one Field/Value table; nested objects and
/// arrays of objects (metrics, daily/weekly/monthly series) each get their
/// own titled table below it.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_sections(None, result);
                print_envelope_notes(map);
            } else {
                print_sections(None, value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_sections(title: Option<&str>, value: &Value) {
    match value {
        Value::Object(map) => {
            let scalars: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !is_nested(v)).collect();
            if !scalars.is_empty() {
                print_title(title);
                println!("{}", field_value_table(&scalars));
            }
            for (key, val) in map.iter().filter(|(_, v)| is_nested(v)) {
                let nested_title = match title {
                    Some(t) => format!("{}.{}", t, key),
                    None => key.clone(),
                };
                print_sections(Some(&nested_title), val);
            }
        }
        Value::Array(arr) => {
            print_title(title);
            print_array_table(arr);
        }
        other => {
            print_title(title);
            println!("{}", format_value(other));
        }
    }
}

fn print_title(title: Option<&str>) {
    if let Some(t) = title {
        println!("\n{}", t.bold());
    }
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(arr) => arr.iter().any(Value::is_object),
        _ => false,
    }
}

fn field_value_table(rows: &[(&String, &Value)]) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in rows {
        let cell = if key.as_str() == "status" {
            colorize_status(val)
        } else {
            format_value(val)
        };
        builder.push_record([key.as_str(), cell.as_str()]);
    }
    Table::from(builder)
}

fn colorize_status(value: &Value) -> String {
    match value.as_str() {
        Some("behind") => "behind".red().bold().to_string(),
        Some("ahead") => "ahead".green().bold().to_string(),
        Some("on_track") => "on_track".cyan().to_string(),
        _ => format_value(value),
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
