use serde_json::{Map, Value};
use std::io::{self, Write};

/// Series keys to export, in preference order, when a result carries several.
const SERIES_KEYS: [&str; 5] = [
    "daily_data",
    "daily_forecast_curve",
    "rows",
    "weekly_data",
    "monthly_targets",
];

/// Write output as CSV to stdout.
///
/// A result holding a day-level series exports that series as rows;
/// anything else becomes a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {}", e);
    }
}

pub fn write_csv<W: Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => match primary_series(map) {
            Some(series) => write_array_csv(&mut wtr, series)?,
            None => write_fields_csv(&mut wtr, map)?,
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
        other => wtr.write_record([format_csv_value(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn primary_series(map: &Map<String, Value>) -> Option<&[Value]> {
    SERIES_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
}

fn write_fields_csv<W: Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
) -> Result<(), csv::Error> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> Result<(), csv::Error> {
    let Some(first) = arr.first() else {
        return Ok(());
    };

    if let Value::Object(first) = first {
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([format_csv_value(item)])?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
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

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_forecast_envelope_exports_daily_rows() {
        let v = json!({
            "result": {
                "metrics": {"status": "behind"},
                "daily_data": [
                    {"actual_revenue": "60", "date": "2025-01-01"},
                    {"actual_revenue": null, "date": "2025-01-02"}
                ]
            },
            "warnings": []
        });
        assert_eq!(
            render(&v),
            "actual_revenue,date\n60,2025-01-01\n,2025-01-02\n"
        );
    }

    #[test]
    fn test_flat_object_exports_field_value_pairs() {
        let v = json!({"mer": "3", "roas": null});
        assert_eq!(render(&v), "field,value\nmer,3\nroas,\n");
    }

    #[test]
    fn test_empty_series_writes_nothing() {
        assert_eq!(render(&json!([])), "");
    }
}
