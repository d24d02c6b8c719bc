use serde_json::Value;

/// Fields worth printing on their own, most telling first.
const PRIORITY_KEYS: [&str; 9] = [
    "status",
    "delta_pct",
    "catch_up_daily_revenue",
    "projected_revenue",
    "mer",
    "roas",
    "ratio",
    "cpa",
    "revenue_target",
];

/// Print just the headline value of a result.
///
/// Unwraps the `result` envelope and the forecast `metrics` block, then
/// prints the first non-null priority field. Arrays print their last
/// element's headline, which for daily series is the latest day.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

pub fn headline(value: &Value) -> String {
    let mut target = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(metrics) = target.as_object().and_then(|m| m.get("metrics")) {
        target = metrics;
    }

    match target {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key) {
                    if !val.is_null() {
                        return format_minimal(val);
                    }
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
                None => String::new(),
            }
        }
        Value::Array(items) => items.last().map(headline).unwrap_or_default(),
        other => format_minimal(other),
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forecast_envelope_prints_status() {
        let v = json!({
            "result": {
                "scenario": {"id": "q1"},
                "metrics": {"delta_pct": "-40", "status": "behind"}
            },
            "warnings": []
        });
        assert_eq!(headline(&v), "behind");
    }

    #[test]
    fn test_skips_null_ratio() {
        let v = json!({"roas": null, "cpa": null, "mer": "3"});
        assert_eq!(headline(&v), "3");
    }

    #[test]
    fn test_rolling_series_prints_latest_ratio() {
        let v = json!([
            {"date": null, "ratio": "2"},
            {"date": null, "ratio": "4"}
        ]);
        assert_eq!(headline(&v), "4");
    }

    #[test]
    fn test_unknown_object_falls_back_to_first_field() {
        let v = json!({"monthly_targets": []});
        assert_eq!(headline(&v), "monthly_targets: []");
    }

    fn collect_keys(value: &Value, keys: &mut std::collections::BTreeSet<String>) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    keys.insert(k.clone());
                    collect_keys(v, keys);
                }
            }
            Value::Array(items) => items.iter().for_each(|v| collect_keys(v, keys)),
            _ => {}
        }
    }

    #[test]
    fn test_every_priority_key_is_an_output_field() {
        use chrono::NaiveDate;
        use revenue_pacing_core::forecast::{compute_forecast, ForecastScenario};
        use revenue_pacing_core::ratios::{ad_metrics, rolling, AdCounters, RollingSample};

        let scenario: ForecastScenario = serde_json::from_value(json!({
            "id": "q1",
            "start_date": "2025-01-01",
            "end_date": "2025-01-31",
            "revenue_target": "3100",
            "roas": "2"
        }))
        .unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let forecast = compute_forecast(&scenario, &[], as_of).unwrap();
        let ratios = ad_metrics::compute_ratio_metrics(&AdCounters::default());
        let points = rolling::compute_rolling_points(
            &[RollingSample {
                date: None,
                revenue: 1.into(),
                spend: 1.into(),
            }],
            rolling::DEFAULT_WINDOW_DAYS,
        )
        .unwrap();

        let mut keys = std::collections::BTreeSet::new();
        collect_keys(&serde_json::to_value(&forecast).unwrap(), &mut keys);
        collect_keys(&serde_json::to_value(&ratios).unwrap(), &mut keys);
        collect_keys(&serde_json::to_value(&points).unwrap(), &mut keys);

        for key in PRIORITY_KEYS {
            assert!(keys.contains(key), "{key} is not produced by any command");
        }
    }
}
