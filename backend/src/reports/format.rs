use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses the date shapes the report sources emit. Offsets are converted to local time.
#[must_use]
pub fn parse_date_like(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
                .map(|date| date.and_time(chrono::NaiveTime::MIN))
        })
}

/// Display form of a cell in the preview grid.
///
/// Integers print as-is, other numbers with two decimals, date-looking
/// strings (containing `-` or `/`) as `M/D/YYYY`, null as an empty string.
#[must_use]
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
                Some(f) => format!("{f:.2}"),
                None => n.to_string(),
            }
        }
        Value::String(s) if s.contains('-') || s.contains('/') => parse_date_like(s)
            .map_or_else(|| s.clone(), |dt| dt.format("%-m/%-d/%Y").to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
