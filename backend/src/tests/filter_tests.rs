use chrono::NaiveDate;
use serde_json::json;

use crate::reports::{PreviewFilters, Row, detect_row_date, end_of_day, search};
use crate::tests::support::row;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn people() -> Vec<Row> {
    vec![
        row(json!({ "name": "Alice Johnson", "department": "Finance", "hire_date": "2024-03-01" })),
        row(json!({ "name": "Bob Stone", "department": "Sales", "hire_date": "2024-03-15" })),
        row(json!({ "name": "Carmen Diaz", "department": "Engineering", "hire_date": "2024-03-31" })),
        row(json!({ "name": "Dmitri Volkov", "department": "Legal" })),
    ]
}

fn names(rows: &[&Row]) -> Vec<String> {
    rows.iter().map(|r| r["name"].as_str().unwrap_or_default().to_string()).collect()
}

#[test]
fn test_search_ali_keeps_only_alice() {
    let rows = people();
    let matched = search(&rows, "ali");
    assert_eq!(names(&matched), vec!["Alice Johnson"]);
}

#[test]
fn test_search_is_case_insensitive_across_columns() {
    let rows = people();
    assert_eq!(names(&search(&rows, "FINANCE")), vec!["Alice Johnson"]);
    assert_eq!(search(&rows, "  ").len(), rows.len());
    assert!(search(&rows, "zzz").is_empty());
}

#[test]
fn test_end_date_is_inclusive() {
    let rows = people();
    let filters = PreviewFilters {
        end_date: Some(date(2024, 3, 31)),
        ..Default::default()
    };
    let kept = filters.apply(&rows);
    assert!(names(&kept).contains(&"Carmen Diaz".to_string()));

    let boundary = vec![
        row(json!({ "name": "Last moment", "created_at": "2024-03-31T23:59:59.999" })),
        row(json!({ "name": "Next day", "created_at": "2024-04-01T00:00:00" })),
    ];
    assert_eq!(names(&filters.apply(&boundary)), vec!["Last moment"]);
}

#[test]
fn test_end_of_day_covers_timestamps_late_in_the_day() {
    let rows = vec![row(json!({ "name": "Late", "created_at": "2024-03-31T23:59:59" }))];
    let filters = PreviewFilters {
        end_date: Some(date(2024, 3, 31)),
        ..Default::default()
    };
    assert_eq!(filters.apply(&rows).len(), 1);
    assert_eq!(end_of_day(date(2024, 3, 31)).to_string(), "2024-03-31 23:59:59.999");
}

#[test]
fn test_date_range_and_rows_without_dates() {
    let rows = people();
    let filters = PreviewFilters {
        start_date: Some(date(2024, 3, 10)),
        end_date: Some(date(2024, 3, 20)),
        ..Default::default()
    };
    // rows with no recognizable date are never filtered out by date
    assert_eq!(names(&filters.apply(&rows)), vec!["Bob Stone", "Dmitri Volkov"]);
}

#[test]
fn test_filters_combine_text_and_dates() {
    let rows = people();
    let filters = PreviewFilters {
        query: "o".to_string(),
        start_date: Some(date(2024, 3, 2)),
        end_date: None,
    };
    assert_eq!(names(&filters.apply(&rows)), vec!["Bob Stone", "Dmitri Volkov"]);
    assert!(!filters.is_empty());
    assert!(PreviewFilters::default().is_empty());
}

#[test]
fn test_detect_row_date_follows_field_priority() {
    let r = row(json!({ "hire_date": "2020-01-01", "check_date": "2024-05-10" }));
    assert_eq!(detect_row_date(&r).unwrap().date(), date(2024, 5, 10));
    assert!(detect_row_date(&row(json!({ "name": "none" }))).is_none());
}
