use chrono::NaiveDate;
use serde_json::json;

use crate::reports::{self, CatalogSource, FetchError, ReportSource, ReportTable};
use crate::tests::support::row;
use crate::views::{PreviewAction, PreviewSession, PreviewState, PreviewStatus};

fn sample_table() -> ReportTable {
    ReportTable::from_rows(vec![
        row(json!({ "name": "Alice", "pay_date": "2024-01-05" })),
        row(json!({ "name": "Bob", "pay_date": "2024-01-19" })),
        row(json!({ "name": "Alina", "pay_date": "2024-02-02" })),
    ])
}

/// Always fails with the given status, the way a broken server would.
struct FailingSource;

impl ReportSource for FailingSource {
    async fn fetch(&self, _report_id: &str) -> Result<ReportTable, FetchError> {
        Err(FetchError::Status { status: 503, body: "maintenance".to_string() })
    }
}

#[test]
fn test_open_sets_loading_and_bumps_generation() {
    let state = PreviewState::default().reduce(PreviewAction::Open { report_id: "new-hires".to_string() });
    assert_eq!(state.status, PreviewStatus::Loading);
    assert_eq!(state.generation, 1);
    assert_eq!(state.report_id.as_deref(), Some("new-hires"));
}

#[test]
fn test_resolved_with_current_generation_loads() {
    let state = PreviewState::default().reduce(PreviewAction::Open { report_id: "a".to_string() });
    let state = state.reduce(PreviewAction::Resolved { generation: 1, result: Ok(sample_table()) });
    assert_eq!(state.table(), Some(&sample_table()));
}

#[test]
fn test_stale_result_is_discarded() {
    let state = PreviewState::default()
        .reduce(PreviewAction::Open { report_id: "a".to_string() })
        .reduce(PreviewAction::Open { report_id: "b".to_string() });
    assert_eq!(state.generation, 2);

    // the fetch started for "a" finishes late
    let state = state.reduce(PreviewAction::Resolved { generation: 1, result: Ok(sample_table()) });
    assert_eq!(state.status, PreviewStatus::Loading);
    assert_eq!(state.report_id.as_deref(), Some("b"));

    let state = state.reduce(PreviewAction::Resolved { generation: 2, result: Err("boom".to_string()) });
    assert_eq!(state.status, PreviewStatus::Failed { message: "boom".to_string() });
}

#[test]
fn test_close_invalidates_in_flight_fetch() {
    let state = PreviewState::default()
        .reduce(PreviewAction::Open { report_id: "a".to_string() })
        .reduce(PreviewAction::SetQuery("ali".to_string()))
        .reduce(PreviewAction::Close);
    assert_eq!(state.status, PreviewStatus::Idle);
    assert!(state.filters.is_empty());

    let state = state.reduce(PreviewAction::Resolved { generation: 1, result: Ok(sample_table()) });
    assert_eq!(state.status, PreviewStatus::Idle);
    assert!(state.table().is_none());
}

#[test]
fn test_visible_rows_follow_filters() {
    let state = PreviewState::default()
        .reduce(PreviewAction::Open { report_id: "a".to_string() })
        .reduce(PreviewAction::Resolved { generation: 1, result: Ok(sample_table()) })
        .reduce(PreviewAction::SetQuery("ali".to_string()));
    assert_eq!(state.visible_rows().len(), 2);

    let state = state.reduce(PreviewAction::SetEndDate(NaiveDate::from_ymd_opt(2024, 1, 31)));
    let names: Vec<_> = state.visible_rows().iter().map(|r| r["name"].clone()).collect();
    assert_eq!(names, vec![json!("Alice")]);

    let state = state
        .reduce(PreviewAction::SetQuery(String::new()))
        .reduce(PreviewAction::SetEndDate(None))
        .reduce(PreviewAction::SetStartDate(NaiveDate::from_ymd_opt(2024, 1, 19)));
    assert_eq!(state.visible_rows().len(), 2);
}

#[tokio::test]
async fn test_session_loads_from_catalog_source() {
    let mut session = PreviewSession::new(CatalogSource::new("session"));
    session.open("timecard-summary").await;

    let expected = reports::generate(reports::lookup("timecard-summary").unwrap(), "session").unwrap();
    assert_eq!(session.state().table(), Some(&expected));
    assert_eq!(session.state().visible_rows().len(), expected.len());
}

#[tokio::test]
async fn test_session_reports_unknown_report() {
    let mut session = PreviewSession::new(CatalogSource::new("session"));
    session.open("missing").await;
    assert_eq!(session.state().status, PreviewStatus::Failed { message: "Report not found".to_string() });
}

#[tokio::test]
async fn test_session_shows_status_errors() {
    let mut session = PreviewSession::new(FailingSource);
    session.open("payroll-register").await;
    assert_eq!(
        session.state().status,
        PreviewStatus::Failed { message: "Request failed with status 503: maintenance".to_string() }
    );
}
