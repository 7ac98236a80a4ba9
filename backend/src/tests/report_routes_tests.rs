use axum::http::{StatusCode, header};
use serde_json::Value;

use crate::app;
use crate::reports::{self, FetchError, HttpReportSource, ReportSource, parse_csv};
use crate::tests::support::{create_test_context, create_test_server, test_settings};
use crate::views::{PreviewAction, PreviewSession, PreviewStatus};

#[tokio::test]
async fn test_export_unknown_report_is_404_plain_text() {
    let (server, _) = create_test_server().await;

    let response = server.get("/api/reports/does-not-exist/export").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Report not found");
}

#[tokio::test]
async fn test_export_department_analysis_csv() {
    let (server, context) = create_test_server().await;

    let response = server.get("/api/reports/department-analysis/export").await;

    response.assert_status_ok();
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert_eq!(content_type, "text/csv;charset=utf-8");
    let disposition = response.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\""));
    assert!(disposition.ends_with(".csv\""));

    let report = reports::lookup("department-analysis").unwrap();
    let generated = reports::generate(report, &context.settings.reports.default_seed).unwrap();
    let first_row_keys: Vec<String> = generated.rows[0].keys().cloned().collect();

    let body = response.text();
    let first_line = body.split("\r\n").next().unwrap();
    assert_eq!(first_line, first_row_keys.join(","));

    let records = parse_csv(&body).unwrap();
    assert_eq!(records.len(), generated.len() + 1);
}

#[tokio::test]
async fn test_export_applies_search() {
    let (server, _) = create_test_server().await;

    let response = server
        .get("/api/reports/department-analysis/export")
        .add_query_param("q", "no row contains this")
        .await;

    response.assert_status_ok();
    assert_eq!(parse_csv(&response.text()).unwrap().len(), 1);
}

#[tokio::test]
async fn test_preview_unknown_report_is_404_plain_text() {
    let (server, _) = create_test_server().await;

    let response = server.get("/api/reports/nope").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Report not found");
}

#[tokio::test]
async fn test_preview_returns_columns_and_rows() {
    let (server, _) = create_test_server().await;

    let response = server
        .get("/api/reports/employee-directory")
        .add_query_param("seed", "routes")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let expected = reports::generate(reports::lookup("employee-directory").unwrap(), "routes").unwrap();
    assert_eq!(body["columns"].as_array().unwrap().len(), expected.columns.len());
    assert_eq!(body["rows"].as_array().unwrap().len(), expected.len());
    assert_eq!(body["rows"][0], Value::Object(expected.rows[0].clone()));
}

#[tokio::test]
async fn test_preview_sorts_descending() {
    let (server, _) = create_test_server().await;

    let response = server
        .get("/api/reports/department-analysis")
        .add_query_param("sort", "headcount")
        .add_query_param("dir", "desc")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let counts: Vec<i64> = body["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["headcount"].as_i64().unwrap())
        .collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_preview_rejects_bad_dates() {
    let (server, _) = create_test_server().await;

    let response = server
        .get("/api/reports/new-hires")
        .add_query_param("start", "03/01/2024")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["result"], "error");
}

#[tokio::test]
async fn test_preview_is_capped() {
    let mut settings = test_settings();
    settings.reports.max_preview_rows = 3;
    let context = create_test_context(settings).await;
    let server = axum_test::TestServer::new(app::create_router(context)).unwrap();

    let response = server.get("/api/reports/timecard-summary").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["rows"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_reports_by_group() {
    let (server, _) = create_test_server().await;

    let all: Value = server.get("/api/reports").await.json();
    assert_eq!(all["result"], "ok");
    assert_eq!(all["reports"].as_array().unwrap().len(), reports::catalog().len());

    let salary: Value = server.get("/api/reports").add_query_param("group", "salary").await.json();
    let groups: Vec<&str> = salary["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["group"].as_str().unwrap())
        .collect();
    assert!(!groups.is_empty());
    assert!(groups.iter().all(|g| *g == "salary"));

    let response = server.get("/api/reports").add_query_param("group", "bogus").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

/// Serves the router on a real local port so `HttpReportSource` can reach it.
async fn spawn_http_server() -> String {
    let context = create_test_context(test_settings()).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app::create_router(context)).await.unwrap();
    });
    format!("http://{address}")
}

#[tokio::test]
async fn test_http_source_round_trips_preview() {
    let base_url = spawn_http_server().await;
    let source = HttpReportSource::new(reqwest::Client::new(), &base_url).unwrap();

    let table = source.fetch("pto-balances").await.unwrap();

    let expected = reports::generate(reports::lookup("pto-balances").unwrap(), &test_settings().reports.default_seed).unwrap();
    assert_eq!(table.columns, expected.columns);
    assert_eq!(table.len(), expected.len());
    assert_eq!(table.rows[0]["employee_id"], expected.rows[0]["employee_id"]);
}

#[tokio::test]
async fn test_http_source_reports_status_errors() {
    let base_url = spawn_http_server().await;
    let mut session = PreviewSession::new(HttpReportSource::new(reqwest::Client::new(), &base_url).unwrap());

    session.open("not-a-report").await;

    assert_eq!(
        session.state().status,
        PreviewStatus::Failed { message: "Request failed with status 404: Report not found".to_string() }
    );
    session.dispatch(PreviewAction::Close);
    assert_eq!(session.state().status, PreviewStatus::Idle);
}

#[test]
fn test_http_source_builds_report_urls() {
    let source = HttpReportSource::new(reqwest::Client::new(), "http://localhost:3000/").unwrap();
    assert_eq!(
        source.report_url("new-hires").unwrap().as_str(),
        "http://localhost:3000/api/reports/new-hires"
    );
    assert!(matches!(
        HttpReportSource::new(reqwest::Client::new(), "not a url"),
        Err(FetchError::InvalidBaseUrl(_))
    ));
}
