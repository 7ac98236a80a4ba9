use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{Map, Value, json};

use crate::app;
use crate::cfg;
use crate::core;
use crate::reports::Row;

pub const TENANT_HEADER: HeaderName = HeaderName::from_static("x-tenant-id");

pub fn test_settings() -> cfg::AppSettings {
    cfg::AppSettings {
        // a single connection keeps every query on the same in-memory database
        database: cfg::DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        },
        integrations: cfg::IntegrationSettings { connection_test_delay_ms: 0 },
        ..Default::default()
    }
}

pub async fn create_test_context(settings: cfg::AppSettings) -> core::ArcContext {
    let db = core::create_db_context(&settings.database).await.unwrap();
    app::run_migrations(&db).await.unwrap();
    core::Context::new(db, reqwest::Client::new(), settings)
}

pub async fn create_test_server() -> (TestServer, core::ArcContext) {
    let context = create_test_context(test_settings()).await;
    let server = TestServer::new(app::create_router(context.clone())).unwrap();
    (server, context)
}

pub fn tenant(id: i64) -> HeaderValue {
    HeaderValue::from_str(&id.to_string()).unwrap()
}

/// Creates a client tenant through the API and returns its id.
pub async fn create_tenant(server: &TestServer, code: &str) -> i64 {
    let response = server
        .post("/api/tenants")
        .json(&json!({ "name": format!("{code} Corp"), "code": code }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
