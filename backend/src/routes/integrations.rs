use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::core;
use crate::db::{
    self, ConnectionSettings, IntegrationConfig, IntegrationStatus, NewCredential, NewSyncRun, PAYCOM,
    SyncEndpointSettings,
};
use crate::routes::{ApiError, TenantScope};

const DEFAULT_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Accepts absolute http(s) URLs with a host.
fn valid_base_url(raw: &str) -> bool {
    Url::parse(raw.trim())
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()))
}

async fn paycom_config(context: &core::Context, tenant_id: i64) -> Result<IntegrationConfig, ApiError> {
    db::get_integration(&context.db, tenant_id, PAYCOM)
        .await
        .map_err(ApiError::lookup("Integration"))
}

pub async fn get_paycom(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
) -> Result<impl IntoResponse, ApiError> {
    let config = paycom_config(&context, tenant_id).await?;
    let credentials = db::list_credentials(&context.db, config.id).await?;
    Ok(Json(json!({ "config": config, "credentials": credentials })))
}

pub async fn save_paycom(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Json(settings): Json<ConnectionSettings>,
) -> Result<impl IntoResponse, ApiError> {
    if !valid_base_url(&settings.base_url) {
        return Err(ApiError::BadRequest(format!("Invalid base URL: {}", settings.base_url)));
    }
    let config = db::upsert_integration(&context.db, tenant_id, PAYCOM, settings).await?;
    tracing::info!(tenant_id, provider = PAYCOM, environment = ?config.environment, "Integration settings saved");
    Ok(Json(config))
}

pub async fn replace_credentials(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Json(credentials): Json<Vec<NewCredential>>,
) -> Result<impl IntoResponse, ApiError> {
    if credentials.iter().any(|c| c.name.trim().is_empty() || c.encrypted_value.is_empty()) {
        return Err(ApiError::BadRequest("Credentials need a name and a value".to_string()));
    }
    let config = paycom_config(&context, tenant_id).await?;
    let stored = db::replace_credentials(&context.db, config.id, credentials).await?;
    tracing::info!(tenant_id, provider = PAYCOM, count = stored.len(), "Integration credentials replaced");
    Ok(Json(stored))
}

pub async fn list_endpoints(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
) -> Result<impl IntoResponse, ApiError> {
    let config = paycom_config(&context, tenant_id).await?;
    let endpoints = db::list_sync_endpoints(&context.db, config.id).await?;
    Ok(Json(endpoints))
}

pub async fn save_endpoints(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Json(endpoints): Json<Vec<SyncEndpointSettings>>,
) -> Result<impl IntoResponse, ApiError> {
    if endpoints.iter().any(|e| e.endpoint.trim().is_empty()) {
        return Err(ApiError::BadRequest("Endpoint name is required".to_string()));
    }
    let config = paycom_config(&context, tenant_id).await?;
    let saved = db::upsert_sync_endpoints(&context.db, config.id, endpoints).await?;
    Ok(Json(saved))
}

pub async fn sync_history(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
    let config = paycom_config(&context, tenant_id).await?;
    let runs = db::list_sync_history(&context.db, config.id, limit).await?;
    Ok(Json(runs))
}

pub async fn record_sync_run(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Json(run): Json<NewSyncRun>,
) -> Result<impl IntoResponse, ApiError> {
    if run.records_processed < 0 || run.records_failed < 0 || run.duration_ms < 0 {
        return Err(ApiError::BadRequest("Sync counters cannot be negative".to_string()));
    }
    let config = paycom_config(&context, tenant_id).await?;
    let recorded = db::record_sync_run(&context.db, config.id, run).await?;
    tracing::info!(
        tenant_id,
        endpoint = %recorded.endpoint,
        status = ?recorded.status,
        records = recorded.records_processed,
        "Sync run recorded");
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// Why a connection test cannot succeed, if anything.
fn connection_problem(config: &IntegrationConfig, credential_count: usize) -> Option<&'static str> {
    if !config.is_active {
        Some("Integration is inactive")
    } else if credential_count == 0 {
        Some("No credentials stored")
    } else {
        None
    }
}

/// Simulated connection check: waits the configured delay, then marks the
/// integration connected when it is active and has credentials, errored otherwise.
pub async fn test_connection(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
) -> Result<impl IntoResponse, ApiError> {
    let config = paycom_config(&context, tenant_id).await?;
    let credentials = db::list_credentials(&context.db, config.id).await?;

    let delay = context.settings.integrations.connection_test_delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let problem = connection_problem(&config, credentials.len());
    let status = if problem.is_some() { IntegrationStatus::Error } else { IntegrationStatus::Connected };
    db::set_integration_status(&context.db, config.id, status).await?;
    tracing::info!(tenant_id, provider = PAYCOM, status = ?status, problem, "Integration connection tested");

    let config = paycom_config(&context, tenant_id).await?;
    Ok(Json(json!({ "success": problem.is_none(), "message": problem, "config": config })))
}
