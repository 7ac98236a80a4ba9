use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::core::{DbContext, DbError};

pub const PAYCOM: &str = "paycom";

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum IntegrationEnvironment {
    #[default]
    Sandbox,
    Production,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Disconnected,
    Connected,
    Error,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SyncFrequency {
    #[default]
    Manual,
    Hourly,
    Daily,
    Weekly,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct IntegrationConfig {
    pub id: i64,
    pub tenant_id: i64,
    pub provider: String,
    pub base_url: String,
    pub environment: IntegrationEnvironment,
    pub is_active: bool,
    pub status: IntegrationStatus,
    pub last_tested_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub base_url: String,
    #[serde(default)]
    pub environment: IntegrationEnvironment,
    #[serde(default)]
    pub is_active: bool,
}

/// Stored credential; the value itself never leaves the database.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Credential {
    pub id: i64,
    pub name: String,
    pub fingerprint: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewCredential {
    pub name: String,
    pub encrypted_value: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SyncEndpoint {
    pub id: i64,
    pub endpoint: String,
    pub frequency: SyncFrequency,
    pub enabled: bool,
    pub field_mapping: Json<BTreeMap<String, String>>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncEndpointSettings {
    pub endpoint: String,
    #[serde(default)]
    pub frequency: SyncFrequency,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub field_mapping: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SyncRun {
    pub id: i64,
    pub endpoint: String,
    pub status: SyncStatus,
    pub records_processed: i64,
    pub records_failed: i64,
    pub duration_ms: i64,
    pub error_message: Option<String>,
    pub started_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewSyncRun {
    pub endpoint: String,
    pub status: SyncStatus,
    #[serde(default)]
    pub records_processed: i64,
    #[serde(default)]
    pub records_failed: i64,
    #[serde(default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// First 16 hex chars of the sha256 of the stored value.
#[must_use]
pub fn credential_fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut fingerprint = hex::encode(digest);
    fingerprint.truncate(16);
    fingerprint
}

pub async fn get_integration(db: &DbContext, tenant_id: i64, provider: &str) -> Result<IntegrationConfig, DbError> {
    let config = sqlx::query_as::<_, IntegrationConfig>(
        r"
        SELECT id, tenant_id, provider, base_url, environment, is_active, status, last_tested_at, created_at, updated_at
        FROM integration_configs
        WHERE tenant_id = ? AND provider = ?
        ",
    )
    .bind(tenant_id)
    .bind(provider)
    .fetch_one(db)
    .await?;
    Ok(config)
}

/// Creates or replaces the connection settings. Changing them resets the status to disconnected.
pub async fn upsert_integration(
    db: &DbContext,
    tenant_id: i64,
    provider: &str,
    settings: ConnectionSettings,
) -> Result<IntegrationConfig, DbError> {
    sqlx::query(
        r"
        INSERT INTO integration_configs (tenant_id, provider, base_url, environment, is_active, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'disconnected', CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        ON CONFLICT(tenant_id, provider) DO UPDATE SET
            base_url = excluded.base_url,
            environment = excluded.environment,
            is_active = excluded.is_active,
            status = 'disconnected',
            updated_at = CURRENT_TIMESTAMP
        ",
    )
    .bind(tenant_id)
    .bind(provider)
    .bind(settings.base_url.trim())
    .bind(settings.environment)
    .bind(settings.is_active)
    .execute(db)
    .await?;
    get_integration(db, tenant_id, provider).await
}

pub async fn set_integration_status(db: &DbContext, config_id: i64, status: IntegrationStatus) -> Result<(), DbError> {
    let updated = sqlx::query(
        r"
        UPDATE integration_configs SET
            status = ?,
            last_tested_at = CURRENT_TIMESTAMP,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        ",
    )
    .bind(status)
    .bind(config_id)
    .execute(db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(DbError::not_found());
    }
    Ok(())
}

/// Swaps the full credential set in one transaction.
pub async fn replace_credentials(
    db: &DbContext,
    config_id: i64,
    credentials: Vec<NewCredential>,
) -> Result<Vec<Credential>, DbError> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM integration_credentials WHERE config_id = ?")
        .bind(config_id)
        .execute(&mut *tx)
        .await?;

    for credential in credentials {
        let fingerprint = credential_fingerprint(&credential.encrypted_value);
        sqlx::query(
            r"
            INSERT INTO integration_credentials (config_id, name, encrypted_value, fingerprint, created_at)
            VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)
            ",
        )
        .bind(config_id)
        .bind(credential.name)
        .bind(credential.encrypted_value)
        .bind(fingerprint)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    list_credentials(db, config_id).await
}

pub async fn list_credentials(db: &DbContext, config_id: i64) -> Result<Vec<Credential>, DbError> {
    let credentials = sqlx::query_as::<_, Credential>(
        "SELECT id, name, fingerprint, created_at FROM integration_credentials WHERE config_id = ? ORDER BY name",
    )
    .bind(config_id)
    .fetch_all(db)
    .await?;
    Ok(credentials)
}

pub async fn list_sync_endpoints(db: &DbContext, config_id: i64) -> Result<Vec<SyncEndpoint>, DbError> {
    let endpoints = sqlx::query_as::<_, SyncEndpoint>(
        r"
        SELECT id, endpoint, frequency, enabled, field_mapping, updated_at
        FROM sync_endpoints
        WHERE config_id = ?
        ORDER BY endpoint
        ",
    )
    .bind(config_id)
    .fetch_all(db)
    .await?;
    Ok(endpoints)
}

pub async fn upsert_sync_endpoints(
    db: &DbContext,
    config_id: i64,
    endpoints: Vec<SyncEndpointSettings>,
) -> Result<Vec<SyncEndpoint>, DbError> {
    let mut tx = db.begin().await?;

    for endpoint in endpoints {
        sqlx::query(
            r"
            INSERT INTO sync_endpoints (config_id, endpoint, frequency, enabled, field_mapping, updated_at)
            VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(config_id, endpoint) DO UPDATE SET
                frequency = excluded.frequency,
                enabled = excluded.enabled,
                field_mapping = excluded.field_mapping,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(config_id)
        .bind(endpoint.endpoint)
        .bind(endpoint.frequency)
        .bind(endpoint.enabled)
        .bind(Json(endpoint.field_mapping))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    list_sync_endpoints(db, config_id).await
}

/// Most recent runs first.
pub async fn list_sync_history(db: &DbContext, config_id: i64, limit: i64) -> Result<Vec<SyncRun>, DbError> {
    let runs = sqlx::query_as::<_, SyncRun>(
        r"
        SELECT id, endpoint, status, records_processed, records_failed, duration_ms, error_message, started_at
        FROM sync_history
        WHERE config_id = ?
        ORDER BY started_at DESC, id DESC
        LIMIT ?
        ",
    )
    .bind(config_id)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(runs)
}

pub async fn record_sync_run(db: &DbContext, config_id: i64, run: NewSyncRun) -> Result<SyncRun, DbError> {
    let recorded = sqlx::query_as::<_, SyncRun>(
        r"
        INSERT INTO sync_history (
            config_id, endpoint, status, records_processed, records_failed, duration_ms, error_message, started_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        RETURNING id, endpoint, status, records_processed, records_failed, duration_ms, error_message, started_at
        ",
    )
    .bind(config_id)
    .bind(run.endpoint)
    .bind(run.status)
    .bind(run.records_processed)
    .bind(run.records_failed)
    .bind(run.duration_ms)
    .bind(run.error_message)
    .fetch_one(db)
    .await?;
    Ok(recorded)
}
