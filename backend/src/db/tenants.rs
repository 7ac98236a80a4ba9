use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{DbContext, DbError};

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub tenant_type: String,
    pub status: String,
    pub user_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewTenant {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub tenant_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

const SELECT_TENANT: &str = r"
    SELECT
        t.id,
        t.name,
        t.code,
        t.tenant_type,
        t.status,
        (SELECT COUNT(*) FROM users u WHERE u.tenant_id = t.id) AS user_count,
        t.created_at,
        t.updated_at
    FROM tenants t
";

pub async fn list_tenants(db: &DbContext) -> Result<Vec<Tenant>, DbError> {
    let tenants = sqlx::query_as::<_, Tenant>(&format!("{SELECT_TENANT} ORDER BY t.name"))
        .fetch_all(db)
        .await?;
    Ok(tenants)
}

pub async fn get_tenant_by_id(db: &DbContext, id: i64) -> Result<Tenant, DbError> {
    let tenant = sqlx::query_as::<_, Tenant>(&format!("{SELECT_TENANT} WHERE t.id = ?"))
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(tenant)
}

pub async fn create_tenant(db: &DbContext, new_tenant: NewTenant) -> Result<Tenant, DbError> {
    let id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO tenants (name, code, tenant_type, status, created_at, updated_at)
        VALUES (?, ?, COALESCE(?, 'client'), COALESCE(?, 'active'), CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id
        ",
    )
    .bind(new_tenant.name)
    .bind(new_tenant.code.to_uppercase())
    .bind(new_tenant.tenant_type)
    .bind(new_tenant.status)
    .fetch_one(db)
    .await?;
    get_tenant_by_id(db, id).await
}
