use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::core;
use crate::db::{self, NewTenant};
use crate::routes::ApiError;

pub async fn list_tenants(State(context): State<core::ArcContext>) -> Result<impl IntoResponse, ApiError> {
    let tenants = db::list_tenants(&context.db).await?;
    Ok(Json(tenants))
}

pub async fn get_tenant(
    State(context): State<core::ArcContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tenant = db::get_tenant_by_id(&context.db, id)
        .await
        .map_err(ApiError::lookup("Tenant"))?;
    Ok(Json(tenant))
}

pub async fn create_tenant(
    State(context): State<core::ArcContext>,
    Json(new_tenant): Json<NewTenant>,
) -> Result<impl IntoResponse, ApiError> {
    if new_tenant.name.trim().is_empty() || new_tenant.code.trim().is_empty() {
        return Err(ApiError::BadRequest("Tenant name and code are required".to_string()));
    }
    let tenant = db::create_tenant(&context.db, new_tenant).await?;
    tracing::info!(tenant_id = tenant.id, code = %tenant.code, "Tenant created");
    Ok((StatusCode::CREATED, Json(tenant)))
}
