use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::core;
use crate::db::{self, NewUser, UserChanges};
use crate::routes::{ApiError, TenantScope};

pub async fn list_users(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
) -> Result<impl IntoResponse, ApiError> {
    let users = db::list_users(&context.db, tenant_id).await?;
    Ok(Json(users))
}

pub async fn role_stats(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
) -> Result<impl IntoResponse, ApiError> {
    let users = db::list_users(&context.db, tenant_id).await?;
    Ok(Json(db::role_stats(&users)))
}

pub async fn get_user(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = db::get_user(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("User"))?;
    Ok(Json(user))
}

pub async fn create_user(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Json(new_user): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    if !new_user.email.contains('@') {
        return Err(ApiError::BadRequest(format!("Invalid email address: {}", new_user.email)));
    }
    if new_user.first_name.trim().is_empty() || new_user.last_name.trim().is_empty() {
        return Err(ApiError::BadRequest("First and last name are required".to_string()));
    }
    let user = db::create_user(&context.db, tenant_id, new_user).await?;
    tracing::info!(tenant_id, user_id = user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
    Json(changes): Json<UserChanges>,
) -> Result<impl IntoResponse, ApiError> {
    let user = db::update_user(&context.db, tenant_id, id, changes)
        .await
        .map_err(ApiError::lookup("User"))?;
    Ok(Json(user))
}

pub async fn activate_user(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = db::activate_user(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("User"))?;
    tracing::info!(tenant_id, user_id = id, "User activated");
    Ok(Json(user))
}

pub async fn delete_user(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    db::delete_user(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("User"))?;
    tracing::info!(tenant_id, user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
