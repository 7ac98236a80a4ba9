use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core;
use crate::db::{self, NewComment, NewWorkRequest, StatusChange, WorkRequestChanges, WorkRequestStatus};
use crate::routes::{ApiError, TenantScope};

#[derive(Debug, Default, Deserialize)]
pub struct WorkRequestQuery {
    #[serde(default)]
    pub status: Option<WorkRequestStatus>,
}

fn check_budget(budget: Option<f64>) -> Result<(), ApiError> {
    match budget {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            Err(ApiError::BadRequest(format!("budget_estimate must be a non-negative amount, got {amount}")))
        }
        _ => Ok(()),
    }
}

fn check_dates(start_date: Option<NaiveDate>, due_date: Option<NaiveDate>) -> Result<(), ApiError> {
    match (start_date, due_date) {
        (Some(start), Some(due)) if due < start => Err(ApiError::BadRequest("due_date is before start_date".to_string())),
        _ => Ok(()),
    }
}

pub async fn list_work_requests(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Query(query): Query<WorkRequestQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = db::list_work_requests(&context.db, tenant_id, query.status).await?;
    Ok(Json(requests))
}

pub async fn get_work_request(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let request = db::get_work_request(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("Work request"))?;
    Ok(Json(request))
}

pub async fn create_work_request(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Json(new_request): Json<NewWorkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if new_request.title.trim().is_empty() || new_request.customer_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Title and customer name are required".to_string()));
    }
    check_budget(new_request.budget_estimate)?;
    check_dates(new_request.start_date, new_request.due_date)?;

    let request = db::create_work_request(&context.db, tenant_id, new_request).await?;
    tracing::info!(tenant_id, work_request_id = request.id, priority = ?request.priority, "Work request submitted");
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn update_work_request(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
    Json(changes): Json<WorkRequestChanges>,
) -> Result<impl IntoResponse, ApiError> {
    check_budget(changes.budget_estimate)?;
    let current = db::get_work_request(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("Work request"))?;
    // absent fields keep their stored value, so validate the merged dates
    check_dates(changes.start_date.or(current.start_date), changes.due_date.or(current.due_date))?;
    let request = db::update_work_request(&context.db, tenant_id, id, changes)
        .await
        .map_err(ApiError::lookup("Work request"))?;
    Ok(Json(request))
}

/// Moves a request along its lifecycle; transitions the lifecycle does not allow are a 409.
pub async fn change_status(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
    Json(change): Json<StatusChange>,
) -> Result<impl IntoResponse, ApiError> {
    let current = db::get_work_request(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("Work request"))?;
    if !current.status.can_transition_to(change.status) {
        return Err(ApiError::Conflict(format!(
            "Cannot move work request from {:?} to {:?}",
            current.status, change.status
        )));
    }

    let next = change.status;
    let request = db::set_work_request_status(&context.db, tenant_id, id, current.status, change)
        .await
        .map_err(ApiError::lookup("Work request"))?
        .ok_or_else(|| ApiError::Conflict("Work request status changed concurrently, reload and retry".to_string()))?;
    tracing::info!(tenant_id, work_request_id = id, from = ?current.status, to = ?next, "Work request status changed");
    Ok(Json(request))
}

pub async fn delete_work_request(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    db::delete_work_request(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("Work request"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    // scope check: the request must belong to this tenant
    db::get_work_request(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("Work request"))?;
    let comments = db::list_comments(&context.db, id).await?;
    Ok(Json(comments))
}

pub async fn add_comment(
    State(context): State<core::ArcContext>,
    TenantScope(tenant_id): TenantScope,
    Path(id): Path<i64>,
    Json(comment): Json<NewComment>,
) -> Result<impl IntoResponse, ApiError> {
    if comment.body.trim().is_empty() {
        return Err(ApiError::BadRequest("Comment body is required".to_string()));
    }
    db::get_work_request(&context.db, tenant_id, id)
        .await
        .map_err(ApiError::lookup("Work request"))?;
    let comment = db::add_comment(&context.db, id, comment).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
