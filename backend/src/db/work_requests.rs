use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{DbContext, DbError};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum WorkRequestStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkRequestStatus {
    /// Approval lifecycle: submitted -> under review -> approved -> in progress -> completed.
    /// Rejected, completed and cancelled are terminal; anything open can be cancelled.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        use WorkRequestStatus::{Approved, Cancelled, Completed, InProgress, Rejected, Submitted, UnderReview};
        matches!(
            (self, next),
            (Submitted, UnderReview)
                | (UnderReview, Approved | Rejected)
                | (Approved, InProgress)
                | (InProgress, Completed)
                | (Submitted | UnderReview | Approved | InProgress, Cancelled)
        )
    }

    #[must_use]
    pub const fn is_decision(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct WorkRequest {
    pub id: i64,
    pub tenant_id: i64,
    pub customer_name: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub status: WorkRequestStatus,
    pub budget_estimate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub approved_by: Option<String>,
    pub decided_at: Option<NaiveDateTime>,
    pub decision_note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewWorkRequest {
    pub customer_name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub budget_estimate: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorkRequestChanges {
    pub customer_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub budget_estimate: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: WorkRequestStatus,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct WorkRequestComment {
    pub id: i64,
    pub work_request_id: i64,
    pub author: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewComment {
    pub author: String,
    pub body: String,
}

const SELECT_WORK_REQUEST: &str = r"
    SELECT
        id, tenant_id, customer_name, title, description, category, priority, status,
        budget_estimate, start_date, due_date, approved_by, decided_at, decision_note,
        created_at, updated_at
    FROM work_requests
";

pub async fn list_work_requests(
    db: &DbContext,
    tenant_id: i64,
    status: Option<WorkRequestStatus>,
) -> Result<Vec<WorkRequest>, DbError> {
    let requests = sqlx::query_as::<_, WorkRequest>(&format!(
        "{SELECT_WORK_REQUEST} WHERE tenant_id = ? AND (? IS NULL OR status = ?) ORDER BY created_at DESC, id DESC"
    ))
    .bind(tenant_id)
    .bind(status)
    .bind(status)
    .fetch_all(db)
    .await?;
    Ok(requests)
}

pub async fn get_work_request(db: &DbContext, tenant_id: i64, id: i64) -> Result<WorkRequest, DbError> {
    let request = sqlx::query_as::<_, WorkRequest>(&format!("{SELECT_WORK_REQUEST} WHERE tenant_id = ? AND id = ?"))
        .bind(tenant_id)
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(request)
}

pub async fn create_work_request(db: &DbContext, tenant_id: i64, new_request: NewWorkRequest) -> Result<WorkRequest, DbError> {
    let id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO work_requests (
            tenant_id, customer_name, title, description, category, priority,
            budget_estimate, start_date, due_date, created_at, updated_at)
        VALUES (?, ?, ?, ?, COALESCE(?, 'general'), COALESCE(?, 'medium'), ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id
        ",
    )
    .bind(tenant_id)
    .bind(new_request.customer_name)
    .bind(new_request.title)
    .bind(new_request.description)
    .bind(new_request.category)
    .bind(new_request.priority)
    .bind(new_request.budget_estimate)
    .bind(new_request.start_date)
    .bind(new_request.due_date)
    .fetch_one(db)
    .await?;
    get_work_request(db, tenant_id, id).await
}

pub async fn update_work_request(
    db: &DbContext,
    tenant_id: i64,
    id: i64,
    changes: WorkRequestChanges,
) -> Result<WorkRequest, DbError> {
    let updated = sqlx::query(
        r"
        UPDATE work_requests SET
            customer_name = COALESCE(?, customer_name),
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            priority = COALESCE(?, priority),
            budget_estimate = COALESCE(?, budget_estimate),
            start_date = COALESCE(?, start_date),
            due_date = COALESCE(?, due_date),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND tenant_id = ?
        ",
    )
    .bind(changes.customer_name)
    .bind(changes.title)
    .bind(changes.description)
    .bind(changes.category)
    .bind(changes.priority)
    .bind(changes.budget_estimate)
    .bind(changes.start_date)
    .bind(changes.due_date)
    .bind(id)
    .bind(tenant_id)
    .execute(db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(DbError::not_found());
    }
    get_work_request(db, tenant_id, id).await
}

/// Writes a new status. Approvals and rejections also record who decided and when.
/// Applies `change` only while the request is still in status `from`.
/// Returns `None` when the row moved on (or vanished) since it was read.
pub async fn set_work_request_status(
    db: &DbContext,
    tenant_id: i64,
    id: i64,
    from: WorkRequestStatus,
    change: StatusChange,
) -> Result<Option<WorkRequest>, DbError> {
    let decision = change.status.is_decision();
    let updated = sqlx::query(
        r"
        UPDATE work_requests SET
            status = ?,
            approved_by = CASE WHEN ? THEN ? ELSE approved_by END,
            decided_at = CASE WHEN ? THEN CURRENT_TIMESTAMP ELSE decided_at END,
            decision_note = COALESCE(?, decision_note),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND tenant_id = ? AND status = ?
        ",
    )
    .bind(change.status)
    .bind(decision)
    .bind(change.actor)
    .bind(decision)
    .bind(change.note)
    .bind(id)
    .bind(tenant_id)
    .bind(from)
    .execute(db)
    .await?;
    if updated.rows_affected() == 0 {
        return Ok(None);
    }
    get_work_request(db, tenant_id, id).await.map(Some)
}

pub async fn delete_work_request(db: &DbContext, tenant_id: i64, id: i64) -> Result<(), DbError> {
    let deleted = sqlx::query("DELETE FROM work_requests WHERE id = ? AND tenant_id = ?")
        .bind(id)
        .bind(tenant_id)
        .execute(db)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(DbError::not_found());
    }
    Ok(())
}

pub async fn list_comments(db: &DbContext, work_request_id: i64) -> Result<Vec<WorkRequestComment>, DbError> {
    let comments = sqlx::query_as::<_, WorkRequestComment>(
        r"
        SELECT id, work_request_id, author, body, created_at
        FROM work_request_comments
        WHERE work_request_id = ?
        ORDER BY created_at, id
        ",
    )
    .bind(work_request_id)
    .fetch_all(db)
    .await?;
    Ok(comments)
}

pub async fn add_comment(db: &DbContext, work_request_id: i64, comment: NewComment) -> Result<WorkRequestComment, DbError> {
    let created = sqlx::query_as::<_, WorkRequestComment>(
        r"
        INSERT INTO work_request_comments (work_request_id, author, body, created_at)
        VALUES (?, ?, ?, CURRENT_TIMESTAMP)
        RETURNING id, work_request_id, author, body, created_at
        ",
    )
    .bind(work_request_id)
    .bind(comment.author)
    .bind(comment.body)
    .fetch_one(db)
    .await?;
    Ok(created)
}
