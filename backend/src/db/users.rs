use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{DbContext, DbError};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RoleLevel {
    Host,
    PrimaryClient,
    SubClient,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub tenant_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub role_level: RoleLevel,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub avatar_url: Option<String>,
    pub activated_at: Option<NaiveDateTime>,
    pub confirmed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    pub role_level: RoleLevel,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub role_level: Option<RoleLevel>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Eq, PartialEq, Serialize)]
pub struct RoleStat {
    pub role: String,
    pub role_level: RoleLevel,
    pub count: usize,
}

const SELECT_USER: &str = r"
    SELECT
        u.id,
        u.tenant_id,
        u.email,
        u.first_name,
        u.last_name,
        u.phone,
        u.role,
        u.role_level,
        p.job_title,
        p.department,
        p.avatar_url,
        u.activated_at,
        u.confirmed_at,
        u.created_at,
        u.updated_at
    FROM users u
    LEFT JOIN user_profiles p ON p.user_id = u.id
";

pub async fn list_users(db: &DbContext, tenant_id: i64) -> Result<Vec<User>, DbError> {
    let users = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE u.tenant_id = ? ORDER BY u.last_name, u.first_name, u.id"))
        .bind(tenant_id)
        .fetch_all(db)
        .await?;
    Ok(users)
}

pub async fn get_user(db: &DbContext, tenant_id: i64, id: i64) -> Result<User, DbError> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE u.tenant_id = ? AND u.id = ?"))
        .bind(tenant_id)
        .bind(id)
        .fetch_one(db)
        .await?;
    Ok(user)
}

/// Inserts the user and its profile row in one transaction.
pub async fn create_user(db: &DbContext, tenant_id: i64, new_user: NewUser) -> Result<User, DbError> {
    let mut tx = db.begin().await?;

    let id: i64 = sqlx::query_scalar(
        r"
        INSERT INTO users (tenant_id, email, first_name, last_name, phone, role, role_level, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
        RETURNING id
        ",
    )
    .bind(tenant_id)
    .bind(new_user.email.trim().to_lowercase())
    .bind(new_user.first_name)
    .bind(new_user.last_name)
    .bind(new_user.phone)
    .bind(new_user.role)
    .bind(new_user.role_level)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_profiles (user_id, job_title, department) VALUES (?, ?, ?)")
        .bind(id)
        .bind(new_user.job_title)
        .bind(new_user.department)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    get_user(db, tenant_id, id).await
}

pub async fn update_user(db: &DbContext, tenant_id: i64, id: i64, changes: UserChanges) -> Result<User, DbError> {
    let mut tx = db.begin().await?;

    let updated = sqlx::query(
        r"
        UPDATE users SET
            first_name = COALESCE(?, first_name),
            last_name = COALESCE(?, last_name),
            phone = COALESCE(?, phone),
            role = COALESCE(?, role),
            role_level = COALESCE(?, role_level),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND tenant_id = ?
        ",
    )
    .bind(changes.first_name)
    .bind(changes.last_name)
    .bind(changes.phone)
    .bind(changes.role)
    .bind(changes.role_level)
    .bind(id)
    .bind(tenant_id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(DbError::not_found());
    }

    sqlx::query(
        r"
        INSERT INTO user_profiles (user_id, job_title, department, avatar_url)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            job_title = COALESCE(excluded.job_title, user_profiles.job_title),
            department = COALESCE(excluded.department, user_profiles.department),
            avatar_url = COALESCE(excluded.avatar_url, user_profiles.avatar_url),
            updated_at = CURRENT_TIMESTAMP
        ",
    )
    .bind(id)
    .bind(changes.job_title)
    .bind(changes.department)
    .bind(changes.avatar_url)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    get_user(db, tenant_id, id).await
}

/// Marks the account activated and confirmed; timestamps already set are kept.
pub async fn activate_user(db: &DbContext, tenant_id: i64, id: i64) -> Result<User, DbError> {
    let updated = sqlx::query(
        r"
        UPDATE users SET
            activated_at = COALESCE(activated_at, CURRENT_TIMESTAMP),
            confirmed_at = COALESCE(confirmed_at, CURRENT_TIMESTAMP),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ? AND tenant_id = ?
        ",
    )
    .bind(id)
    .bind(tenant_id)
    .execute(db)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(DbError::not_found());
    }
    get_user(db, tenant_id, id).await
}

/// Removes the profile and then the user; both deletes commit together or not at all.
pub async fn delete_user(db: &DbContext, tenant_id: i64, id: i64) -> Result<(), DbError> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM user_profiles WHERE user_id IN (SELECT id FROM users WHERE id = ? AND tenant_id = ?)")
        .bind(id)
        .bind(tenant_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM users WHERE id = ? AND tenant_id = ?")
        .bind(id)
        .bind(tenant_id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        // dropping the transaction rolls the profile delete back
        return Err(DbError::not_found());
    }

    tx.commit().await?;
    Ok(())
}

/// Counts users per (role, role level), ordered by role then level.
#[must_use]
pub fn role_stats(users: &[User]) -> Vec<RoleStat> {
    let mut counts: BTreeMap<(&str, RoleLevel), usize> = BTreeMap::new();
    for user in users {
        *counts.entry((user.role.as_str(), user.role_level)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((role, role_level), count)| RoleStat { role: role.to_string(), role_level, count })
        .collect()
}
