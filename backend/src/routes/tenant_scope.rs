use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::core::ArcContext;
use crate::db;
use crate::routes::ApiError;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// The tenant a request operates on, read from `x-tenant-id` and checked against the tenants table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TenantScope(pub i64);

impl FromRequestParts<ArcContext> for TenantScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, context: &ArcContext) -> Result<Self, Self::Rejection> {
        let tenant_id = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or(ApiError::TenantRequired)?;

        db::get_tenant_by_id(&context.db, tenant_id)
            .await
            .map_err(ApiError::lookup("Tenant"))?;

        Ok(Self(tenant_id))
    }
}
