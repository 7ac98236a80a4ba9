use axum::Router;
use axum::routing::{get, post, put};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core;
use crate::routes;

/// Back end server built from the report, admin and talent routes
pub fn create_router(context: core::ArcContext) -> Router {
    let report_routes = Router::new()
        .route("/api/reports", get(routes::reports::list_reports))
        .route("/api/reports/{id}", get(routes::reports::preview_report))
        .route("/api/reports/{id}/export", get(routes::reports::export_report));

    // tenant-scoped routes read the tenant from the x-tenant-id header
    let admin_routes = Router::new()
        .route("/api/tenants", get(routes::tenants::list_tenants).post(routes::tenants::create_tenant))
        .route("/api/tenants/{id}", get(routes::tenants::get_tenant))
        .route("/api/users", get(routes::users::list_users).post(routes::users::create_user))
        .route("/api/users/role-stats", get(routes::users::role_stats))
        .route(
            "/api/users/{id}",
            get(routes::users::get_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/api/users/{id}/activate", post(routes::users::activate_user))
        .route(
            "/api/work-requests",
            get(routes::work_requests::list_work_requests).post(routes::work_requests::create_work_request),
        )
        .route(
            "/api/work-requests/{id}",
            get(routes::work_requests::get_work_request)
                .patch(routes::work_requests::update_work_request)
                .delete(routes::work_requests::delete_work_request),
        )
        .route("/api/work-requests/{id}/status", post(routes::work_requests::change_status))
        .route(
            "/api/work-requests/{id}/comments",
            get(routes::work_requests::list_comments).post(routes::work_requests::add_comment),
        );

    let integration_routes = Router::new()
        .route(
            "/api/integrations/paycom",
            get(routes::integrations::get_paycom).put(routes::integrations::save_paycom),
        )
        .route("/api/integrations/paycom/credentials", put(routes::integrations::replace_credentials))
        .route(
            "/api/integrations/paycom/endpoints",
            get(routes::integrations::list_endpoints).put(routes::integrations::save_endpoints),
        )
        .route(
            "/api/integrations/paycom/sync-history",
            get(routes::integrations::sync_history).post(routes::integrations::record_sync_run),
        )
        .route("/api/integrations/paycom/test", post(routes::integrations::test_connection));

    let talent_routes = Router::new()
        .route("/api/talent/candidates", get(routes::talent::list_candidates))
        .route("/api/talent/candidates/{id}", get(routes::talent::get_candidate))
        .route("/api/talent/interviews", get(routes::talent::list_interviews))
        .route("/api/talent/offers", get(routes::talent::list_offers));

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check)); // Health check endpoint

    // Combine all routes
    Router::new()
        .merge(report_routes)
        .merge(admin_routes)
        .merge(integration_routes)
        .merge(talent_routes)
        .merge(public_routes)
        .with_state(context)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
