use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::core;
use crate::routes::ApiError;
use crate::talent::{CandidateStage, TalentPool};

#[derive(Debug, Default, Deserialize)]
pub struct TalentQuery {
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub stage: Option<CandidateStage>,
}

impl TalentQuery {
    fn pool(&self, context: &core::Context) -> TalentPool {
        let seed = self
            .seed
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&context.settings.reports.default_seed);
        TalentPool::generate(seed)
    }
}

pub async fn list_candidates(
    State(context): State<core::ArcContext>,
    Query(query): Query<TalentQuery>,
) -> impl IntoResponse {
    let pool = query.pool(&context);
    Json(pool.candidates_in_stage(query.stage).into_iter().cloned().collect::<Vec<_>>())
}

pub async fn get_candidate(
    State(context): State<core::ArcContext>,
    Path(id): Path<String>,
    Query(query): Query<TalentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = query.pool(&context);
    let candidate = pool.candidate(&id).cloned().ok_or(ApiError::NotFound("Candidate"))?;
    Ok(Json(candidate))
}

pub async fn list_interviews(
    State(context): State<core::ArcContext>,
    Query(query): Query<TalentQuery>,
) -> impl IntoResponse {
    Json(query.pool(&context).interviews)
}

pub async fn list_offers(
    State(context): State<core::ArcContext>,
    Query(query): Query<TalentQuery>,
) -> impl IntoResponse {
    Json(query.pool(&context).offers)
}
