use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::core;
use crate::reports::{self, GroupFilter, PreviewFilters, ReportError, SortDirection, SortSpec};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub dir: Option<SortDirection>,
}

impl ReportQuery {
    fn filters(&self) -> Result<PreviewFilters, ReportError> {
        Ok(PreviewFilters {
            query: self.q.clone().unwrap_or_default(),
            start_date: parse_date_param("start", self.start.as_deref())?,
            end_date: parse_date_param("end", self.end.as_deref())?,
        })
    }

    fn sort(&self) -> Option<SortSpec> {
        let column = self.sort.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        Some(SortSpec {
            column: column.to_string(),
            direction: self.dir.unwrap_or_default(),
        })
    }

    fn seed<'a>(&'a self, context: &'a core::Context) -> &'a str {
        self.seed
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&context.settings.reports.default_seed)
    }
}

/// Empty parameters count as absent.
fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ReportError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ReportError::InvalidQuery(format!("{name} must be YYYY-MM-DD, got '{raw}'"))),
    }
}

pub async fn list_reports(Query(query): Query<CatalogQuery>) -> Result<impl IntoResponse, ReportError> {
    let filter = query.group.as_deref().unwrap_or("all").parse::<GroupFilter>()?;
    let reports = reports::by_group(filter);
    tracing::debug!(count = reports.len(), "Listing report catalog");
    Ok(Json(json!({ "result": "ok", "reports": reports })))
}

/// JSON preview: filtered, optionally sorted, capped at `reports.max_preview_rows`.
pub async fn preview_report(
    State(context): State<core::ArcContext>,
    Path(report_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ReportError> {
    let report = reports::lookup(&report_id).ok_or_else(|| ReportError::NotFound(report_id.clone()))?;
    let filters = query.filters()?;
    let table = reports::generate(report, query.seed(&context))?;

    let mut rows = filters.apply(&table.rows);
    if let Some(spec) = query.sort() {
        reports::sort_rows(&mut rows, &spec);
    }
    let matched = rows.len();
    rows.truncate(context.settings.reports.max_preview_rows);

    tracing::info!(report_id = %report.id, total = table.len(), matched, returned = rows.len(), "Report preview");
    Ok(Json(json!({ "columns": table.columns, "rows": rows })))
}

pub async fn export_report(
    State(context): State<core::ArcContext>,
    Path(report_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ReportError> {
    let report = reports::lookup(&report_id).ok_or_else(|| ReportError::NotFound(report_id.clone()))?;
    let filters = query.filters()?;
    let table = reports::generate(report, query.seed(&context))?;

    let mut rows = filters.apply(&table.rows);
    if let Some(spec) = query.sort() {
        reports::sort_rows(&mut rows, &spec);
    }
    let csv = reports::to_csv(&table.columns, rows.iter().copied());
    let file_name = reports::export_file_name(report);

    tracing::info!(report_id = %report.id, rows = rows.len(), file_name = %file_name, "Report export");
    Ok((
        [
            (header::CONTENT_TYPE, reports::CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        csv,
    ))
}
