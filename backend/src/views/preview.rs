use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reports::{PreviewFilters, ReportSource, ReportTable, Row};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PreviewStatus {
    #[default]
    Idle,
    Loading,
    Loaded { table: ReportTable },
    Failed { message: String },
}

/// Serializable state of the report preview modal.
///
/// `generation` increases every time a fetch is started or the modal is
/// closed; a fetch result is applied only if it carries the current value.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PreviewState {
    pub report_id: Option<String>,
    pub generation: u64,
    pub status: PreviewStatus,
    pub filters: PreviewFilters,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PreviewAction {
    Open { report_id: String },
    Resolved { generation: u64, result: Result<ReportTable, String> },
    SetQuery(String),
    SetStartDate(Option<NaiveDate>),
    SetEndDate(Option<NaiveDate>),
    Close,
}

impl PreviewState {
    #[must_use]
    pub fn reduce(self, action: PreviewAction) -> Self {
        match action {
            PreviewAction::Open { report_id } => Self {
                report_id: Some(report_id),
                generation: self.generation + 1,
                status: PreviewStatus::Loading,
                filters: self.filters,
            },
            PreviewAction::Resolved { generation, result } => {
                if generation != self.generation || self.status != PreviewStatus::Loading {
                    tracing::debug!(generation, current = self.generation, "Discarding stale preview result");
                    return self;
                }
                let status = match result {
                    Ok(table) => PreviewStatus::Loaded { table },
                    Err(message) => PreviewStatus::Failed { message },
                };
                Self { status, ..self }
            }
            PreviewAction::SetQuery(query) => Self { filters: PreviewFilters { query, ..self.filters }, ..self },
            PreviewAction::SetStartDate(start_date) => Self {
                filters: PreviewFilters { start_date, ..self.filters },
                ..self
            },
            PreviewAction::SetEndDate(end_date) => Self {
                filters: PreviewFilters { end_date, ..self.filters },
                ..self
            },
            PreviewAction::Close => Self {
                report_id: None,
                generation: self.generation + 1,
                status: PreviewStatus::Idle,
                filters: PreviewFilters::default(),
            },
        }
    }

    #[must_use]
    pub const fn table(&self) -> Option<&ReportTable> {
        match &self.status {
            PreviewStatus::Loaded { table } => Some(table),
            _ => None,
        }
    }

    /// Filtered rows, derived fresh from the loaded table on every call.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.table().map(|table| self.filters.apply(&table.rows)).unwrap_or_default()
    }
}

/// Drives a `PreviewState` against a `ReportSource`.
pub struct PreviewSession<S> {
    source: S,
    state: PreviewState,
}

impl<S: ReportSource> PreviewSession<S> {
    pub fn new(source: S) -> Self {
        Self { source, state: PreviewState::default() }
    }

    #[must_use]
    pub const fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn dispatch(&mut self, action: PreviewAction) {
        self.state = std::mem::take(&mut self.state).reduce(action);
    }

    /// Opens the modal for `report_id` and waits for the single fetch it triggers.
    pub async fn open(&mut self, report_id: &str) {
        self.dispatch(PreviewAction::Open { report_id: report_id.to_string() });
        let generation = self.state.generation;
        let result = self.source.fetch(report_id).await.map_err(|e| e.to_string());
        self.dispatch(PreviewAction::Resolved { generation, result });
    }
}
