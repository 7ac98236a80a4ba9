use std::future::Future;

use thiserror::Error;
use url::Url;

use crate::reports::{self, PayloadError, ReportError, ReportTable};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Report not found")]
    NotFound,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed report payload: {0}")]
    Malformed(#[from] PayloadError),

    #[error("{0}")]
    Report(ReportError),
}

impl From<ReportError> for FetchError {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::NotFound(_) => Self::NotFound,
            other => Self::Report(other),
        }
    }
}

/// Where preview rows come from. View-state code never calls this directly;
/// a session drives it and feeds the outcome back as an action.
pub trait ReportSource {
    fn fetch(&self, report_id: &str) -> impl Future<Output = Result<ReportTable, FetchError>> + Send;
}

/// Serves rows straight from the in-process generators.
#[derive(Clone, Debug)]
pub struct CatalogSource {
    pub seed: String,
}

impl CatalogSource {
    #[must_use]
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }
}

impl ReportSource for CatalogSource {
    async fn fetch(&self, report_id: &str) -> Result<ReportTable, FetchError> {
        let report = reports::lookup(report_id).ok_or(FetchError::NotFound)?;
        Ok(reports::generate(report, &self.seed)?)
    }
}

/// Fetches rows from a running server's `GET /api/reports/{id}`.
#[derive(Clone, Debug)]
pub struct HttpReportSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpReportSource {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    pub fn report_url(&self, report_id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "reports", report_id]);
        Ok(url)
    }
}

impl ReportSource for HttpReportSource {
    async fn fetch(&self, report_id: &str) -> Result<ReportTable, FetchError> {
        let url = self.report_url(report_id)?;
        tracing::debug!(%url, "Fetching report preview");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status: status.as_u16(), body });
        }
        let body: serde_json::Value = response.json().await?;
        Ok(reports::decode_payload(body)?)
    }
}
