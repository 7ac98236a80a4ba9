use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReportSettings {
    /// Seed used by the row generators when a request does not pass one.
    #[serde(default = "default_seed")]
    pub default_seed: String,

    /// Upper bound on rows returned by the JSON preview endpoint (exports are not capped).
    #[serde(default = "default_max_preview_rows")]
    pub max_preview_rows: usize,
}

fn default_seed() -> String {
    "preview".to_string()
}

const fn default_max_preview_rows() -> usize {
    500
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            default_seed: default_seed(),
            max_preview_rows: default_max_preview_rows(),
        }
    }
}
