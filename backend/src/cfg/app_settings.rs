use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::cfg;

const ENV_PREFIX: &str = "APP";
const RUN_ENV_VAR: &str = "APP_RUN_ENV";
const DEFAULT_RUN_ENV: &str = "production";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AppSettings {
    #[serde(default)]
    pub server: cfg::ServerSettings,

    #[serde(default)]
    pub database: cfg::DatabaseSettings,

    #[serde(default)]
    pub reports: cfg::ReportSettings,

    #[serde(default)]
    pub integrations: cfg::IntegrationSettings,
}

/// Config files for `run_env`, lowest precedence first. Missing files are skipped.
fn config_files(dir: &Path, run_env: &str) -> [PathBuf; 3] {
    [
        dir.join("configs.default.toml"),
        dir.join(format!("configs.{run_env}.toml")),
        dir.join("configs.local.toml"),
    ]
}

impl AppSettings {
    /// Loads settings from the working directory for the current `APP_RUN_ENV`.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Self::get_config_path(), &Self::get_app_run_env())
    }

    /// Built-in defaults, then the config files in `dir`, then
    /// `APP_<SECTION>__<KEY>` variables (e.g. `APP_REPORTS__DEFAULT_SEED`).
    pub fn load_from(dir: &Path, run_env: &str) -> Result<Self, ConfigError> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| ConfigError::Message(format!("Failed to serialize defaults: {e}")))?;

        let builder = config_files(dir, run_env)
            .into_iter()
            .fold(
                Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml)),
                |builder, path| builder.add_source(File::from(path).required(false)),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let problem = if self.database.url.trim().is_empty() {
            Some("database.url must not be empty")
        } else if self.database.max_connections == 0 {
            Some("database.max_connections must be at least 1")
        } else if self.reports.default_seed.is_empty() {
            Some("reports.default_seed must not be empty")
        } else if self.reports.max_preview_rows == 0 {
            Some("reports.max_preview_rows must be at least 1")
        } else {
            None
        };
        problem.map_or(Ok(()), |message| Err(ConfigError::Message(message.to_string())))
    }

    #[must_use]
    pub fn get_server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn get_app_run_env() -> String {
        env::var(RUN_ENV_VAR).unwrap_or_else(|_| DEFAULT_RUN_ENV.to_string())
    }

    #[must_use]
    pub fn get_config_path() -> &'static Path {
        Path::new(".")
    }

    #[must_use]
    pub fn get_config_full_path() -> String {
        let config_path = Self::get_config_path();
        config_path
            .canonicalize()
            .unwrap_or_else(|_| config_path.to_path_buf())
            .display()
            .to_string()
    }
}
