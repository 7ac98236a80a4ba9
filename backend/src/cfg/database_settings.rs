use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub max_connections: u32,

    /// Apply embedded migrations before the server starts listening.
    #[serde(default)]
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite:hradmin.sqlite".to_string(),
            max_connections: 5,
            run_migrations: true,
        }
    }
}
