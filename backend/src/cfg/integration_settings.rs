use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntegrationSettings {
    #[serde(default = "default_connection_test_delay_ms")]
    pub connection_test_delay_ms: u64,
}

const fn default_connection_test_delay_ms() -> u64 {
    1500
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            connection_test_delay_ms: default_connection_test_delay_ms(),
        }
    }
}
