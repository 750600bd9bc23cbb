use serde::{Deserialize, Serialize};

/// External append-only ledger sink. Either the endpoint or the token
/// missing disables the subsystem.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub ledger_id: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
}

impl LedgerConfig {
    pub fn is_enabled(&self) -> bool {
        self.url.is_some() && self.ledger_id.is_some() && self.token.is_some()
    }
}

fn default_retry_limit() -> u32 {
    3
}
