use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use warden_dns_application::ports::{LedgerPort, LedgerRow};
use warden_dns_domain::config::LedgerConfig;
use warden_dns_domain::DomainError;

/// Append body: ledger id plus the row values in the sink's fixed column
/// order. The sink deduplicates on `(decided_at, domain)`, so replays
/// after a retry are harmless.
#[derive(Debug, Serialize)]
struct AppendWire<'a> {
    ledger_id: &'a str,
    values: [serde_json::Value; 10],
}

/// HTTPS append-only row writer. One append per committed verdict; the
/// orchestrator owns retry/backoff around this call.
pub struct HttpLedgerSink {
    client: reqwest::Client,
    url: String,
    ledger_id: String,
    token: String,
}

impl HttpLedgerSink {
    /// Returns None when the endpoint, ledger id or token is missing; the
    /// subsystem is disabled and commits skip the ledger.
    pub fn from_config(config: &LedgerConfig) -> Result<Option<Self>, DomainError> {
        let (Some(url), Some(ledger_id), Some(token)) =
            (&config.url, &config.ledger_id, &config.token)
        else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .user_agent("warden-dns/0.4 (ledger)")
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DomainError::LedgerAppendFailed(e.to_string()))?;

        Ok(Some(Self {
            client,
            url: url.clone(),
            ledger_id: ledger_id.clone(),
            token: token.clone(),
        }))
    }

    fn values(row: &LedgerRow) -> [serde_json::Value; 10] {
        [
            row.decided_at.clone().into(),
            row.domain.clone().into(),
            row.risk.clone().into(),
            row.category.clone().into(),
            row.summary.clone().into(),
            row.upstream_reason.clone().into(),
            row.upstream_rule.clone().into(),
            row.is_anomaly.into(),
            row.anomaly_score.into(),
            row.entropy.into(),
        ]
    }
}

#[async_trait]
impl LedgerPort for HttpLedgerSink {
    async fn append(&self, row: &LedgerRow) -> Result<(), DomainError> {
        let body = AppendWire {
            ledger_id: &self.ledger_id,
            values: Self::values(row),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::LedgerAppendFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::LedgerAppendFailed(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        debug!(domain = %row.domain, "Ledger row appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_is_fixed() {
        let row = LedgerRow {
            decided_at: "2026-07-30T12:00:00.000Z".to_string(),
            domain: "tracker.example.com".to_string(),
            risk: "Medium".to_string(),
            category: "Tracker".to_string(),
            summary: "tracking endpoint".to_string(),
            upstream_reason: "FilteredBlackList".to_string(),
            upstream_rule: "||tracker.example.com^".to_string(),
            is_anomaly: false,
            anomaly_score: 0.02,
            entropy: 3.1,
        };

        let values = HttpLedgerSink::values(&row);
        assert_eq!(values[0], "2026-07-30T12:00:00.000Z");
        assert_eq!(values[1], "tracker.example.com");
        assert_eq!(values[2], "Medium");
        assert_eq!(values[3], "Tracker");
        assert_eq!(values[5], "FilteredBlackList");
        assert_eq!(values[7], false);
    }

    #[test]
    fn test_disabled_without_credentials() {
        let config = LedgerConfig::default();
        assert!(HttpLedgerSink::from_config(&config).unwrap().is_none());
    }
}
