use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use warden_dns_application::ports::UpstreamLogPort;
use warden_dns_domain::config::UpstreamConfig;
use warden_dns_domain::{DomainError, FilterReason, UpstreamEvent};

/// Wire shape of the sinkhole's query-log response. Entries missing the
/// queried name are skipped; a response that does not parse at all drops
/// the whole batch.
#[derive(Debug, Deserialize)]
struct QueryLogResponse {
    #[serde(default)]
    data: Vec<QueryLogEntry>,
}

#[derive(Debug, Deserialize)]
struct QueryLogEntry {
    question: Option<QuestionWire>,
    time: Option<String>,
    reason: Option<String>,
    rule: Option<String>,
    filter_id: Option<i64>,
    client: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionWire {
    name: Option<String>,
}

/// HTTP client for the sinkhole query log. Tries the configured URLs in
/// priority order each tick and remembers the last one that answered.
pub struct SinkholeLogClient {
    client: reqwest::Client,
    urls: Vec<String>,
    username: Option<String>,
    password: Option<String>,
    preferred: AtomicUsize,
}

impl SinkholeLogClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent("warden-dns/0.4 (log-poller)")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DomainError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            urls: config.urls.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            preferred: AtomicUsize::new(0),
        })
    }

    fn query_url(base: &str, limit: usize) -> String {
        format!(
            "{}/control/querylog?limit={limit}",
            base.trim_end_matches('/')
        )
    }

    async fn fetch_from(&self, base: &str, limit: usize) -> Result<Vec<UpstreamEvent>, DomainError> {
        let mut request = self.client.get(Self::query_url(base, limit));
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::UpstreamUnavailable(format!("{base}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::UpstreamUnavailable(format!(
                "{base} returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload: QueryLogResponse = response
            .json()
            .await
            .map_err(|e| DomainError::MalformedUpstreamPayload(format!("{base}: {e}")))?;

        Ok(payload.data.into_iter().filter_map(convert_entry).collect())
    }
}

fn convert_entry(entry: QueryLogEntry) -> Option<UpstreamEvent> {
    let name = entry.question.and_then(|q| q.name)?;
    let answered_at = entry
        .time
        .as_deref()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))?;

    Some(UpstreamEvent {
        domain: Arc::from(name.as_str()),
        answered_at,
        filter_reason: FilterReason::new(entry.reason.as_deref().unwrap_or("")),
        filter_rule: entry.rule.as_deref().map(Arc::from),
        filter_id: entry.filter_id,
        client: entry.client.as_deref().map(Arc::from),
    })
}

#[async_trait]
impl UpstreamLogPort for SinkholeLogClient {
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<UpstreamEvent>, DomainError> {
        let start = self.preferred.load(Ordering::Relaxed) % self.urls.len().max(1);
        let mut last_error = DomainError::UpstreamUnavailable("no upstream URLs".to_string());

        for offset in 0..self.urls.len() {
            let index = (start + offset) % self.urls.len();
            let base = &self.urls[index];
            match self.fetch_from(base, limit).await {
                Ok(events) => {
                    if index != start {
                        debug!(url = %base, "Switched to alternate upstream URL");
                    }
                    self.preferred.store(index, Ordering::Relaxed);
                    return Ok(events);
                }
                Err(e) => {
                    warn!(url = %base, error = %e, "Upstream fetch failed, trying next candidate");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
