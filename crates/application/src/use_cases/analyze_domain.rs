use crate::services::{AnalysisJob, AnalysisScheduler, RequestOrigin};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::warn;
use warden_dns_domain::{
    DomainError, DomainFingerprint, RiskLevel, ThreatCategory, Verdict, VerdictSource,
};

/// Manual "analyze this domain" entry point. Validation errors are the
/// only failures surfaced to the caller; everything downstream degrades
/// to a Fallback verdict so the endpoint always answers.
pub struct AnalyzeDomainUseCase {
    scheduler: Arc<AnalysisScheduler>,
    reply_timeout: Duration,
}

impl AnalyzeDomainUseCase {
    pub fn new(scheduler: Arc<AnalysisScheduler>, reply_timeout: Duration) -> Self {
        Self {
            scheduler,
            reply_timeout,
        }
    }

    pub async fn execute(
        &self,
        raw_domain: &str,
        note: Option<String>,
    ) -> Result<Arc<Verdict>, DomainError> {
        let fingerprint = DomainFingerprint::parse(raw_domain)?;
        let domain = fingerprint.as_arc();

        let (tx, rx) = oneshot::channel();
        let job = AnalysisJob {
            fingerprint,
            meta: None,
            origin: RequestOrigin::Manual,
            note,
            reply: Some(tx),
        };

        if !self.scheduler.enqueue_manual(job) {
            warn!(domain = %domain, "Manual queue full, answering degraded");
            return Ok(Arc::new(degraded(&domain, "worker pool saturated")));
        }

        match tokio::time::timeout(self.reply_timeout, rx).await {
            Ok(Ok(verdict)) => Ok(verdict),
            Ok(Err(_)) | Err(_) => {
                warn!(domain = %domain, "Manual analysis did not answer in time");
                Ok(Arc::new(degraded(&domain, "analysis deadline exceeded")))
            }
        }
    }
}

fn degraded(domain: &Arc<str>, why: &str) -> Verdict {
    Verdict {
        domain: Arc::clone(domain),
        risk: RiskLevel::Low,
        category: ThreatCategory::Unknown,
        summary: format!("Analysis unavailable ({why}); degraded mode"),
        is_anomaly: false,
        anomaly_score: 0.0,
        entropy: 0.0,
        source: VerdictSource::Fallback,
        upstream_meta: None,
        decided_at: Utc::now(),
    }
}
