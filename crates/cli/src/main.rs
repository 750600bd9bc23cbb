use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use warden_dns_api::{create_routes, AppState};
use warden_dns_application::ports::{
    DiskCachePort, LedgerPort, ReasoningPort, SignatureSnapshotPort, UpstreamLogPort,
};
use warden_dns_application::services::{
    spawn_workers, AnalysisOrchestrator, AnalysisScheduler, AnomalyEngine, CircuitBreaker,
    DecisionCounters, Deduplicator, HeuristicEngine, MetadataClassifier, PatternLearner,
    SignatureStore, VerdictBuffer, VerdictCache,
};
use warden_dns_application::use_cases::{
    AnalyzeDomainUseCase, GetHistoryUseCase, GetManualHistoryUseCase, GetSystemStatsUseCase,
    PollUpstreamUseCase,
};
use warden_dns_domain::baseline_signatures;
use warden_dns_infrastructure::{
    FileSignatureStore, FileVerdictStore, HttpLedgerSink, ReasoningClient, SinkholeLogClient,
};
use warden_dns_jobs::{CacheSweepJob, JobRunner, PollJob, SignatureSnapshotJob};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "warden-dns")]
#[command(version)]
#[command(about = "Warden DNS - sinkhole log triage with tiered threat verdicts")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Web server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Upstream poll interval in seconds
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = warden_dns_domain::config::CliOverrides {
        web_port: cli.web_port,
        bind_address: cli.bind.clone(),
        poll_interval: cli.poll_interval,
        log_level: cli.log_level.clone(),
    };

    let config = warden_dns_domain::Config::load(cli.config.as_deref(), cli_overrides)?;
    config.validate()?;

    let log_level = config.logging.level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_max_level(log_level)
        .with_ansi(true)
        .init();

    info!("Starting Warden DNS v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        web_port = config.server.web_port,
        bind = %config.server.bind_address,
        poll_interval = config.upstream.effective_poll_interval(),
        "Configuration loaded"
    );

    let shutdown = CancellationToken::new();

    // Signature store: disk snapshot first, baseline seed otherwise.
    let signatures = Arc::new(SignatureStore::new(baseline_signatures()));
    let snapshot_store: Arc<dyn SignatureSnapshotPort> = Arc::new(FileSignatureStore::new(
        Path::new(&config.analysis.signature_snapshot_path),
    ));
    match snapshot_store.load().await {
        Ok(Some(persisted)) => {
            info!(signatures = persisted.len(), "Loaded signature snapshot");
            signatures.replace(persisted);
        }
        Ok(None) => info!(
            seeds = signatures.len(),
            "No signature snapshot, using baseline set"
        ),
        Err(e) => warn!(error = %e, "Signature snapshot unreadable, using baseline set"),
    }

    // Verdict cache: memory tier always, disk tier best-effort.
    let memory_ttl = Duration::from_secs(config.cache.memory_ttl_secs);
    let cache = match FileVerdictStore::open(
        Path::new(&config.cache.disk_path),
        Duration::from_secs(config.cache.disk_ttl_secs),
        config.cache.disk_max_bytes,
    )
    .await
    {
        Ok(disk) => Arc::new(
            VerdictCache::new(config.cache.memory_capacity, memory_ttl).with_disk(
                Arc::new(disk) as Arc<dyn DiskCachePort>,
                config.cache.write_queue,
            ),
        ),
        Err(e) => {
            warn!(error = %e, "Disk cache unavailable, running memory-only");
            Arc::new(VerdictCache::new(config.cache.memory_capacity, memory_ttl))
        }
    };

    let reasoning = match ReasoningClient::from_config(&config.reasoning)? {
        Some(client) => Some(Arc::new(client) as Arc<dyn ReasoningPort>),
        None => {
            warn!("No reasoning API key, cloud tier disabled");
            None
        }
    };

    let ledger = match HttpLedgerSink::from_config(&config.ledger)? {
        Some(sink) => Some(Arc::new(sink) as Arc<dyn LedgerPort>),
        None => {
            warn!("Ledger credentials incomplete, ledger sink disabled");
            None
        }
    };

    let dedup = Arc::new(Deduplicator::new(config.upstream.dedup_window));
    let metadata = Arc::new(MetadataClassifier::new(
        Arc::clone(&signatures),
        config.analysis.metadata_threshold,
    ));
    let heuristics = Arc::new(HeuristicEngine::new(
        config.analysis.entropy_threshold,
        config.analysis.entropy_window,
    ));
    let anomaly = Arc::new(AnomalyEngine::new(
        config.analysis.anomaly_min_samples,
        config.analysis.anomaly_buffer,
        config.analysis.anomaly_threshold,
    ));
    let breaker = Arc::new(CircuitBreaker::new(
        config.reasoning.window,
        config.reasoning.failure_threshold,
        Duration::from_secs(config.reasoning.open_base_secs),
        Duration::from_secs(config.reasoning.open_cap_secs),
    ));
    let learner = Arc::new(PatternLearner::new(Arc::clone(&signatures)));
    let buffer = Arc::new(VerdictBuffer::new(config.analysis.buffer_capacity));
    let counters = Arc::new(DecisionCounters::new());

    let orchestrator = Arc::new(AnalysisOrchestrator::new(
        Arc::clone(&cache),
        Arc::clone(&dedup),
        metadata,
        Arc::clone(&heuristics),
        Arc::clone(&anomaly),
        Arc::clone(&breaker),
        reasoning,
        ledger,
        learner,
        Arc::clone(&buffer),
        Arc::clone(&counters),
        Duration::from_millis(config.analysis.domain_budget_ms),
        Duration::from_secs(config.reasoning.timeout_secs),
        config.ledger.retry_limit,
    ));

    let scheduler = Arc::new(AnalysisScheduler::new(
        config.analysis.worker_pool_size * 8,
    ));
    spawn_workers(
        Arc::clone(&scheduler),
        orchestrator,
        config.analysis.worker_pool_size,
        shutdown.clone(),
    );

    // Background jobs.
    let mut runner = JobRunner::new()
        .with_cache_sweep(
            CacheSweepJob::new(Arc::clone(&cache))
                .with_interval(config.cache.sweep_interval_secs),
        )
        .with_signature_snapshot(
            SignatureSnapshotJob::new(Arc::clone(&signatures), Arc::clone(&snapshot_store))
                .with_interval(config.analysis.snapshot_interval_secs),
        )
        .with_shutdown_token(shutdown.clone());

    if config.upstream.has_credentials() {
        let upstream: Arc<dyn UpstreamLogPort> =
            Arc::new(SinkholeLogClient::new(&config.upstream)?);
        let poll = Arc::new(PollUpstreamUseCase::new(
            upstream,
            Arc::clone(&dedup),
            Arc::clone(&cache),
            Arc::clone(&scheduler),
            Arc::clone(&counters),
            config.upstream.batch_limit,
        ));
        runner = runner.with_poll(PollJob::new(
            poll,
            config.upstream.effective_poll_interval(),
        ));
    } else {
        warn!("No upstream credentials, poller disabled (manual analysis only)");
    }

    runner.start().await;

    // HTTP surface.
    let state = AppState {
        analyze: Arc::new(AnalyzeDomainUseCase::new(
            Arc::clone(&scheduler),
            Duration::from_millis(config.analysis.domain_budget_ms)
                + Duration::from_secs(config.reasoning.timeout_secs),
        )),
        history: Arc::new(GetHistoryUseCase::new(Arc::clone(&buffer))),
        manual_history: Arc::new(GetManualHistoryUseCase::new(Arc::clone(&buffer))),
        stats: Arc::new(GetSystemStatsUseCase::new(
            Arc::clone(&counters),
            Arc::clone(&cache),
            Arc::clone(&anomaly),
            Arc::clone(&heuristics),
            Arc::clone(&signatures),
            Arc::clone(&breaker),
            Arc::clone(&buffer),
            config.analysis.metadata_threshold,
        )),
        buffer: Arc::clone(&buffer),
    };

    let app = create_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let web_addr = format!("{}:{}", config.server.bind_address, config.server.web_port);
    let listener = tokio::net::TcpListener::bind(&web_addr).await?;
    info!(bind_address = %web_addr, "Web server listening");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            server_shutdown.cancel();
        })
        .await?;

    // Give the snapshot job a moment to run its final flush.
    tokio::time::sleep(Duration::from_millis(250)).await;
    info!("Server shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
