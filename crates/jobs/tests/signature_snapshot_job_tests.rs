mod helpers;

use helpers::mock_ports::MockSignatureSnapshotPort;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use warden_dns_application::ports::SignatureSnapshotPort;
use warden_dns_application::services::SignatureStore;
use warden_dns_domain::baseline_signatures;
use warden_dns_jobs::SignatureSnapshotJob;

#[tokio::test]
async fn test_flush_persists_current_store() {
    let store = Arc::new(SignatureStore::new(baseline_signatures()));
    let snapshot = Arc::new(MockSignatureSnapshotPort::new());
    let job = SignatureSnapshotJob::new(
        Arc::clone(&store),
        Arc::clone(&snapshot) as Arc<dyn SignatureSnapshotPort>,
    );

    job.flush().await;

    assert_eq!(snapshot.call_count(), 1);
    assert_eq!(
        snapshot.last_persisted().unwrap().len(),
        baseline_signatures().len()
    );
}

#[tokio::test]
async fn test_shutdown_triggers_final_flush() {
    let store = Arc::new(SignatureStore::new(baseline_signatures()));
    let snapshot = Arc::new(MockSignatureSnapshotPort::new());
    let token = CancellationToken::new();

    let job = SignatureSnapshotJob::new(
        Arc::clone(&store),
        Arc::clone(&snapshot) as Arc<dyn SignatureSnapshotPort>,
    )
    .with_interval(3600)
    .with_cancellation(token.clone());

    Arc::new(job).start().await;
    // The hourly tick never fires in this test; only the shutdown flush.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(snapshot.call_count(), 0);

    token.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(snapshot.call_count(), 1);
}
