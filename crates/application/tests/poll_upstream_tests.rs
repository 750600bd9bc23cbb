mod helpers;

use helpers::mock_ports::{upstream_event, upstream_event_at, MockUpstreamLogPort};
use std::sync::Arc;
use std::time::Duration;
use warden_dns_application::services::{
    AnalysisScheduler, DecisionCounters, Deduplicator, VerdictCache,
};
use warden_dns_application::use_cases::PollUpstreamUseCase;

struct PollFixture {
    upstream: Arc<MockUpstreamLogPort>,
    dedup: Arc<Deduplicator>,
    scheduler: Arc<AnalysisScheduler>,
    counters: Arc<DecisionCounters>,
    use_case: PollUpstreamUseCase,
}

fn poll_fixture(queue_capacity: usize) -> PollFixture {
    let upstream = Arc::new(MockUpstreamLogPort::new());
    let dedup = Arc::new(Deduplicator::new(100));
    let cache = Arc::new(VerdictCache::new(64, Duration::from_secs(300)));
    let scheduler = Arc::new(AnalysisScheduler::new(queue_capacity));
    let counters = Arc::new(DecisionCounters::new());

    let use_case = PollUpstreamUseCase::new(
        Arc::clone(&upstream) as Arc<dyn warden_dns_application::ports::UpstreamLogPort>,
        Arc::clone(&dedup),
        cache,
        Arc::clone(&scheduler),
        Arc::clone(&counters),
        100,
    );

    PollFixture {
        upstream,
        dedup,
        scheduler,
        counters,
        use_case,
    }
}

#[tokio::test]
async fn test_tick_admits_new_domains() {
    let fixture = poll_fixture(32);
    fixture.upstream.push_batch(vec![
        upstream_event("one.example.com", "NotFilteredNotFound", 10),
        upstream_event("two.example.com", "FilteredBlackList", 5),
    ]);

    let summary = fixture.use_case.execute().await.unwrap();
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.admitted, 2);
    assert_eq!(fixture.scheduler.queued(), 2);
    assert_eq!(fixture.dedup.in_flight_len(), 2);
}

#[tokio::test]
async fn test_duplicate_within_tick_is_deduplicated() {
    let fixture = poll_fixture(32);
    fixture.upstream.push_batch(vec![
        upstream_event("same.example.com", "NotFilteredNotFound", 10),
        upstream_event("same.example.com", "NotFilteredNotFound", 5),
    ]);

    let summary = fixture.use_case.execute().await.unwrap();
    assert_eq!(summary.admitted, 1);
    assert_eq!(summary.deduplicated, 1);
}

#[tokio::test]
async fn test_high_water_mark_skips_seen_events() {
    let fixture = poll_fixture(32);
    let t0 = chrono::Utc::now() - chrono::Duration::seconds(60);
    let t1 = chrono::Utc::now() - chrono::Duration::seconds(1);
    fixture
        .upstream
        .push_batch(vec![upstream_event_at("one.example.com", "NotFilteredNotFound", t0)]);
    // Second batch replays the same timestamp plus one newer event.
    fixture.upstream.push_batch(vec![
        upstream_event_at("one.example.com", "NotFilteredNotFound", t0),
        upstream_event_at("newer.example.com", "NotFilteredNotFound", t1),
    ]);

    let first = fixture.use_case.execute().await.unwrap();
    assert_eq!(first.admitted, 1);

    let second = fixture.use_case.execute().await.unwrap();
    assert_eq!(second.admitted, 1);
    assert_eq!(second.deduplicated, 0);
}

#[tokio::test]
async fn test_invalid_domains_are_dropped() {
    let fixture = poll_fixture(32);
    fixture.upstream.push_batch(vec![
        upstream_event("no-dot", "NotFilteredNotFound", 10),
        upstream_event("ok.example.com", "NotFilteredNotFound", 5),
    ]);

    let summary = fixture.use_case.execute().await.unwrap();
    assert_eq!(summary.invalid, 1);
    assert_eq!(summary.admitted, 1);
}

#[tokio::test]
async fn test_saturated_pool_drops_and_counts() {
    let fixture = poll_fixture(1);
    fixture.upstream.push_batch(vec![
        upstream_event("one.example.com", "NotFilteredNotFound", 10),
        upstream_event("two.example.com", "NotFilteredNotFound", 5),
    ]);

    let summary = fixture.use_case.execute().await.unwrap();
    assert_eq!(summary.admitted, 1);
    assert_eq!(summary.dropped, 1);
    assert_eq!(fixture.counters.poll_dropped(), 1);
    // The dropped domain's slot was released for a later tick.
    assert_eq!(fixture.dedup.in_flight_len(), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_propagated_not_panicked() {
    let fixture = poll_fixture(32);
    fixture.upstream.set_should_fail(true);
    assert!(fixture.use_case.execute().await.is_err());
}

#[tokio::test]
async fn test_empty_tick_is_valid() {
    let fixture = poll_fixture(32);
    let summary = fixture.use_case.execute().await.unwrap();
    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.admitted, 0);
}
