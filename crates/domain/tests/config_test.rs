use warden_dns_domain::config::{CliOverrides, Config};

#[test]
fn test_defaults_are_sane() {
    let config = Config::default();
    assert_eq!(config.upstream.poll_interval_secs, 30);
    assert_eq!(config.upstream.batch_limit, 100);
    assert_eq!(config.upstream.dedup_window, 5000);
    assert_eq!(config.analysis.worker_pool_size, 8);
    assert_eq!(config.analysis.metadata_threshold, 0.75);
    assert_eq!(config.analysis.entropy_threshold, 3.8);
    assert_eq!(config.analysis.anomaly_min_samples, 10);
    assert_eq!(config.analysis.buffer_capacity, 200);
    assert_eq!(config.cache.memory_capacity, 5000);
    assert_eq!(config.cache.memory_ttl_secs, 300);
    assert_eq!(config.cache.disk_ttl_secs, 3600);
    assert!(config.validate().is_ok());
}

#[test]
fn test_poll_interval_floor() {
    let mut config = Config::default();
    config.upstream.poll_interval_secs = 1;
    assert_eq!(config.upstream.effective_poll_interval(), 5);

    config.upstream.poll_interval_secs = 45;
    assert_eq!(config.upstream.effective_poll_interval(), 45);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let parsed: Config = toml::from_str(
        r#"
        [server]
        web_port = 9000

        [upstream]
        urls = ["http://sinkhole.lan:3000"]
        poll_interval_secs = 15
        "#,
    )
    .unwrap();

    assert_eq!(parsed.server.web_port, 9000);
    assert_eq!(parsed.upstream.urls.len(), 1);
    assert_eq!(parsed.upstream.poll_interval_secs, 15);
    // Untouched sections keep their defaults.
    assert_eq!(parsed.analysis.worker_pool_size, 8);
    assert_eq!(parsed.cache.memory_capacity, 5000);
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = Config::default();
    config.server.web_port = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.upstream.urls.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.analysis.metadata_threshold = 1.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.analysis.worker_pool_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_cli_overrides_apply() {
    let config = Config::load(
        None,
        CliOverrides {
            web_port: Some(8123),
            bind_address: Some("127.0.0.1".to_string()),
            poll_interval: Some(60),
            log_level: Some("debug".to_string()),
        },
    )
    .unwrap();

    assert_eq!(config.server.web_port, 8123);
    assert_eq!(config.server.bind_address, "127.0.0.1");
    assert_eq!(config.upstream.poll_interval_secs, 60);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_subsystem_enablement() {
    let config = Config::default();
    assert!(!config.upstream.has_credentials());
    assert!(!config.reasoning.is_enabled());
    assert!(!config.ledger.is_enabled());

    let mut config = Config::default();
    config.upstream.username = Some("admin".to_string());
    config.upstream.password = Some("secret".to_string());
    config.reasoning.api_key = Some("key".to_string());
    assert!(config.upstream.has_credentials());
    assert!(config.reasoning.is_enabled());
    // Ledger still needs all three settings.
    config.ledger.token = Some("token".to_string());
    assert!(!config.ledger.is_enabled());
}
