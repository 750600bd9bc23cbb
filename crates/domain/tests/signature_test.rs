use std::sync::Arc;
use warden_dns_domain::{
    baseline_signatures, rule_prefix, ClientClass, FilterReason, SignatureKey, UpstreamMeta,
};

fn meta(reason: &str, rule: Option<&str>, filter_id: Option<i64>, client: Option<&str>) -> UpstreamMeta {
    UpstreamMeta {
        reason: FilterReason::new(reason),
        rule: rule.map(Arc::from),
        filter_id,
        client: client.map(Arc::from),
    }
}

#[test]
fn test_rule_prefix_strips_adblock_anchors() {
    assert_eq!(&*rule_prefix("||doubleclick.net^"), "doubleclick.net");
    assert_eq!(&*rule_prefix("|https://ads.example/*"), "https://ads.example/");
}

#[test]
fn test_rule_prefix_truncates() {
    let long = "averyveryverylongruletextthatkeepsgoing";
    assert_eq!(rule_prefix(long).len(), 24);
}

#[test]
fn test_key_from_meta() {
    let meta = meta(
        "FilteredBlackList",
        Some("||ads.example^"),
        Some(3),
        Some("192.168.1.20"),
    );
    let key = SignatureKey::from_meta(&meta);

    assert_eq!(key.reason.as_str(), "FilteredBlackList");
    assert_eq!(key.filter_id, Some(3));
    assert_eq!(key.rule_prefix.as_deref(), Some("ads.example"));
    assert_eq!(key.client_class, ClientClass::Local);
}

#[test]
fn test_fallbacks_decreasing_specificity() {
    let meta = meta("FilteredBlackList", Some("||ads.example^"), Some(3), Some("10.0.0.2"));
    let key = SignatureKey::from_meta(&meta);
    let probes = key.fallbacks();

    assert_eq!(probes[0], key);

    assert_eq!(probes[1].filter_id, None);
    assert_eq!(probes[1].rule_prefix.as_deref(), Some("ads.example"));
    assert_eq!(probes[1].client_class, ClientClass::Unknown);

    assert_eq!(probes[2].filter_id, None);
    assert_eq!(probes[2].rule_prefix, None);
    assert_eq!(probes[2].client_class, ClientClass::Unknown);
    assert_eq!(probes[2].reason.as_str(), "FilteredBlackList");
}

#[test]
fn test_client_classification() {
    assert_eq!(ClientClass::classify(Some("192.168.1.5")), ClientClass::Local);
    assert_eq!(ClientClass::classify(Some("10.1.2.3")), ClientClass::Local);
    assert_eq!(ClientClass::classify(Some("127.0.0.1")), ClientClass::Local);
    assert_eq!(ClientClass::classify(Some("8.8.8.8")), ClientClass::Remote);
    assert_eq!(ClientClass::classify(Some("laptop.local")), ClientClass::Local);
    assert_eq!(ClientClass::classify(Some("host.example.com")), ClientClass::Remote);
    assert_eq!(ClientClass::classify(None), ClientClass::Unknown);
}

#[test]
fn test_unknown_reason_is_unfiltered() {
    assert!(!FilterReason::new("NotFilteredNotFound").is_filtered());
    assert!(!FilterReason::new("SomethingNew").is_filtered());
    assert!(FilterReason::new("FilteredBlackList").is_filtered());
    assert!(FilterReason::new("Blocked by rule").is_filtered());
}

#[test]
fn test_baseline_signatures_are_well_formed() {
    let seeds = baseline_signatures();
    assert!(!seeds.is_empty());
    for sig in &seeds {
        assert!((0.0..=1.0).contains(&sig.confidence));
        assert!(sig.key.rule_prefix.is_none());
        assert_eq!(sig.key.client_class, ClientClass::Unknown);
    }
}
