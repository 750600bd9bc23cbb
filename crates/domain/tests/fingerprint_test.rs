use warden_dns_domain::{DomainError, DomainFingerprint};

fn name_of_len(total: usize) -> String {
    // Labels capped at 63 chars; join with dots until the target length.
    let mut labels: Vec<String> = Vec::new();
    let mut remaining = total;
    while remaining > 0 {
        let label_len = remaining.min(63);
        labels.push("a".repeat(label_len));
        remaining -= label_len;
        if remaining > 0 {
            remaining -= 1; // the joining dot
        }
    }
    labels.join(".")
}

#[test]
fn test_accepts_minimal_name() {
    let fp = DomainFingerprint::parse("a.b").unwrap();
    assert_eq!(fp.as_str(), "a.b");
}

#[test]
fn test_accepts_punycode_name() {
    let fp = DomainFingerprint::parse("xn--bcher-kva.example").unwrap();
    assert_eq!(fp.as_str(), "xn--bcher-kva.example");
}

#[test]
fn test_normalizes_case() {
    let fp = DomainFingerprint::parse("Tracker.Example.COM").unwrap();
    assert_eq!(fp.as_str(), "tracker.example.com");
}

#[test]
fn test_converts_idn_to_ascii() {
    let fp = DomainFingerprint::parse("bücher.example").unwrap();
    assert_eq!(fp.as_str(), "xn--bcher-kva.example");
}

#[test]
fn test_strips_trailing_dot() {
    let fp = DomainFingerprint::parse("example.com.").unwrap();
    assert_eq!(fp.as_str(), "example.com");
}

#[test]
fn test_accepts_253_chars() {
    let name = name_of_len(253);
    assert_eq!(name.len(), 253);
    assert!(DomainFingerprint::parse(&name).is_ok());
}

#[test]
fn test_rejects_254_chars() {
    let name = name_of_len(254);
    assert_eq!(name.len(), 254);
    assert!(matches!(
        DomainFingerprint::parse(&name),
        Err(DomainError::InvalidDomainName(_))
    ));
}

#[test]
fn test_rejects_empty() {
    assert!(matches!(
        DomainFingerprint::parse(""),
        Err(DomainError::InvalidDomainName(_))
    ));
}

#[test]
fn test_rejects_bare_label() {
    assert!(matches!(
        DomainFingerprint::parse("no-dot"),
        Err(DomainError::InvalidDomainName(_))
    ));
}

#[test]
fn test_rejects_whitespace() {
    assert!(DomainFingerprint::parse("bad name.example").is_err());
    assert!(DomainFingerprint::parse("bad\tname.example").is_err());
}

#[test]
fn test_rejects_control_chars() {
    assert!(DomainFingerprint::parse("bad\u{0}name.example").is_err());
}

#[test]
fn test_rejects_ip_literals() {
    assert!(DomainFingerprint::parse("192.168.1.1").is_err());
}

#[test]
fn test_tld_is_rightmost_label() {
    let fp = DomainFingerprint::parse("cdn.tracker.example.ru").unwrap();
    assert_eq!(fp.tld(), "ru");
}
