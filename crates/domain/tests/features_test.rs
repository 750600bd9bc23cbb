use warden_dns_domain::{shannon_entropy, DomainFeatures};

const EPSILON: f64 = 1e-9;

#[test]
fn test_entropy_uniform_single_char() {
    assert!((shannon_entropy("aaaa") - 0.0).abs() < EPSILON);
}

#[test]
fn test_entropy_four_distinct_chars() {
    assert!((shannon_entropy("abcd") - 2.0).abs() < EPSILON);
}

#[test]
fn test_entropy_empty_string() {
    assert_eq!(shannon_entropy(""), 0.0);
}

#[test]
fn test_entropy_grows_with_alphabet() {
    let low = shannon_entropy("aabbaabb.com");
    let high = shannon_entropy("xk4q9z2j.com");
    assert!(high > low);
}

#[test]
fn test_digit_ratio_over_registrable_portion() {
    let features = DomainFeatures::extract("a1b2.com");
    // 2 digits out of the 4 characters left of the suffix.
    assert!((features.digit_ratio - 0.5).abs() < EPSILON);
}

#[test]
fn test_vowel_ratio() {
    let features = DomainFeatures::extract("aeiou");
    assert!((features.vowel_ratio - 1.0).abs() < EPSILON);

    let features = DomainFeatures::extract("xyz");
    assert!((features.vowel_ratio - 0.0).abs() < EPSILON);
}

#[test]
fn test_length() {
    let features = DomainFeatures::extract("example.com");
    assert_eq!(features.length, 11);
}

#[test]
fn test_bad_tld_weight() {
    let bad = DomainFeatures::extract("xhk92-z1-kq4.ru");
    assert_eq!(bad.tld_weight, 1.5);

    let neutral = DomainFeatures::extract("example.com");
    assert_eq!(neutral.tld_weight, 1.0);
}

#[test]
fn test_vector_order_is_stable() {
    let features = DomainFeatures::extract("a1.top");
    let v = features.vector();
    assert_eq!(v[0], features.length as f64);
    assert_eq!(v[1], features.entropy);
    assert_eq!(v[2], features.digit_ratio);
    assert_eq!(v[3], features.vowel_ratio);
    assert_eq!(v[4], features.tld_weight);
}

#[test]
fn test_dga_like_name_has_high_entropy_and_digits() {
    let features = DomainFeatures::extract("xhk92-z1-kq4.ru");
    assert!(features.entropy > 3.0);
    assert!(features.digit_ratio >= 0.2);
}
