use rootserve::fs::segment::{SEGMENT_MAX, is_dot_segment, is_safe_segment};

#[test]
fn test_plain_names_are_safe() {
    assert!(is_safe_segment(b"index.html"));
    assert!(is_safe_segment(b"a"));
    assert!(is_safe_segment(b"with space"));
    assert!(is_safe_segment(b"~user-1_(copy)"));
}

#[test]
fn test_length_bounds() {
    assert!(!is_safe_segment(b""));
    assert!(is_safe_segment(&vec![b'a'; SEGMENT_MAX]));
    assert!(!is_safe_segment(&vec![b'a'; SEGMENT_MAX + 1]));
}

#[test]
fn test_reserved_characters_rejected() {
    assert!(!is_safe_segment(b"a\\b"));
    assert!(!is_safe_segment(b"%2e%2e"));
    assert!(!is_safe_segment(b"C:"));
}

#[test]
fn test_non_printable_rejected() {
    assert!(!is_safe_segment(b"a\0b"));
    assert!(!is_safe_segment(b"tab\there"));
    assert!(!is_safe_segment(b"del\x7f"));
    assert!(!is_safe_segment("caf\u{e9}".as_bytes()));
}

#[test]
fn test_dot_segments() {
    assert!(is_dot_segment(b"."));
    assert!(is_dot_segment(b".."));
    assert!(!is_dot_segment(b"..."));
    assert!(!is_dot_segment(b".hidden"));

    // The character-class check alone lets them through.
    assert!(is_safe_segment(b".."));
}
