use super::*;

#[test]
fn test_named_escapes_and_printable() {
    assert_eq!(escape("\"\\Hello\n\r\t"), "\\\"\\\\Hello\\n\\r\\t");
    assert_eq!(escape("\u{7}\u{8}\u{b}\u{c}"), "\\a\\b\\v\\f");
    assert_eq!(escape("plain text, 100%"), "plain text, 100%");
}

#[test]
fn test_octal_padding_depends_on_follower() {
    assert_eq!(escape("\u{1}23"), "\\00123");
    assert_eq!(escape("\u{1}8"), "\\18");
    assert_eq!(escape("\u{1f}A"), "\\37A");
    assert_eq!(escape("\u{ff}x"), "\\377x");
    assert_eq!(escape("\u{5}9"), "\\59");
    assert_eq!(escape("\u{5}3"), "\\0053");
    assert_eq!(escape("\u{0}"), "\\0");
    assert_eq!(escape("\u{7f}"), "\\177");
}

#[test]
fn test_wide_units() {
    assert_eq!(escape("\u{200}G"), "\\x200G");
    assert_eq!(escape("\u{200}A"), "\\u0200A");
    assert_eq!(escape("\u{200}F"), "\\u0200F");
    assert_eq!(escape("\u{200}"), "\\x200");
    assert_eq!(escape("\u{20ac}a"), "\\u20aca");
}

#[test]
fn test_astral_characters_split_into_surrogates() {
    assert_eq!(escape("\u{100000}G"), "\\xdbc0\\xdc00G");
    assert_eq!(escape("\u{100000}f"), "\\xdbc0\\udc00f");
}

#[test]
fn test_mixed_sequence() {
    let src = "\u{1}23\"\u{200}F\u{100000}G";
    assert_eq!(escape(src), "\\00123\\\"\\u0200F\\xdbc0\\xdc00G");
}

#[test]
fn test_split_hex_when_unicode_does_not_fit() {
    let mut out = String::new();
    push_wide(&mut out, 0x12345, Some(b'a' as u16));
    assert_eq!(out, "\\x12345\"\"");

    // six digits tie with \U, which wins
    let mut out = String::new();
    push_wide(&mut out, 0x123456, Some(b'0' as u16));
    assert_eq!(out, "\\U00123456");
}

#[test]
fn test_cache_is_transparent() {
    let cache = EscapeCache::new();
    assert_eq!(cache.get("\u{1}23"), "\\00123");
    assert_eq!(cache.get("\u{1}23"), "\\00123");
}
