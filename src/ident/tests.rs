use super::*;

#[test]
fn test_first_identifiers() {
    assert_eq!(encode(0), "a");
    assert_eq!(encode(25), "z");
    assert_eq!(encode(26), "A");
    assert_eq!(encode(51), "Z");
    assert_eq!(encode(52), "aa");
    assert_eq!(encode(52 + 52), "a_");
    assert_eq!(encode(52 + 53), "a1");
    assert_eq!(encode(52 + 62), "a0");
    assert_eq!(encode(52 + 63), "ba");
    assert_eq!(encode(52 + 52 * 63), "aaa");
}

#[test]
fn test_roundtrip_first_million() {
    for i in 0..1_000_000u64 {
        let s = encode(i);
        assert_eq!(decode(&s), Some(i), "ident {s}");
        assert_eq!(length_of(i), s.len());
    }
}

#[test]
fn test_decode_rejects_non_identifiers() {
    assert_eq!(decode(""), None);
    assert_eq!(decode("1abc"), None);
    assert_eq!(decode("0"), None);
    assert_eq!(decode("_"), None);
    assert_eq!(decode("a-b"), None);
    assert_eq!(decode("caf\u{e9}"), None);
    assert_eq!(decode("a b"), None);
}

#[test]
fn test_decode_overflow_is_none() {
    assert_eq!(decode(&"0".repeat(64).replacen('0', "a", 1)), None);
}

#[test]
fn test_keyword_roundtrip() {
    let i = decode("enum").unwrap();
    assert_eq!(encode(i), "enum");
    let i = decode("areuniq12").unwrap();
    assert_eq!(encode(i), "areuniq12");
}

#[test]
fn test_length_monotonic_and_order_within_block() {
    let mut previous = encode(0);
    for i in 1..20_000u64 {
        let current = encode(i);
        assert!(length_of(i) >= length_of(i - 1));
        if current.len() == previous.len() {
            let rank = |s: &str| -> Vec<u64> { s.bytes().map(|c| symbol_rank(c).unwrap()).collect() };
            assert!(rank(&previous) < rank(&current), "{previous} then {current}");
        }
        previous = current;
    }
}

#[test]
fn test_length_of_block_edges() {
    assert_eq!(length_of(51), 1);
    assert_eq!(length_of(52), 2);
    assert_eq!(length_of(52 + 52 * 63 - 1), 2);
    assert_eq!(length_of(52 + 52 * 63), 3);
    assert_eq!(length_of(u64::MAX), encode(u64::MAX).len());
}

#[test]
fn test_scope_skips_reserved() {
    let scope = Scope::reserving_names(["b", "d", "9bad", "b"]);
    let idents: Vec<String> = (0..4).map(|i| scope.ident(i)).collect();
    assert_eq!(idents, ["a", "c", "e", "f"]);
}

#[test]
fn test_unrestricted_scope_is_plain_codec() {
    let scope = Scope::unrestricted();
    for i in 0..500 {
        assert_eq!(scope.ident(i), encode(i));
    }
}

#[test]
fn test_cache_matches_codec() {
    let cache = IdentCache::new();
    for i in (0..100_000).step_by(97) {
        assert_eq!(cache.get(i), encode(i));
        assert_eq!(cache.get(i), encode(i));
    }
    let scope = Scope::reserving_names(["a"]);
    assert_eq!(cache.scoped(&scope, 0), "b");
}
