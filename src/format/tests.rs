use super::*;
use crate::writer::render;

#[test]
fn test_parse_segments() {
    let t = Template::parse("areuniq{n}_x{{y");
    assert_eq!(
        t.segments(),
        &[
            Segment::Text("areuniq".into()),
            Segment::Ref("n".into()),
            Segment::Text("_x{{y".into()),
        ]
    );
    assert_eq!(Template::parse("").segments(), &[]);
    assert_eq!(Template::parse("{a}{b}").segments().len(), 2);
}

#[test]
fn test_render_plain() {
    let t = Template::parse("uniqenum{n}");
    assert_eq!(t.render(&[("n", "12")]), "uniqenum12");
    assert_eq!(t.render(&[]), "uniqenum");
}

#[test]
fn test_check_refs() {
    let t = Template::parse("m{n}");
    assert!(t.check_refs(&["n"], &["n"]).is_ok());

    let err = Template::parse("m").check_refs(&["n"], &["n"]).unwrap_err();
    assert!(matches!(err, TemplateError::MissingRef { ref name, .. } if name == "n"));

    let err = Template::parse("m{n}{oops}").check_refs(&["n"], &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown reference {oops} in template \"m{n}{oops}\" (expected one of: n)"
    );
}

#[test]
fn test_cstring_stringifies_params() {
    let escapes = EscapeCache::new();
    let t = Template::parse("duplicate enum values: {enumerator1} and {enumerator2}");
    let text = render(|w| {
        t.write_cstring(w, &escapes, &[("enumerator1", Arg::Param("a")), ("enumerator2", Arg::Param("b"))])
    });
    assert_eq!(text, "\"duplicate enum values: \"#a\" and \"#b");
}

#[test]
fn test_cstring_inlines_values_and_escapes_runs() {
    let escapes = EscapeCache::new();
    let t = Template::parse("\u{1}{n} \"{name}\"");
    let text = render(|w| t.write_cstring(w, &escapes, &[("n", Arg::Value("23")), ("name", Arg::Param("c"))]));
    assert_eq!(text, "\"\\00123 \\\"\"#c\"\\\"\"");
}

#[test]
fn test_cstring_empty_renders_empty_literal() {
    let escapes = EscapeCache::new();
    assert_eq!(render(|w| Template::parse("").write_cstring(w, &escapes, &[])), "\"\"");
    let t = Template::parse("{name}");
    assert_eq!(render(|w| t.write_cstring(w, &escapes, &[("name", Arg::Param("x"))])), "#x");
}

#[test]
fn test_serde_roundtrip_as_string() {
    let t: Template = serde_json::from_str("\"areuniq{n}\"").unwrap();
    assert_eq!(t, Template::parse("areuniq{n}"));
    assert_eq!(serde_json::to_string(&t).unwrap(), "\"areuniq{n}\"");
}
