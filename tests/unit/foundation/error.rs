use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ReelError::animation("x")
            .to_string()
            .contains("animation error:")
    );
}

#[test]
fn messages_carry_offending_text_and_allowed_set() {
    let err = ReelError::UnknownParameter {
        key: "foo".to_string(),
        action: "rotate".to_string(),
        allowed: "angle, axis".to_string(),
        line: "rotate axis=x foo=1".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("'foo'"));
    assert!(msg.contains("rotate axis=x foo=1"));
    assert!(msg.contains("angle, axis"));
}

#[test]
fn malformed_hint_is_appended() {
    let err = ReelError::MalformedParameter {
        token: "zoom_in".to_string(),
        line: "{rotate angle=1 zoom_in scale=2}".to_string(),
        hint: "; missing ';' between sub-commands?".to_string(),
    };
    assert!(err.to_string().ends_with("missing ';' between sub-commands?"));
    assert!(!ReelError::malformed("x", "y").to_string().contains(';'));
}

#[test]
fn brace_literals_render() {
    let err = ReelError::UnterminatedBlock {
        line: "{rotate angle=1".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "unterminated {...} block starting at '{rotate angle=1'"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
