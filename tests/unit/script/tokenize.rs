use super::*;

#[test]
fn splits_on_whitespace() {
    assert_eq!(
        tokenize("rotate axis=x angle=30"),
        vec!["rotate", "axis=x", "angle=30"]
    );
    assert_eq!(tokenize("  zoom_in \t scale=2  "), vec!["zoom_in", "scale=2"]);
    assert!(tokenize("   ").is_empty());
}

#[test]
fn quoted_substrings_stay_whole() {
    let tokens = tokenize(r#"center_view selection="name CA and resid 1 to 10""#);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1], r#"selection="name CA and resid 1 to 10""#);

    let tokens = tokenize("highlight selection='resname LIG' color=red");
    assert_eq!(
        tokens,
        vec!["highlight", "selection='resname LIG'", "color=red"]
    );
}

#[test]
fn other_quote_is_literal_inside_open_quote() {
    let tokens = tokenize(r#"add_overlay text="it's 5 ns""#);
    assert_eq!(tokens, vec!["add_overlay", r#"text="it's 5 ns""#]);
}

#[test]
fn unterminated_quote_flushes_at_line_end() {
    let tokens = tokenize(r#"center_view selection="protein and chain A"#);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1], r#"selection="protein and chain A"#);
}

#[test]
fn splits_commands_outside_quotes_only() {
    assert_eq!(
        split_outside_quotes("rotate angle=90; zoom_in scale=2", ';'),
        vec!["rotate angle=90", "zoom_in scale=2"]
    );
    assert_eq!(
        split_outside_quotes(r#"add_overlay text="a; b"; do_nothing t=1;"#, ';'),
        vec![r#"add_overlay text="a; b""#, "do_nothing t=1", ""]
    );
    assert_eq!(split_outside_quotes("", ';'), vec![""]);
}

#[test]
fn unquote_strips_one_layer() {
    assert_eq!(unquote(r#""name CA""#), "name CA");
    assert_eq!(unquote("'x'"), "x");
    assert_eq!(unquote(r#""dangling"#), "dangling");
    assert_eq!(unquote("plain"), "plain");
    assert_eq!(unquote(r#""""#), "");
}
