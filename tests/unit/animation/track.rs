use super::*;

#[test]
fn tags_render_short_names() {
    assert_eq!(CurveTag::Rotate { slot: 0 }.to_string(), "rot");
    assert_eq!(CurveTag::Rotate { slot: 2 }.to_string(), "rot2");
    assert_eq!(CurveTag::ZoomIn.to_string(), "zin");
    assert_eq!(CurveTag::ZoomOut.to_string(), "zou");
    assert_eq!(CurveTag::MakeTransparent { slot: 0 }.to_string(), "mtr");
    assert_eq!(CurveTag::MakeOpaque { slot: 1 }.to_string(), "mop1");
    assert_eq!(CurveTag::Animate.to_string(), "ani");
    assert_eq!(
        CurveTag::Highlight {
            alias: "site".to_string()
        }
        .to_string(),
        "hl_site"
    );
    assert_eq!(
        CurveTag::Overlay {
            alias: "overlay0".to_string()
        }
        .to_string(),
        "ovl_overlay0"
    );
}

#[test]
fn curve_set_keeps_order_and_replaces() {
    let mut set = CurveSet::new();
    set.insert(CurveTag::ZoomIn, vec![1.0]);
    set.insert(CurveTag::Rotate { slot: 0 }, vec![2.0]);
    set.insert(CurveTag::ZoomIn, vec![3.0]);
    assert_eq!(set.len(), 2);
    let names: Vec<String> = set.iter().map(|(t, _)| t.to_string()).collect();
    assert_eq!(names, vec!["zin", "rot"]);
    assert_eq!(set.get(&CurveTag::ZoomIn), Some(&[3.0][..]));
    assert_eq!(set.by_name("rot"), Some(&[2.0][..]));
    assert!(set.by_name("zou").is_none());
}

#[test]
fn values_are_space_separated() {
    assert_eq!(format_values(&[1.0, 0.5, -2.25]), "1 0.5 -2.25");
    assert_eq!(format_values(&[]), "");
}

#[test]
fn serializes_as_tag_to_text_map() {
    let mut set = CurveSet::new();
    set.insert(CurveTag::Rotate { slot: 0 }, vec![45.0, 45.0]);
    set.insert(CurveTag::ZoomIn, vec![2.0]);
    assert_eq!(
        set.to_text(),
        [
            ("rot".to_string(), "45 45".to_string()),
            ("zin".to_string(), "2".to_string())
        ]
    );
    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"{"rot":"45 45","zin":"2"}"#);
}
