use super::*;

#[test]
fn overlay_json_uses_camel_case_and_defaults() {
    let o: TextOverlay =
        serde_json::from_str(r#"{"id": 7, "text": "TOP TEXT", "x": 400, "y": 100}"#).unwrap();
    assert_eq!(o.id, OverlayId(7));
    assert_eq!(o.font_size, 40.0);
    assert_eq!(o.color, Rgba8::WHITE);
    assert_eq!(o.stroke_color, Rgba8::BLACK);

    let json = serde_json::to_value(&o).unwrap();
    assert_eq!(json["fontSize"], 40.0);
    assert_eq!(json["strokeColor"], "#000000");
}

#[test]
fn derived_metrics_follow_font_size() {
    let o = TextOverlay::new(OverlayId(1), "x", 0.0, 0.0, OverlayStyle::default());
    assert_eq!(o.stroke_width(), 40.0 / 15.0);
    assert_eq!(o.line_height(), 48.0);
}

#[test]
fn validation_catches_bad_sizes_positions_and_duplicate_ids() {
    let style = OverlayStyle::default();
    let a = TextOverlay::new(OverlayId(1), "a", 10.0, 10.0, style);
    let b = TextOverlay::new(OverlayId(2), "b", 10.0, 10.0, style);
    validate_overlays(&[a.clone(), b]).unwrap();

    assert!(validate_overlays(&[a.clone(), a.clone()]).is_err());

    let mut bad = a.clone();
    bad.font_size = 0.0;
    assert!(bad.validate().is_err());

    let mut bad = a;
    bad.x = f64::INFINITY;
    assert!(bad.validate().is_err());
}

#[test]
fn overlay_lists_parse_from_json() {
    let overlays = parse_overlays(
        r##"[{"id": 1, "text": "TOP", "x": 400, "y": 100},
            {"id": 2, "text": "BOTTOM", "x": 400, "y": 500, "color": "#FF0000"}]"##,
    )
    .unwrap();
    assert_eq!(overlays.len(), 2);
    assert_eq!(overlays[1].color, Rgba8::rgb(255, 0, 0));

    let err = parse_overlays(r#"{"id": 1}"#).unwrap_err();
    assert!(matches!(err, MemeError::Serde(_)), "{err}");
    let err = parse_overlays(r##"[{"id": 1, "text": "A", "x": 0, "y": 0, "color": "#XYZ"}]"##)
        .unwrap_err();
    assert!(matches!(err, MemeError::Serde(_)), "{err}");

    let dupes = r#"[{"id": 3, "text": "A", "x": 0, "y": 0}, {"id": 3, "text": "B", "x": 0, "y": 0}]"#;
    assert!(matches!(
        parse_overlays(dupes).unwrap_err(),
        MemeError::Validation(_)
    ));
}
