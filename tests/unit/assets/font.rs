use super::*;

fn bundled() -> FontSource {
    FontSource::from_path(Path::new("tests/data/fonts/DejaVuSans-Bold.ttf")).unwrap()
}

#[test]
fn engine_exposes_family_name_from_bytes() {
    let engine = TextLayoutEngine::new(&bundled()).unwrap();
    assert!(engine.family_name().contains("DejaVu"));
}

#[test]
fn wider_text_measures_wider() {
    let mut engine = TextLayoutEngine::new(&bundled()).unwrap();
    let short = engine.measure("HI", 40.0).unwrap();
    let long = engine.measure("HI THERE FRIEND", 40.0).unwrap();
    assert!(short > 0.0);
    assert!(long > short);

    let double = engine.measure("HI", 80.0).unwrap();
    assert!(double > short * 1.5);
}

#[test]
fn sized_measure_agrees_with_measure() {
    let mut engine = TextLayoutEngine::new(&bundled()).unwrap();
    let expected = engine.measure("WHEN THE CODE WORKS", 40.0).unwrap();
    let mut sized = engine.at_size(40.0).unwrap();
    assert_eq!(sized.width("WHEN THE CODE WORKS"), expected);
}

#[test]
fn invalid_sizes_and_fonts_are_rejected() {
    let mut engine = TextLayoutEngine::new(&bundled()).unwrap();
    assert!(engine.layout_line("x", 0.0).is_err());
    assert!(engine.layout_line("x", f32::NAN).is_err());
    assert!(engine.at_size(-3.0).is_err());

    assert!(FontSource::from_bytes(Vec::new(), "empty").is_err());
    let junk = FontSource::from_bytes(vec![1, 2, 3, 4], "junk").unwrap();
    assert!(TextLayoutEngine::new(&junk).is_err());
}

#[test]
fn explicit_font_path_wins_over_discovery() {
    let font = FontSource::resolve(Some(Path::new("tests/data/fonts/DejaVuSans-Bold.ttf")))
        .unwrap();
    assert!(font.origin().ends_with("DejaVuSans-Bold.ttf"));
    assert!(FontSource::resolve(Some(Path::new("tests/data/fonts/missing.ttf"))).is_err());
}

#[test]
fn regular_face_shapes_narrower_than_bold() {
    let regular_font =
        FontSource::from_path(Path::new("tests/data/fonts/DejaVuSans.ttf")).unwrap();
    let mut regular = TextLayoutEngine::regular(&regular_font).unwrap();
    let mut bold = TextLayoutEngine::new(&bundled()).unwrap();

    let text = "Select or Upload an Image";
    let thin = regular.measure(text, 20.0).unwrap();
    assert!(thin > 0.0);
    assert!(thin < bold.measure(text, 20.0).unwrap());
}
