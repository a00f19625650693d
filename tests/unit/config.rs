use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_only_the_key_is_set() {
    let cfg = AiConfig::from_lookup(env(&[("GEMINI_API_KEY", "k1")])).unwrap();
    assert_eq!(cfg.api_key, "k1");
    assert_eq!(cfg.base_url, DEFAULT_GEMINI_BASE_URL);
    assert_eq!(cfg.models, ModelIds::default());
    assert_eq!(cfg.models.caption, "gemini-2.5-flash");
    assert_eq!(cfg.models.edit, "gemini-2.5-flash-image");
    assert_eq!(cfg.models.analysis, "gemini-3-pro-preview");
}

#[test]
fn gemini_key_wins_over_generic_key() {
    let cfg =
        AiConfig::from_lookup(env(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")])).unwrap();
    assert_eq!(cfg.api_key, "gemini");

    let cfg = AiConfig::from_lookup(env(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "  ")])).unwrap();
    assert_eq!(cfg.api_key, "generic");
}

#[test]
fn missing_key_is_a_validation_error() {
    let err = AiConfig::from_lookup(env(&[])).unwrap_err();
    assert!(matches!(err, MemeError::Validation(_)));
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[test]
fn overrides_are_read_and_trailing_slash_trimmed() {
    let cfg = AiConfig::from_lookup(env(&[
        ("API_KEY", "k"),
        ("MEMEGEN_GEMINI_BASE_URL", "http://127.0.0.1:9/v1/"),
        ("MEMEGEN_CAPTION_MODEL", "cap"),
        ("MEMEGEN_EDIT_MODEL", "edit"),
        ("MEMEGEN_ANALYSIS_MODEL", "ana"),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:9/v1");
    assert_eq!(
        cfg.models,
        ModelIds {
            caption: "cap".to_string(),
            edit: "edit".to_string(),
            analysis: "ana".to_string(),
        }
    );
}

#[test]
fn debug_output_hides_the_key() {
    let cfg = AiConfig::from_lookup(env(&[("GEMINI_API_KEY", "super-secret")])).unwrap();
    let dbg = format!("{cfg:?}");
    assert!(!dbg.contains("super-secret"));
    assert!(dbg.contains("redacted"));
}

#[test]
fn font_flag_beats_environment() {
    let flag = Path::new("flag.ttf");
    let lookup = env(&[("MEMEGEN_FONT", "env.ttf")]);
    assert_eq!(font_path(Some(flag), &lookup), Some(PathBuf::from("flag.ttf")));
    assert_eq!(font_path(None, &lookup), Some(PathBuf::from("env.ttf")));
    assert_eq!(font_path(None, env(&[("MEMEGEN_FONT", "")])), None);
}

#[test]
fn placeholder_font_env_wins_over_discovery() {
    let path = placeholder_font_path(env(&[(
        "MEMEGEN_PLACEHOLDER_FONT",
        "tests/data/fonts/DejaVuSans.ttf",
    )]));
    assert_eq!(path, Some(PathBuf::from("tests/data/fonts/DejaVuSans.ttf")));

    let discovered = placeholder_font_path(env(&[("MEMEGEN_PLACEHOLDER_FONT", "  ")]));
    assert_eq!(discovered, discover_regular_font());
}
