use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use skill_browse::BrowseError;
use skill_browse::config::Config;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/configs")
        .join(name)
}

#[test]
fn test_full_config_overrides_every_section() {
    let config = Config::load(Some(&fixture("full.toml"))).unwrap();
    assert_eq!(config.suggestions.min_query_len, 3);
    assert_eq!(config.suggestions.max_results, 5);
    assert_eq!(
        config.suggestions.to_engine_config().debounce,
        Duration::from_millis(150)
    );
    assert_eq!(config.results.page_size, 20);
    assert_eq!(config.results.max_visible_pages, 9);
    assert!(!config.fallback.enabled);
    assert_eq!(config.fallback.sample_size, 10);
    assert!(config.robot.pretty);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = Config::load(Some(&fixture("partial.toml"))).unwrap();
    assert_eq!(config.results.page_size, 6);
    assert_eq!(config.results.max_visible_pages, 7);
    assert_eq!(config.suggestions.debounce_ms, 300);
    assert!(config.fallback.enabled);
}

#[test]
fn test_invalid_value_type_is_config_error() {
    let err = Config::load(Some(&fixture("invalid.toml"))).unwrap_err();
    assert!(matches!(err, BrowseError::Config(_)));
    assert!(err.to_string().contains("invalid.toml"));
}

#[test]
fn test_missing_explicit_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.results.page_size, 12);
    assert_eq!(config.suggestions.min_query_len, 2);
}

#[test]
fn test_written_file_is_sanitized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[results]\npage_size = 0\nmax_visible_pages = 2\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.results.page_size, 1);
    assert_eq!(config.results.max_visible_pages, 3);
}

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_env_overrides_apply_on_top_of_file() {
    let mut config = Config::load(Some(&fixture("partial.toml"))).unwrap();
    config
        .apply_overrides(lookup(&[
            ("SKB_PAGE_SIZE", " 30 "),
            ("SKB_FALLBACK_ENABLED", "off"),
            ("SKB_ROBOT_PRETTY", "YES"),
        ]))
        .unwrap();
    assert_eq!(config.results.page_size, 30);
    assert!(!config.fallback.enabled);
    assert!(config.robot.pretty);
}

#[test]
fn test_unrecognised_env_flag_is_config_error() {
    for (key, value) in [("SKB_FALLBACK_ENABLED", "maybe"), ("SKB_ROBOT_PRETTY", "garbage")] {
        let mut config = Config::default();
        let err = config.apply_overrides(lookup(&[(key, value)])).unwrap_err();
        assert!(matches!(err, BrowseError::Config(_)), "{key}={value}");
        assert!(err.to_string().contains(key));
    }
}

#[test]
fn test_env_override_is_sanitized() {
    let mut config = Config::default();
    config
        .apply_overrides(lookup(&[("SKB_MAX_VISIBLE_PAGES", "1")]))
        .unwrap();
    assert_eq!(config.results.max_visible_pages, 3);
}
