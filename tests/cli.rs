use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn skb() -> Command {
    let mut cmd = Command::cargo_bin("skb").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("SKB_PAGE_SIZE")
        .env_remove("SKB_FALLBACK_ENABLED")
        .env_remove("SKB_ROBOT_PRETTY")
        .env_remove("SKB_SUGGEST_DEBOUNCE_MS")
        .env("SKB_CONFIG", "/nonexistent/skill-browse.toml");
    cmd
}

fn robot_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    skb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    skb()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_url_encode_canonical_order() {
    skb()
        .args([
            "url", "encode", "--location", "São Paulo", "--type", "online", "--q", "react hooks",
            "--page", "3",
        ])
        .assert()
        .success()
        .stdout("q=react%20hooks&type=online&location=S%C3%A3o%20Paulo&page=3\n");
}

#[test]
fn test_url_decode_robot() {
    let json = robot_json(skb().args(["--robot", "url", "decode", "?q=react+hooks&page=abc&sort=new"]));
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["filters"]["search"], "react hooks");
    assert_eq!(json["data"]["page"], 1);
}

#[test]
fn test_pages_window() {
    skb()
        .args(["pages", "--current", "5", "--total", "10"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 … 3 4"))
        .stdout(predicate::str::contains("6 7 … 10"));
}

#[test]
fn test_pages_robot_tokens() {
    let json = robot_json(skb().args(["--robot", "pages", "--current", "1", "--total", "10"]));
    let window = json["data"]["window"].as_array().unwrap();
    assert_eq!(window.len(), 7);
    assert_eq!(window[0]["page"], 1);
    assert_eq!(window[5]["kind"], "ellipsis");
}

#[test]
fn test_search_bundled_catalog_robot() {
    let json = robot_json(skb().args(["--robot", "search", "--category", "music"]));
    let data = &json["data"];
    assert_eq!(data["address"], "?category=music");
    assert_eq!(data["view"]["phase"], "ready");
    assert_eq!(data["view"]["source"], "live");
    let items = data["view"]["page"]["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item["category"] == "Music"));
}

#[test]
fn test_search_load_more_appends() {
    let json = robot_json(
        skb()
            .env("SKB_PAGE_SIZE", "2")
            .args(["--robot", "search", "--more", "1"]),
    );
    let page = &json["data"]["view"]["page"];
    assert_eq!(page["items"].as_array().unwrap().len(), 4);
    assert_eq!(page["page"], 2);
    assert_eq!(json["data"]["address"], "?page=2");
}

#[test]
fn test_search_offline_uses_fallback() {
    let json = robot_json(skb().args(["--robot", "search", "--q", "guitar", "--offline"]));
    assert_eq!(json["data"]["view"]["source"], "fallback");
    assert!(json["warnings"].as_array().is_some_and(|w| !w.is_empty()));
}

#[test]
fn test_search_offline_without_fallback_fails() {
    skb()
        .env("SKB_FALLBACK_ENABLED", "false")
        .args(["--robot", "search", "--offline"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"network\""));
}

#[test]
fn test_search_custom_catalog_and_address() {
    let catalog = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/catalog_small.json");
    let json = robot_json(skb().args([
        "--robot",
        "search",
        "--catalog",
        catalog,
        "--address",
        "?type=in-person&location=honolulu",
    ]));
    let items = json["data"]["view"]["page"]["items"].as_array().unwrap();
    let ids: Vec<&str> = items.iter().filter_map(|i| i["id"].as_str()).collect();
    assert_eq!(ids, vec!["t-2", "t-3"]);
}

#[test]
fn test_search_empty_state() {
    skb()
        .args(["search", "--q", "zzzz-no-such-skill"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No skills match"));
}

#[test]
fn test_suggest_robot() {
    let json = robot_json(skb().env("SKB_SUGGEST_DEBOUNCE_MS", "0").args(["--robot", "suggest", "guit"]));
    let suggestions = json["data"]["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions[0]["label"].as_str().unwrap().starts_with("Guitar"));
}

#[test]
fn test_config_file_sets_page_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[results]\npage_size = 5\n").unwrap();

    let json = robot_json(skb().arg("--config").arg(&path).args(["--robot", "search"]));
    assert_eq!(json["data"]["view"]["page"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(json["data"]["view"]["page"]["page_size"], 5);
}

#[test]
fn test_invalid_env_override_is_config_error() {
    skb()
        .env("SKB_PAGE_SIZE", "lots")
        .args(["--robot", "pages", "--current", "1", "--total", "2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"config\""));
}

#[test]
fn test_unrecognised_env_flag_fails_with_config_code() {
    skb()
        .env("SKB_FALLBACK_ENABLED", "maybe")
        .args(["--robot", "search"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"config\""))
        .stdout(predicate::str::contains("SKB_FALLBACK_ENABLED"));
}
