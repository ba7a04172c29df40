use anyhow::Result;
use cookie_labeler::core::engine::{build_classifier, label_from_config};
use cookie_labeler::core::fetcher::{DISCONNECT_CACHE, EASYLIST_CACHE, EASYPRIVACY_CACHE};
use cookie_labeler::{Category, TomlConfig};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const EASYLIST: &str = "\
[Adblock Plus 2.0]
! Title: EasyList
||doubleclick.net^
||adnxs.com^$third-party
|https://ads.example-publisher.com/banner^
";

const EASYPRIVACY: &str = "\
[Adblock Plus 2.0]
! Title: EasyPrivacy
||google-analytics.com^
||hotjar.com^$third-party
";

const DISCONNECT: &str = r#"{
  "categories": {
    "Advertising": [{"Criteo": {"http://www.criteo.com/": ["criteo.com"]}}],
    "Analytics": [{"Mixpanel": {"https://mixpanel.com/": ["mixpanel.com"]}}],
    "Social": [{"Facebook": {"http://www.facebook.com/": ["facebook.com", "facebook.net"]}}]
  }
}"#;

fn cookies() -> Value {
    json!([
        {"name": "PHPSESSID", "domain": "shop.example", "hostOnly": true},
        {"name": "IDE", "domain": ".doubleclick.net", "expirationDate": 1900000000, "secure": true},
        {"name": "_fbp", "domain": ".facebook.com", "expirationDate": 1900000000},
        {"name": "_ga", "domain": ".www.google-analytics.com", "expirationDate": 1900000000},
        {"name": "uid", "domain": "static.criteo.com", "expirationDate": 1900000000},
        {"name": "lang", "domain": "shop.example", "expirationDate": 1900000000},
        {"name": "xyz123", "domain": "shop.example", "hostOnly": true},
        {"name": "xyz123", "domain": ".shop.example", "hostOnly": false, "expirationDate": 1900000000}
    ])
}

fn write_config(dir: &TempDir, server: Option<&MockServer>, force_refresh: bool) -> Result<TomlConfig> {
    let base = dir.path().to_str().unwrap().replace('\\', "/");
    let sources = match server {
        Some(server) => format!(
            "[sources]\neasylist = \"{}\"\neasyprivacy = \"{}\"\ndisconnect = \"{}\"\n",
            server.url("/easylist.txt"),
            server.url("/easyprivacy.txt"),
            server.url("/services.json")
        ),
        None => String::new(),
    };

    let content = format!(
        r#"
[labeler]
name = "integration"

{sources}
[cache]
dir = "{base}/tracker_lists"
force_refresh = {force_refresh}

[fetch]
timeout_seconds = 5
retry_attempts = 2
retry_delay_seconds = 0

[input]
path = "{base}/raw/cookies.json"

[output]
path = "{base}/processed/labeled.json"
samples = 3
"#
    );

    let config_path = dir.path().join("labeler.toml");
    std::fs::write(&config_path, content)?;
    Ok(TomlConfig::from_file(&config_path)?)
}

fn write_cookies(dir: &TempDir) -> Result<()> {
    let raw_dir = dir.path().join("raw");
    std::fs::create_dir_all(&raw_dir)?;
    std::fs::write(raw_dir.join("cookies.json"), serde_json::to_vec(&cookies())?)?;
    Ok(())
}

/// 測試完整流程：下載清單、標記 cookie、寫出 JSON
#[tokio::test]
async fn test_end_to_end_labeling_with_downloaded_lists() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let easylist = server.mock(|when, then| {
        when.method(GET).path("/easylist.txt");
        then.status(200).body(EASYLIST);
    });
    let easyprivacy = server.mock(|when, then| {
        when.method(GET).path("/easyprivacy.txt");
        then.status(200).body(EASYPRIVACY);
    });
    let disconnect = server.mock(|when, then| {
        when.method(GET).path("/services.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(DISCONNECT);
    });

    write_cookies(&temp_dir)?;
    let config = write_config(&temp_dir, Some(&server), false)?;

    let summary = label_from_config(config, 3).await?;

    easylist.assert();
    easyprivacy.assert();
    disconnect.assert();

    assert_eq!(summary.stats.total(), 8);
    assert_eq!(summary.stats.get(Category::Essential), 1);
    assert_eq!(summary.stats.get(Category::Advertising), 2);
    assert_eq!(summary.stats.get(Category::Social), 1);
    assert_eq!(summary.stats.get(Category::Analytics), 1);
    assert_eq!(summary.stats.get(Category::Functional), 2);
    assert_eq!(summary.stats.get(Category::Unknown), 1);
    assert_eq!(summary.samples.len(), 3);

    // 清單已寫入快取
    let cache_dir = temp_dir.path().join("tracker_lists");
    assert!(cache_dir.join(EASYLIST_CACHE).exists());
    assert!(cache_dir.join(EASYPRIVACY_CACHE).exists());
    assert!(cache_dir.join(DISCONNECT_CACHE).exists());

    let output = std::fs::read(temp_dir.path().join("processed/labeled.json"))?;
    let labeled: Vec<Value> = serde_json::from_slice(&output)?;
    assert_eq!(labeled.len(), 8);

    let labels: Vec<&str> = labeled
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "essential",
            "advertising",
            "social",
            "analytics",
            "advertising",
            "functional",
            "functional",
            "unknown"
        ]
    );

    assert_eq!(labeled[1]["secure"], true);
    assert_eq!(labeled[2]["label_sources"], json!(["disconnect.me"]));
    assert_eq!(labeled[6]["label_confidence"], 0.7);
    assert_eq!(labeled[6]["label_sources"], json!(["heuristic"]));
    assert_eq!(labeled[7]["label_sources"], json!([]));

    Ok(())
}

#[tokio::test]
async fn test_labeling_from_cache_without_network() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let cache_dir = temp_dir.path().join("tracker_lists");
    std::fs::create_dir_all(&cache_dir)?;
    std::fs::write(cache_dir.join(EASYLIST_CACHE), EASYLIST)?;
    std::fs::write(cache_dir.join(EASYPRIVACY_CACHE), EASYPRIVACY)?;
    std::fs::write(cache_dir.join(DISCONNECT_CACHE), "not json at all")?;

    write_cookies(&temp_dir)?;
    // 沒有 server：預設來源不會被連線，因為快取已存在
    let config = write_config(&temp_dir, None, false)?;

    let summary = label_from_config(config, 0).await?;

    // Disconnect 解析失敗不影響其他清單
    assert_eq!(summary.stats.total(), 8);
    assert_eq!(summary.stats.get(Category::Social), 0);
    assert_eq!(summary.stats.get(Category::Advertising), 1);
    assert_eq!(summary.stats.get(Category::Analytics), 1);
    assert!(summary.samples.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_download_failure_aborts_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(GET);
        then.status(500);
    });

    write_cookies(&temp_dir)?;
    let config = write_config(&temp_dir, Some(&server), true)?;

    let result = label_from_config(config, 0).await;

    assert!(result.is_err());
    failing.assert_hits(2);
    assert!(!temp_dir.path().join("processed/labeled.json").exists());

    Ok(())
}

/// 沒有輸入檔時仍會先下載清單並建立快取
#[tokio::test]
async fn test_tracker_lists_are_cached_before_input_exists() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let easylist = server.mock(|when, then| {
        when.method(GET).path("/easylist.txt");
        then.status(200).body(EASYLIST);
    });
    let easyprivacy = server.mock(|when, then| {
        when.method(GET).path("/easyprivacy.txt");
        then.status(200).body(EASYPRIVACY);
    });
    let disconnect = server.mock(|when, then| {
        when.method(GET).path("/services.json");
        then.status(200).body(DISCONNECT);
    });

    let config = write_config(&temp_dir, Some(&server), false)?;
    assert!(!temp_dir.path().join("raw/cookies.json").exists());

    let classifier = build_classifier(&config).await?;

    easylist.assert();
    easyprivacy.assert();
    disconnect.assert();
    assert!(temp_dir.path().join("tracker_lists").join(DISCONNECT_CACHE).exists());
    assert!(classifier.database().total_unique() > 0);

    Ok(())
}
