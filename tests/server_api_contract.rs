#[allow(dead_code)]
mod common;

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;

fn get_json(client: &reqwest::blocking::Client, url: &str) -> Result<serde_json::Value> {
    client
        .get(url)
        .send()
        .with_context(|| format!("get {}", url))?
        .error_for_status()
        .with_context(|| format!("get {} status", url))?
        .json()
        .context("parse json")
}

#[test]
fn server_api_contract_read_write_and_validation() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    let health = client
        .get(format!("{}/healthz", server.base_url))
        .send()
        .context("healthz")?;
    assert!(health.status().is_success());
    assert_eq!(health.text().context("healthz body")?, "ok");

    // Unwritten paths read as null at revision 0.
    let empty = get_json(&client, &format!("{}/tree/urls", server.base_url))?;
    assert_eq!(empty["revision"], json!(0));
    assert_eq!(empty["value"], serde_json::Value::Null);
    assert_eq!(empty["updated_at"], serde_json::Value::Null);

    let tree = json!({
        "Aimbot": { "url": "https://cdn.example/a.txt", "path": "/sdcard/Download/Aimbot.txt" },
    });
    let written: serde_json::Value = client
        .put(format!("{}/tree/urls", server.base_url))
        .json(&tree)
        .send()
        .context("put tree")?
        .error_for_status()
        .context("put tree status")?
        .json()
        .context("parse put response")?;
    assert_eq!(written["revision"], json!(1));

    let read = get_json(&client, &format!("{}/tree/urls", server.base_url))?;
    assert_eq!(read["revision"], json!(1));
    assert_eq!(read["value"], tree);
    assert!(read["updated_at"].as_str().is_some());

    // Writes elsewhere bump the global revision but not this node's.
    let other: serde_json::Value = client
        .put(format!("{}/tree/other", server.base_url))
        .json(&json!("x"))
        .send()
        .context("put other")?
        .error_for_status()
        .context("put other status")?
        .json()
        .context("parse put other")?;
    assert_eq!(other["revision"], json!(2));
    let read = get_json(&client, &format!("{}/tree/urls", server.base_url))?;
    assert_eq!(read["revision"], json!(1));

    let bad = client
        .get(format!("{}/tree/a.b", server.base_url))
        .send()
        .context("get bad path")?;
    assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = bad.json().context("parse error body")?;
    assert!(body["error"].as_str().is_some());

    let bad = client
        .put(format!("{}/tree/{}", server.base_url, "x".repeat(65)))
        .json(&json!({}))
        .send()
        .context("put long path")?;
    assert_eq!(bad.status(), reqwest::StatusCode::BAD_REQUEST);

    Ok(())
}

#[test]
fn watch_times_out_with_no_content() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    let resp = client
        .get(format!(
            "{}/tree/urls/watch?after=0&timeout_ms=200",
            server.base_url
        ))
        .send()
        .context("watch")?;
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);

    // A write to another path does not wake a watcher of this one.
    let base = server.base_url.clone();
    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        reqwest::blocking::Client::new()
            .put(format!("{}/tree/other", base))
            .json(&json!(1))
            .send()
            .map(|r| r.status())
    });
    let resp = client
        .get(format!(
            "{}/tree/urls/watch?after=0&timeout_ms=400",
            server.base_url
        ))
        .send()
        .context("watch other")?;
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
    assert!(writer.join().unwrap().context("put other")?.is_success());

    Ok(())
}

#[test]
fn watch_wakes_on_write() -> Result<()> {
    let server = common::spawn_server()?;
    let base = server.base_url.clone();

    let watcher = thread::spawn(move || -> Result<serde_json::Value> {
        reqwest::blocking::Client::new()
            .get(format!("{}/tree/urls/watch?after=0&timeout_ms=10000", base))
            .send()
            .context("watch")?
            .error_for_status()
            .context("watch status")?
            .json()
            .context("parse watch")
    });

    thread::sleep(Duration::from_millis(200));
    reqwest::blocking::Client::new()
        .put(format!("{}/tree/urls", server.base_url))
        .json(&json!({ "Aimbot": "https://cdn.example/a.txt" }))
        .send()
        .context("put tree")?
        .error_for_status()
        .context("put tree status")?;

    let seen = watcher.join().unwrap()?;
    assert_eq!(seen["revision"], json!(1));
    assert_eq!(seen["value"], json!({ "Aimbot": "https://cdn.example/a.txt" }));

    // Already-newer nodes answer immediately.
    let client = reqwest::blocking::Client::new();
    let resp = client
        .get(format!(
            "{}/tree/urls/watch?after=0&timeout_ms=10000",
            server.base_url
        ))
        .timeout(Duration::from_secs(2))
        .send()
        .context("watch newer")?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    Ok(())
}
