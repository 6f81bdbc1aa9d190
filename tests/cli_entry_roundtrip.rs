use anyhow::{Context, Result};
use serde_json::json;

#[allow(dead_code)]
mod common;

use common::{linkdeck_output, run_linkdeck};

fn setup(base_url: &str) -> Result<tempfile::TempDir> {
    let tmp = tempfile::tempdir().context("create temp home")?;
    let home = tmp.path().join(".linkdeck");
    let home = home.as_path();
    run_linkdeck(home, &["init"])?;
    run_linkdeck(home, &["remote", "set", "--url", base_url])?;
    Ok(tmp)
}

fn list_json(home: &std::path::Path) -> Result<serde_json::Value> {
    let out = run_linkdeck(home, &["list", "--json"])?;
    serde_json::from_str(out.trim()).context("parse list json")
}

#[test]
fn toggle_off_and_on_restores_the_url() -> Result<()> {
    let server = common::spawn_server()?;
    let tmp = setup(&server.base_url)?;
    let home = tmp.path().join(".linkdeck");

    run_linkdeck(
        &home,
        &["set", "Aimbot", "--url", "https://cdn.example/a.txt"],
    )?;
    let listed = list_json(&home)?;
    assert_eq!(listed["Aimbot"]["active"], json!(true));
    assert_eq!(listed["Aimbot"]["path"], json!("/sdcard/Download/Aimbot.txt"));

    let out = run_linkdeck(&home, &["toggle", "Aimbot"])?;
    assert!(out.contains("disabled"));
    let listed = list_json(&home)?;
    assert_eq!(listed["Aimbot"]["url"], json!(""));
    assert_eq!(listed["Aimbot"]["active"], json!(false));

    // A separate process must find the remembered url on disk.
    let out = run_linkdeck(&home, &["toggle", "Aimbot"])?;
    assert!(out.contains("enabled"));
    let listed = list_json(&home)?;
    assert_eq!(listed["Aimbot"]["url"], json!("https://cdn.example/a.txt"));
    assert_eq!(listed["Aimbot"]["path"], json!("/sdcard/Download/Aimbot.txt"));
    Ok(())
}

#[test]
fn set_matches_existing_keys_after_trimming() -> Result<()> {
    let server = common::spawn_server()?;
    let tmp = setup(&server.base_url)?;
    let home = tmp.path().join(".linkdeck");

    run_linkdeck(&home, &["set", "Aimbot", "--url", "https://cdn.example/a.txt"])?;
    run_linkdeck(&home, &["set", " Aimbot ", "--url", "https://cdn.example/b.txt"])?;

    let listed = list_json(&home)?;
    let keys: Vec<&String> = listed.as_object().context("list object")?.keys().collect();
    assert_eq!(keys, ["Aimbot"]);
    assert_eq!(listed["Aimbot"]["url"], json!("https://cdn.example/b.txt"));
    assert_eq!(listed["Aimbot"]["path"], json!("/sdcard/Download/Aimbot.txt"));
    Ok(())
}

#[test]
fn reset_writes_the_factory_entries() -> Result<()> {
    let server = common::spawn_server()?;
    let tmp = setup(&server.base_url)?;
    let home = tmp.path().join(".linkdeck");

    run_linkdeck(&home, &["reset"])?;
    let listed = list_json(&home)?;
    let keys: Vec<&String> = listed.as_object().context("list object")?.keys().collect();
    assert_eq!(keys, ["Aimbot", "Aimfov", "Holograma", "WallHack"]);
    assert_eq!(listed["Holograma"]["valid"], json!(true));

    let remote: serde_json::Value = reqwest::blocking::Client::new()
        .get(format!("{}/tree/urls", server.base_url))
        .send()
        .context("get tree")?
        .json()
        .context("parse tree")?;
    assert_eq!(
        remote["value"]["WallHack"]["path"],
        json!("/sdcard/Download/WallHack.txt")
    );
    Ok(())
}

#[test]
fn strict_policy_blocks_unparseable_urls() -> Result<()> {
    let server = common::spawn_server()?;
    let tmp = setup(&server.base_url)?;
    let home = tmp.path().join(".linkdeck");

    // Permissive by default: saved, with a warning.
    let out = linkdeck_output(&home, &["set", "Broken", "--url", "not a url"])?;
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Broken"));

    let check = linkdeck_output(&home, &["check", "--strict"])?;
    assert!(!check.status.success());
    assert!(String::from_utf8_lossy(&check.stdout).contains("Broken"));

    run_linkdeck(&home, &["policy", "set", "strict"])?;
    assert_eq!(run_linkdeck(&home, &["policy", "show"])?.trim(), "strict");

    let out = linkdeck_output(&home, &["set", "Other", "--url", "also bad"])?;
    assert!(!out.status.success());
    let listed = list_json(&home)?;
    assert!(listed.get("Other").is_none());
    Ok(())
}

#[test]
fn commands_without_a_store_point_at_init() -> Result<()> {
    let tmp = tempfile::tempdir().context("create temp home")?;
    let out = linkdeck_output(&tmp.path().join("missing"), &["list"])?;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("linkdeck init"));
    Ok(())
}
