use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    pub data_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server() -> Result<ServerGuard> {
    spawn_server_with(&[])
}

pub fn spawn_server_with(extra: &[&str]) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let (child, base_url) = spawn_server_in(data_dir.path(), extra)?;
    Ok(ServerGuard {
        base_url,
        data_dir,
        child,
    })
}

/// Start a server over an existing data dir. The caller owns the child process.
pub fn spawn_server_in(data_dir: &Path, extra: &[&str]) -> Result<(Child, String)> {
    let addr_file = data_dir.join("addr.txt");
    let _ = std::fs::remove_file(&addr_file);

    let child = Command::new(env!("CARGO_BIN_EXE_linkdeck-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--data-dir",
            data_dir.to_str().unwrap(),
        ])
        .args(extra)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn linkdeck-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;
    Ok((child, base_url))
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// Run the `linkdeck` CLI against `home` and return stdout, failing on a non-zero exit.
pub fn run_linkdeck(home: &Path, args: &[&str]) -> Result<String> {
    let out = linkdeck_output(home, args)?;
    if !out.status.success() {
        anyhow::bail!(
            "linkdeck {:?} failed (status {:?})\nstdout:\n{}\nstderr:\n{}",
            args,
            out.status,
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

pub fn linkdeck_output(home: &Path, args: &[&str]) -> Result<std::process::Output> {
    Command::new(env!("CARGO_BIN_EXE_linkdeck"))
        .arg("--home")
        .arg(home)
        .args(args)
        .env_remove("LINKDECK_HOME")
        .env_remove("RUST_LOG")
        .output()
        .with_context(|| format!("run linkdeck {:?}", args))
}
