use super::*;

pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => {
                tracing::debug!(label, attempt = i + 1, error = %err, "remote request failed");
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(Duration::from_millis(200 * (1 << i)));
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

impl RemoteClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!(
                "remote endpoint not found (is linkdeck-server running at {}?)",
                self.remote.base_url
            );
        }
        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            let body: ErrorBody = resp.json().context("parse error response")?;
            anyhow::bail!("{} rejected: {}", label, body.error);
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    pub(super) fn tree_url(&self, suffix: &str) -> String {
        format!(
            "{}/tree/{}{}",
            self.remote.base_url.trim_end_matches('/'),
            self.remote.tree_path,
            suffix
        )
    }
}
