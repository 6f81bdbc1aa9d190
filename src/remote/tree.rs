//! `TreeStore` over the tree server's HTTP api.

use super::*;

// Slack on top of the server-side wait so the client does not give up first.
const WATCH_GRACE: Duration = Duration::from_secs(10);

impl TreeStore for RemoteClient {
    fn read(&self) -> Result<Snapshot> {
        with_retries(&format!("read tree {}", self.remote.tree_path), || {
            let resp = self
                .client
                .get(self.tree_url(""))
                .send()
                .context("send")?;
            self.ensure_ok(resp, "read tree")?
                .json()
                .context("parse tree snapshot")
        })
    }

    fn write(&self, tree: &serde_json::Value) -> Result<u64> {
        let resp = self
            .client
            .put(self.tree_url(""))
            .json(tree)
            .send()
            .context("write tree request")?;
        let out: WriteResponse = self
            .ensure_ok(resp, "write tree")?
            .json()
            .context("parse write response")?;
        Ok(out.revision)
    }

    fn wait_for_change(&self, after: u64, timeout: Duration) -> Result<Option<Snapshot>> {
        let resp = self
            .client
            .get(self.tree_url("/watch"))
            .query(&[
                ("after", after.to_string()),
                ("timeout_ms", timeout.as_millis().to_string()),
            ])
            .timeout(timeout + WATCH_GRACE)
            .send()
            .context("watch tree request")?;

        if resp.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let snapshot: Snapshot = self
            .ensure_ok(resp, "watch tree")?
            .json()
            .context("parse tree snapshot")?;
        Ok(Some(snapshot))
    }
}
