use super::*;

/// Longest a single watch request may hold the connection.
const MAX_WATCH: Duration = Duration::from_secs(60);

pub(super) async fn healthz() -> &'static str {
    "ok"
}

pub(super) async fn get_tree(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    if let Err(err) = validate_tree_path(&path) {
        return bad_request(err);
    }
    let tree = state.tree.read().await;
    Json(tree.snapshot(&path)).into_response()
}

pub(super) async fn put_tree(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Json(value): Json<serde_json::Value>,
) -> Response {
    if let Err(err) = validate_tree_path(&path) {
        return bad_request(err);
    }

    let mut tree = state.tree.write().await;
    let mut next = tree.clone();
    let revision = next.put(&path, value, now_ts());
    // Only publish what made it to disk.
    if let Err(err) = persist_tree(&state.data_dir, &next) {
        return internal_error(err);
    }
    *tree = next;
    drop(tree);

    state.changes.send_replace(revision);
    tracing::info!(path = %path, revision, "tree written");
    Json(WriteResponse { revision }).into_response()
}

pub(super) async fn watch_tree(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(q): Query<WatchQuery>,
) -> Response {
    if let Err(err) = validate_tree_path(&path) {
        return bad_request(err);
    }

    let wait = Duration::from_millis(q.timeout_ms).min(MAX_WATCH);
    let deadline = tokio::time::Instant::now() + wait;
    // Subscribe before looking so a write between the check and the wait still wakes us.
    let mut changes = state.changes.subscribe();

    loop {
        {
            let tree = state.tree.read().await;
            let snapshot = tree.snapshot(&path);
            if snapshot.revision > q.after {
                return Json(snapshot).into_response();
            }
        }

        match tokio::time::timeout_at(deadline, changes.changed()).await {
            Ok(Ok(())) => continue,
            Ok(Err(_)) | Err(_) => return StatusCode::NO_CONTENT.into_response(),
        }
    }
}
