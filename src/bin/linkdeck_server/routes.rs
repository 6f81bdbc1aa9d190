use super::*;

pub(super) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/tree/:path", get(get_tree).put(put_tree))
        .route("/tree/:path/watch", get(watch_tree))
        .with_state(state)
}
