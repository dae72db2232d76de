use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::debug;

use crate::fleet::FleetStore;

/// Background task that reloads the fleet snapshot whenever its file's
/// modification time changes.
pub async fn run_reloader(store: Arc<FleetStore>, every: Duration) {
    let Some(path) = store.source().map(Path::to_path_buf) else {
        return;
    };
    let mut last_seen = modified(&path).await;
    let mut interval = tokio::time::interval(every);
    interval.tick().await; // first tick fires immediately
    loop {
        interval.tick().await;
        if poll_once(&store, &path, &mut last_seen).await {
            debug!("fleet file {} changed", path.display());
        }
    }
}

/// Reload if the file changed since `last_seen`. Returns whether a reload was attempted.
/// `last_seen` only advances on a successful reload, so a file caught
/// mid-write is retried on the next tick.
async fn poll_once(store: &FleetStore, path: &Path, last_seen: &mut Option<SystemTime>) -> bool {
    let current = modified(path).await;
    if current.is_none() || current == *last_seen {
        return false;
    }
    // Failures are logged by `reload` and leave the previous snapshot in place.
    if store.reload().await.is_ok() {
        *last_seen = current;
    }
    true
}

async fn modified(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok()
}
