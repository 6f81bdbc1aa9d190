//! Background long-poll loop that feeds tree snapshots into the session's event channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use super::*;
use crate::session::RemoteEvent;

const DEFAULT_POLL: Duration = Duration::from_secs(20);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

pub struct Subscription {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn spawn(store: Arc<dyn TreeStore + Send + Sync>, events: Sender<RemoteEvent>) -> Self {
        Self::spawn_with_poll(store, events, DEFAULT_POLL)
    }

    /// Like `spawn`, with an explicit server-side wait per poll.
    pub fn spawn_with_poll(
        store: Arc<dyn TreeStore + Send + Sync>,
        events: Sender<RemoteEvent>,
        poll: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let handle = std::thread::Builder::new()
            .name("linkdeck-subscription".to_string())
            .spawn(move || run(store.as_ref(), &events, &flag, poll))
            .map_err(|err| tracing::error!(error = %err, "could not start subscription thread"))
            .ok();
        Self { stop, handle }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ask the loop to exit after its current poll. Does not wait for it.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(store: &dyn TreeStore, events: &Sender<RemoteEvent>, stop: &AtomicBool, poll: Duration) {
    let mut seen: Option<u64> = None;
    let mut failures: u32 = 0;

    while !stop.load(Ordering::Relaxed) {
        let res = match seen {
            None => store.read().map(Some),
            Some(revision) => store.wait_for_change(revision, poll),
        };

        match res {
            Ok(Some(snapshot)) => {
                failures = 0;
                seen = Some(snapshot.revision);
                if events.send(RemoteEvent::Snapshot(snapshot)).is_err() {
                    break;
                }
            }
            Ok(None) => failures = 0,
            Err(err) => {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                tracing::debug!(error = %err, failures, "subscription poll failed");
                // One notice per outage, not one per retry.
                if failures == 0
                    && events
                        .send(RemoteEvent::ReadFailed(format!("{:#}", err)))
                        .is_err()
                {
                    break;
                }
                std::thread::sleep(backoff(failures));
                failures = failures.saturating_add(1);
            }
        }
    }
    tracing::debug!("subscription stopped");
}

fn backoff(failures: u32) -> Duration {
    let ms = 200u64.saturating_mul(1 << failures.min(10));
    Duration::from_millis(ms).min(MAX_BACKOFF)
}

#[cfg(test)]
#[path = "../tests/remote/subscription_tests.rs"]
mod tests;
