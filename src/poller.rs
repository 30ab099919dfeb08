use std::future::Future;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::time::Duration;

use reqwest::Client;
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::{
    spotify::{self, ApiError},
    types::PlaybackSnapshot,
    warning,
};

/// Slot the poller publishes into and consumers read from. Replaced
/// wholesale on every successful tick.
pub type SharedSnapshot = Arc<Mutex<Option<PlaybackSnapshot>>>;

/// Interval-driven playback poller.
///
/// Fires one fetch immediately on spawn, then one per interval tick. Each
/// tick's fetch runs as its own task, so ticks are not serialized: under
/// provider latency jitter a slow tick may resolve after a later one, and
/// the last resolved response wins. What IS guaranteed is cancellation:
/// once [`PlaybackPoller::stop`] runs, no response (in-flight or future)
/// is ever applied, enforced by a generation token compared at apply time.
pub struct PlaybackPoller {
    generation: Arc<AtomicU64>,
    live: u64,
    unauthorized: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PlaybackPoller {
    pub fn spawn(
        client: Client,
        token: String,
        snapshot: SharedSnapshot,
        interval: Duration,
    ) -> Self {
        Self::spawn_with(
            move || {
                let client = client.clone();
                let token = token.clone();
                async move { spotify::player::get_currently_playing(&client, &token).await }
            },
            snapshot,
            interval,
        )
    }

    pub fn spawn_with<F, Fut>(fetch: F, snapshot: SharedSnapshot, interval: Duration) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Option<PlaybackSnapshot>, ApiError>> + Send + 'static,
    {
        let generation = Arc::new(AtomicU64::new(0));
        let unauthorized = Arc::new(AtomicBool::new(false));
        let live = generation.load(Ordering::SeqCst);

        let tick_generation = Arc::clone(&generation);
        let tick_unauthorized = Arc::clone(&unauthorized);
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            loop {
                // The first tick completes immediately.
                ticker.tick().await;

                let fut = fetch();
                let snapshot = Arc::clone(&snapshot);
                let generation = Arc::clone(&tick_generation);
                let unauthorized = Arc::clone(&tick_unauthorized);
                tokio::spawn(async move {
                    match fut.await {
                        Ok(next) => apply_if_live(&generation, live, &snapshot, next).await,
                        Err(ApiError::Unauthorized) => {
                            unauthorized.store(true, Ordering::SeqCst);
                        }
                        // Transient: keep the previous snapshot for this
                        // tick, the next interval retries implicitly.
                        Err(err) => warning!("Playback fetch failed: {}", err),
                    }
                });
            }
        });

        Self {
            generation,
            live,
            unauthorized,
            task,
        }
    }

    /// True once a poll came back 401; the owning session should tear this
    /// poller down and force a re-login.
    pub fn is_unauthorized(&self) -> bool {
        self.unauthorized.load(Ordering::SeqCst)
    }

    /// Stops the ticker and invalidates this poller's generation, so any
    /// in-flight response is discarded instead of applied. Safe to call
    /// more than once.
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.task.abort();
    }
}

/// Applies a resolved snapshot only if the poller that requested it still
/// holds the live generation. The check runs under the slot lock, so a
/// teardown between check and write cannot slip a stale update through.
pub async fn apply_if_live(
    generation: &AtomicU64,
    live: u64,
    snapshot: &SharedSnapshot,
    next: Option<PlaybackSnapshot>,
) {
    let mut slot = snapshot.lock().await;
    if generation.load(Ordering::SeqCst) == live {
        *slot = next;
    }
}
