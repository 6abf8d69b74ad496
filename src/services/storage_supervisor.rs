use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{result_store::ResultStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Connect to the result store and keep the shared state in degraded mode while it is unreachable.
///
/// Scoring keeps working in degraded mode; only recording and reading results fail.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn ResultStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.set_result_store(store.clone()).await;
                info!("result store connected; leaving degraded mode");
                delay = INITIAL_DELAY;

                watch_health(&state, store.as_ref()).await;

                state.clear_result_store().await;
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "result store connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

/// Poll the store until it stays unreachable after [`MAX_RECONNECT_ATTEMPTS`] retries.
async fn watch_health(state: &SharedState, store: &dyn ResultStore) {
    loop {
        if store.health_check().await.is_ok() {
            if state.is_degraded() {
                info!("result store healthy again; leaving degraded mode");
                state.update_degraded(false);
            }
            sleep(HEALTH_POLL_INTERVAL).await;
            continue;
        }

        let mut reconnect_delay = INITIAL_DELAY;
        let mut reconnected = false;
        for attempt in 0..MAX_RECONNECT_ATTEMPTS {
            match store.try_reconnect().await {
                Ok(()) => {
                    info!(attempt, "result store reconnected after failed health check");
                    reconnected = true;
                    break;
                }
                Err(err) => {
                    if attempt == 0 {
                        warn!(attempt, error = %err, "result store reconnect failed; entering degraded mode");
                        state.update_degraded(true);
                    } else {
                        warn!(attempt, error = %err, "result store reconnect attempt failed");
                    }
                    sleep(reconnect_delay).await;
                    reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
                }
            }
        }

        if !reconnected {
            warn!("exhausted result store reconnect attempts; staying in degraded mode");
            return;
        }

        state.update_degraded(false);
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{models::MatchResultEntity, storage::StorageResult},
        state::AppState,
    };

    #[derive(Default)]
    struct FakeStore {
        healthy: Arc<AtomicBool>,
        reconnect_ok: bool,
        reconnects: Arc<AtomicUsize>,
    }

    fn outage() -> StorageError {
        StorageError::Corrupted {
            message: "store down".into(),
        }
    }

    impl ResultStore for FakeStore {
        fn record_result(&self, _: MatchResultEntity) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn find_result(
            &self,
            _: String,
        ) -> BoxFuture<'static, StorageResult<Option<MatchResultEntity>>> {
            Box::pin(async { Ok(None) })
        }

        fn list_results(&self) -> BoxFuture<'static, StorageResult<Vec<MatchResultEntity>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            let healthy = self.healthy.load(Ordering::SeqCst);
            Box::pin(async move { if healthy { Ok(()) } else { Err(outage()) } })
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            self.reconnects.fetch_add(1, Ordering::SeqCst);
            let ok = self.reconnect_ok;
            Box::pin(async move { if ok { Ok(()) } else { Err(outage()) } })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_backoff_until_connected() {
        let state = AppState::new(AppConfig::default());
        let attempts = Arc::new(AtomicUsize::new(0));
        let supervisor = tokio::spawn(run(state.clone(), {
            let attempts = attempts.clone();
            move || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(outage())
                    } else {
                        let store = FakeStore::default();
                        store.healthy.store(true, Ordering::SeqCst);
                        Ok(Arc::new(store) as Arc<dyn ResultStore>)
                    }
                }
            }
        }));

        // Attempts at 0s, 1s and 3s.
        sleep(Duration::from_millis(2_500)).await;
        assert!(state.is_degraded());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        sleep(Duration::from_secs(1)).await;
        assert!(!state.is_degraded());
        assert!(state.result_store().await.is_some());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);

        supervisor.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_reconnects_return_in_degraded_mode() {
        let state = AppState::new(AppConfig::default());
        state.update_degraded(false);
        let store = FakeStore::default();

        watch_health(&state, &store).await;

        assert!(state.is_degraded());
        assert_eq!(
            store.reconnects.load(Ordering::SeqCst),
            MAX_RECONNECT_ATTEMPTS as usize
        );
    }

    #[tokio::test(start_paused = true)]
    async fn successful_reconnect_keeps_service_up() {
        let state = AppState::new(AppConfig::default());
        state.update_degraded(false);
        let store = FakeStore {
            reconnect_ok: true,
            ..FakeStore::default()
        };

        let watched =
            tokio::time::timeout(Duration::from_secs(12), watch_health(&state, &store)).await;

        assert!(watched.is_err(), "watcher keeps polling a reachable store");
        assert!(!state.is_degraded());
        assert!(store.reconnects.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn lost_store_is_uninstalled() {
        let state = AppState::new(AppConfig::default());
        let connected = Arc::new(AtomicBool::new(false));
        let supervisor = tokio::spawn(run(state.clone(), {
            let connected = connected.clone();
            move || {
                let first = !connected.swap(true, Ordering::SeqCst);
                async move {
                    if first {
                        Ok(Arc::new(FakeStore::default()) as Arc<dyn ResultStore>)
                    } else {
                        Err(outage())
                    }
                }
            }
        }));

        // First reconnect fails right away; the rest follow at 1s and 3s.
        sleep(Duration::from_millis(500)).await;
        assert!(state.is_degraded());
        assert!(state.result_store().await.is_some());

        sleep(Duration::from_secs(8)).await;
        assert!(state.is_degraded());
        assert!(state.result_store().await.is_none());

        supervisor.abort();
    }
}
