use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, StoreBackend},
    dao::{
        participant_store::{
            ParticipantStore, cached::CachedParticipantStore, memory::MemoryParticipantStore,
        },
        storage::StorageError,
    },
    services::{participant_service, sse_events},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Open the backend selected in `config`, wrapped in the offline read cache
/// when enabled.
///
/// A backend whose feature was not compiled in falls back to memory.
pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn ParticipantStore>, StorageError> {
    let backend: Arc<dyn ParticipantStore> = match config.store {
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            use crate::dao::participant_store::mongodb::{MongoConfig, MongoParticipantStore};

            let mongo_config = MongoConfig::from_env().await?;
            Arc::new(MongoParticipantStore::connect(mongo_config).await?)
        }
        #[cfg(feature = "couch-store")]
        StoreBackend::Couch => {
            use crate::dao::participant_store::couchdb::{CouchConfig, CouchParticipantStore};

            let couch_config = CouchConfig::from_env()?;
            Arc::new(CouchParticipantStore::connect(couch_config).await?)
        }
        StoreBackend::Memory => Arc::new(MemoryParticipantStore::new()),
        #[allow(unreachable_patterns)]
        other => {
            warn!(backend = ?other, "storage backend not compiled in; using memory");
            Arc::new(MemoryParticipantStore::new())
        }
    };

    if config.offline_cache {
        Ok(Arc::new(CachedParticipantStore::new(backend)))
    } else {
        Ok(backend)
    }
}

/// Connect to the storage backend and keep the shared state in degraded mode
/// while it is unavailable.
///
/// The roster is refreshed once after every (re)connection. User actions are
/// never retried from here.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn ParticipantStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.install_store(store.clone()).await;
                info!("storage connection established; leaving degraded mode");
                sse_events::broadcast_system_status(&state, false);
                initial_refresh(&state).await;
                delay = INITIAL_DELAY;

                if !watch_health(&state, store.as_ref()).await {
                    warn!("exhausted storage reconnect attempts; staying in degraded mode");
                }

                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

async fn initial_refresh(state: &SharedState) {
    match participant_service::refresh(state).await {
        Ok(count) => info!(count, "initial roster loaded"),
        Err(err) => warn!(error = %err, "initial roster load failed"),
    }
}

/// Poll the store until it stays unreachable after every reconnect attempt.
async fn watch_health(state: &SharedState, store: &dyn ParticipantStore) -> bool {
    loop {
        if store.health_check().await.is_ok() {
            if state.is_degraded() {
                info!("storage healthy again; leaving degraded mode");
                set_degraded(state, false);
            }
            sleep(HEALTH_POLL_INTERVAL).await;
            continue;
        }

        let mut reconnect_delay = INITIAL_DELAY;
        let mut reconnected = false;

        for attempt in 0..MAX_RECONNECT_ATTEMPTS {
            match store.try_reconnect().await {
                Ok(()) => {
                    info!("storage reconnection succeeded after health check failure");
                    reconnected = true;
                    break;
                }
                Err(err) => {
                    if attempt == 0 {
                        warn!(attempt, error = %err, "storage reconnect failed; entering degraded mode");
                        set_degraded(state, true);
                    } else {
                        warn!(attempt, error = %err, "storage reconnect attempt failed");
                    }
                    sleep(reconnect_delay).await;
                    reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
                }
            }
        }

        if !reconnected {
            return false;
        }

        set_degraded(state, false);
        initial_refresh(state).await;
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

fn set_degraded(state: &SharedState, degraded: bool) {
    if state.is_degraded() != degraded {
        state.update_degraded(degraded);
        sse_events::broadcast_system_status(state, degraded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::{Category, NewParticipant, ParticipantStatus},
        state::AppState,
    };

    #[tokio::test]
    async fn memory_backend_is_wrapped_in_cache_when_enabled() {
        let config = AppConfig {
            store: StoreBackend::Memory,
            ..AppConfig::default()
        };
        let store = connect_store(&config).await.unwrap();
        assert!(store.fetch_all().await.unwrap().is_empty());
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn supervisor_installs_store_and_loads_roster() {
        let memory = MemoryParticipantStore::new();
        memory.insert(NewParticipant {
            team_number: "0001".into(),
            team_name: "Team A1".into(),
            first_name: "Emma".into(),
            last_name: "Davis".into(),
            grade: 5,
            school_name: "Middle School X".into(),
            category: Category::Junior,
            arrival_time: "08:05".into(),
            status: ParticipantStatus::Registered,
        });
        let state = AppState::new(AppConfig::default());
        let mut watcher = state.degraded_watcher();

        tokio::spawn(run(state.clone(), move || {
            let store: Arc<dyn ParticipantStore> = Arc::new(memory.clone());
            async move { Ok(store) }
        }));

        watcher.changed().await.unwrap();
        assert!(!*watcher.borrow_and_update());
        let loaded = tokio::time::timeout(Duration::from_secs(1), async {
            while state.roster().read().await.is_empty() {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(loaded.is_ok());
        assert_eq!(state.roster().read().await.len(), 1);
        assert!(state.store().await.is_some());
    }
}
