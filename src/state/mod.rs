pub mod roster;
mod sse;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::participant_store::ParticipantStore, error::ServiceError};

pub use self::roster::Roster;
pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

const SSE_CAPACITY: usize = 16;

/// Central application state: the installed store, the roster read from it
/// and the channels announcing changes.
///
/// Everything a handler needs is reachable from here, so tests build one
/// around an in-memory store with [`AppState::with_store`].
pub struct AppState {
    store: RwLock<Option<Arc<dyn ParticipantStore>>>,
    roster: RwLock<Roster>,
    sse: SseHub,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            roster: RwLock::new(Roster::default()),
            sse: SseHub::new(SSE_CAPACITY),
            degraded: degraded_tx,
            config,
        })
    }

    /// Construct a state with `store` already installed and healthy.
    pub fn with_store(store: Arc<dyn ParticipantStore>, config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            store: RwLock::new(Some(store)),
            roster: RwLock::new(Roster::default()),
            sse: SseHub::new(SSE_CAPACITY),
            degraded: degraded_tx,
            config,
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn ParticipantStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store, or [`ServiceError::Degraded`] when none is installed.
    pub async fn require_store(&self) -> Result<Arc<dyn ParticipantStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn ParticipantStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Participants as of the last refresh.
    pub fn roster(&self) -> &RwLock<Roster> {
        &self.roster
    }

    /// Broadcast hub used for the roster SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::participant_store::memory::MemoryParticipantStore;

    #[tokio::test]
    async fn new_state_is_degraded_until_a_store_is_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_store().await,
            Err(ServiceError::Degraded)
        ));

        let mut watcher = state.degraded_watcher();
        state
            .install_store(Arc::new(MemoryParticipantStore::new()))
            .await;
        assert!(!state.is_degraded());
        assert!(watcher.has_changed().expect("sender alive"));
        assert!(!*watcher.borrow_and_update());
    }

    #[tokio::test]
    async fn unchanged_degraded_flag_is_not_rebroadcast() {
        let state = AppState::with_store(
            Arc::new(MemoryParticipantStore::new()),
            AppConfig::default(),
        );
        let watcher = state.degraded_watcher();
        state.update_degraded(false);
        assert!(!watcher.has_changed().expect("sender alive"));
    }
}
