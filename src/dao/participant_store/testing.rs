//! Failure-injecting store wrapper for unit tests.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU8, AtomicUsize, Ordering},
    },
};

use futures::future::BoxFuture;

use crate::dao::{
    models::{NewParticipant, Participant, ParticipantPatch},
    participant_store::{ParticipantStore, memory::MemoryParticipantStore},
    storage::{StorageError, StorageResult},
};

const HEALTHY: u8 = 0;
const OFFLINE: u8 = 1;
const DENIED: u8 = 2;
const BROKEN: u8 = 3;
const MISSING: u8 = 4;
const READS_DENIED: u8 = 5;

#[derive(Debug)]
struct InjectedFailure;

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("injected failure")
    }
}

impl std::error::Error for InjectedFailure {}

/// Memory store that can be switched into failure modes.
#[derive(Clone)]
pub struct FlakyStore {
    memory: MemoryParticipantStore,
    mode: Arc<AtomicU8>,
    creates_before_failure: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new(memory: MemoryParticipantStore) -> Self {
        Self {
            memory,
            mode: Arc::new(AtomicU8::new(HEALTHY)),
            creates_before_failure: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }

    pub fn memory(&self) -> &MemoryParticipantStore {
        &self.memory
    }

    pub fn go_offline(&self) {
        self.mode.store(OFFLINE, Ordering::SeqCst);
    }

    pub fn deny_access(&self) {
        self.mode.store(DENIED, Ordering::SeqCst);
    }

    pub fn break_backend(&self) {
        self.mode.store(BROKEN, Ordering::SeqCst);
    }

    pub fn lose_collection(&self) {
        self.mode.store(MISSING, Ordering::SeqCst);
    }

    /// Refuse reads only; writes keep working.
    pub fn deny_reads(&self) {
        self.mode.store(READS_DENIED, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.mode.store(HEALTHY, Ordering::SeqCst);
    }

    /// Let `count` creates succeed, then fail every following one as offline.
    pub fn fail_creates_after(&self, count: usize) {
        self.creates_before_failure.store(count, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        match self.mode.load(Ordering::SeqCst) {
            OFFLINE => Err(StorageError::unavailable("offline".into(), InjectedFailure)),
            DENIED => Err(StorageError::permission_denied("denied".into(), InjectedFailure)),
            BROKEN => Err(StorageError::backend("broken".into(), InjectedFailure)),
            MISSING => Err(StorageError::not_found("participants")),
            _ => Ok(()),
        }
    }

    fn check_read(&self) -> StorageResult<()> {
        if self.mode.load(Ordering::SeqCst) == READS_DENIED {
            return Err(StorageError::permission_denied(
                "reads denied".into(),
                InjectedFailure,
            ));
        }
        self.check()
    }

    fn take_create_slot(&self) -> StorageResult<()> {
        let remaining = self.creates_before_failure.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(StorageError::unavailable("offline".into(), InjectedFailure));
        }
        if remaining != usize::MAX {
            self.creates_before_failure
                .store(remaining - 1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl ParticipantStore for FlakyStore {
    fn fetch_all(&self) -> BoxFuture<'static, StorageResult<Vec<Participant>>> {
        let store = self.clone();
        Box::pin(async move {
            store.check_read()?;
            store.memory.fetch_all().await
        })
    }

    fn create_one(&self, data: NewParticipant) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check()?;
            store.take_create_slot()?;
            store.memory.create_one(data).await
        })
    }

    fn update_one(
        &self,
        id: String,
        patch: ParticipantPatch,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.check()?;
            store.memory.update_one(id, patch).await
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check() })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check() })
    }
}
