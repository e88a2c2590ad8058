use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use crate::services::backend::{BookingBackend, SessionProvider};
use crate::services::draft::DraftSlot;
use crate::services::notify::{NotificationInbox, NotificationSink};
use crate::services::store::BookingStore;

type PartyMap<T> = tokio::sync::Mutex<HashMap<String, Arc<tokio::sync::Mutex<T>>>>;

/// State of the booking service.
///
/// Drafts and stores are locked per party. The outer maps are only held long
/// enough to find or insert an entry, never across a remote call.
pub struct AppState {
    pub backend: Box<dyn BookingBackend>,
    pub sessions: Box<dyn SessionProvider>,
    pub notifier: Box<dyn NotificationSink>,
    pub inbox: Box<dyn NotificationInbox>,
    drafts: PartyMap<DraftSlot>,
    stores: PartyMap<BookingStore>,
}

impl AppState {
    pub fn new(
        backend: Box<dyn BookingBackend>,
        sessions: Box<dyn SessionProvider>,
        notifier: Box<dyn NotificationSink>,
        inbox: Box<dyn NotificationInbox>,
    ) -> Self {
        Self {
            backend,
            sessions,
            notifier,
            inbox,
            drafts: tokio::sync::Mutex::new(HashMap::new()),
            stores: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// The party's draft slot, created if missing.
    pub async fn draft_slot(&self, party_id: &str) -> Arc<tokio::sync::Mutex<DraftSlot>> {
        self.drafts
            .lock()
            .await
            .entry(party_id.to_string())
            .or_default()
            .clone()
    }

    /// The party's draft slot, only if one exists.
    pub async fn existing_draft_slot(
        &self,
        party_id: &str,
    ) -> Option<Arc<tokio::sync::Mutex<DraftSlot>>> {
        self.drafts.lock().await.get(party_id).cloned()
    }

    /// Drops the party's slot once it holds no draft.
    ///
    /// A slot that another request has locked is left alone.
    pub async fn release_draft_slot(&self, party_id: &str) {
        let mut drafts = self.drafts.lock().await;
        let idle = drafts
            .get(party_id)
            .and_then(|slot| slot.try_lock().ok().map(|s| s.get().is_none()))
            .unwrap_or(false);
        if idle {
            drafts.remove(party_id);
        }
    }

    pub async fn draft_count(&self) -> usize {
        self.drafts.lock().await.len()
    }

    /// The party's booking store, created if missing.
    pub async fn store(&self, party_id: &str) -> Arc<tokio::sync::Mutex<BookingStore>> {
        self.stores
            .lock()
            .await
            .entry(party_id.to_string())
            .or_default()
            .clone()
    }
}

/// State of the embedded REST collection backend.
pub struct BackendState {
    pub db: Arc<Mutex<Connection>>,
}

impl BackendState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    pub fn db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
