/// Bounded undo stack.
pub mod history;
/// Tennis scoring rules.
pub mod scoring;
/// One match being scored.
pub mod session;
mod sse;

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::{config::AppConfig, dao::result_store::ResultStore, error::ServiceError};

pub use self::session::{Participants, ScoringSession};
pub use self::sse::SseHub;

/// Handle shared by every handler and background task.
pub type SharedState = Arc<AppState>;

/// Central application state: live scoring sessions, the result store and the SSE hub.
pub struct AppState {
    config: AppConfig,
    result_store: RwLock<Option<Arc<dyn ResultStore>>>,
    sessions: DashMap<Uuid, ScoringSession>,
    /// Active session per external match id; one umpire per match.
    matches: DashMap<String, Uuid>,
    public_sse: SseHub,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a result store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            public_sse: SseHub::new(config.sse_capacity),
            config,
            result_store: RwLock::new(None),
            sessions: DashMap::new(),
            matches: DashMap::new(),
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current result store, if one is installed.
    pub async fn result_store(&self) -> Option<Arc<dyn ResultStore>> {
        let guard = self.result_store.read().await;
        guard.as_ref().cloned()
    }

    /// Same as [`AppState::result_store`] but fails with [`ServiceError::Degraded`].
    pub async fn require_result_store(&self) -> Result<Arc<dyn ResultStore>, ServiceError> {
        self.result_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new result store implementation and leave degraded mode.
    pub async fn set_result_store(&self, store: Arc<dyn ResultStore>) {
        {
            let mut guard = self.result_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current result store and enter degraded mode.
    pub async fn clear_result_store(&self) {
        {
            let mut guard = self.result_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag, notifying watchers only when it changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.public_sse
    }

    /// Register a new session, refusing a second one for the same match.
    pub fn open_session(&self, session: ScoringSession) -> Result<(), ServiceError> {
        match self.matches.entry(session.match_id.clone()) {
            Entry::Occupied(existing) => Err(ServiceError::InvalidState(format!(
                "match `{}` is already being scored by session {}",
                existing.key(),
                existing.get()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(session.id);
                self.sessions.insert(session.id, session);
                Ok(())
            }
        }
    }

    /// Remove a session from the registry and hand it back.
    ///
    /// A session whose result is being recorded cannot be closed.
    pub fn close_session(&self, id: Uuid) -> Result<ScoringSession, ServiceError> {
        let Some((_, session)) = self
            .sessions
            .remove_if(&id, |_, session| !session.is_finalizing())
        else {
            return Err(if self.sessions.contains_key(&id) {
                session_finalizing(id)
            } else {
                session_not_found(id)
            });
        };
        self.release_match(&session);
        Ok(session)
    }

    /// Run `f` with shared access to session `id`.
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&ScoringSession) -> T,
    ) -> Result<T, ServiceError> {
        let session = self.sessions.get(&id).ok_or_else(|| session_not_found(id))?;
        Ok(f(&session))
    }

    /// Run `f` with exclusive access to session `id`.
    ///
    /// The shard lock is held for the duration of `f`, which must not block.
    /// Sessions being finalized are frozen and refused.
    pub fn with_session_mut<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ScoringSession) -> T,
    ) -> Result<T, ServiceError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| session_not_found(id))?;
        if session.is_finalizing() {
            return Err(session_finalizing(id));
        }
        Ok(f(&mut session))
    }

    /// Freeze session `id` for finalization once `f` accepts it.
    ///
    /// `f` and the freeze run under the same shard lock, so the value it
    /// returns reflects the final score. Only one finalization can be in
    /// flight per session.
    pub fn begin_finalize<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&ScoringSession) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| session_not_found(id))?;
        if session.is_finalizing() {
            return Err(session_finalizing(id));
        }
        let value = f(&session)?;
        session.set_finalizing(true);
        Ok(value)
    }

    /// Unfreeze session `id` after a failed finalization.
    pub fn abort_finalize(&self, id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.set_finalizing(false);
        }
    }

    /// Remove a frozen session once its result has been recorded.
    pub fn complete_finalize(&self, id: Uuid) -> Result<ScoringSession, ServiceError> {
        let (_, session) = self
            .sessions
            .remove_if(&id, |_, session| session.is_finalizing())
            .ok_or_else(|| {
                ServiceError::InvalidState(format!("scoring session `{id}` is not being finalized"))
            })?;
        self.release_match(&session);
        Ok(session)
    }

    fn release_match(&self, session: &ScoringSession) {
        self.matches
            .remove_if(&session.match_id, |_, owner| *owner == session.id);
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Apply `f` to every live session, in no particular order.
    pub fn map_sessions<T>(&self, f: impl Fn(&ScoringSession) -> T) -> Vec<T> {
        self.sessions.iter().map(|entry| f(entry.value())).collect()
    }
}

fn session_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("scoring session `{id}` not found"))
}

fn session_finalizing(id: Uuid) -> ServiceError {
    ServiceError::InvalidState(format!("scoring session `{id}` is being finalized"))
}
