//! In-memory widget state backed by a [`SessionStateRepository`].

use izzico_core::clock::Clock;
use izzico_core::session_state::{SessionState, SessionStateRepository};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
struct WidgetState {
    state: SessionState,
    initialized: bool,
}

/// Holds the open flag and rated-message set for one widget instance.
///
/// The stored record is restored at most once per instance. After that,
/// every change to the open flag or to the rated set is saved right away.
pub struct WidgetSession {
    repository: Arc<dyn SessionStateRepository>,
    clock: Arc<dyn Clock>,
    inner: Mutex<WidgetState>,
}

impl WidgetSession {
    pub fn new(repository: Arc<dyn SessionStateRepository>, clock: Arc<dyn Clock>) -> Self {
        let state = SessionState::new(clock.now());
        Self {
            repository,
            clock,
            inner: Mutex::new(WidgetState {
                state,
                initialized: false,
            }),
        }
    }

    /// Restores the stored record on the first call.
    ///
    /// Returns `true` if a fresh record was restored. Later calls do nothing
    /// and return `false`.
    pub fn initialize(&self) -> bool {
        let mut inner = self.lock();
        if inner.initialized {
            return false;
        }
        inner.initialized = true;

        match self.repository.restore(self.clock.now()) {
            Some(restored) => {
                tracing::debug!(
                    "[SessionState] Restored (open: {}, rated: {})",
                    restored.is_open,
                    restored.rated_message_ids.len()
                );
                inner.state = restored;
                true
            }
            None => false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().state.is_open
    }

    pub fn set_open(&self, is_open: bool) {
        let mut inner = self.lock();
        if inner.state.is_open == is_open {
            return;
        }
        inner.state.is_open = is_open;
        self.persist_if_initialized(&mut inner);
    }

    pub fn is_rated(&self, message_id: &str) -> bool {
        self.lock().state.is_rated(message_id)
    }

    pub fn rated_message_ids(&self) -> BTreeSet<String> {
        self.lock().state.rated_message_ids.clone()
    }

    /// Adds `message_id` to the rated set. Returns `false` if it was
    /// already there.
    pub fn mark_rated(&self, message_id: &str) -> bool {
        let mut inner = self.lock();
        if !inner.state.rated_message_ids.insert(message_id.to_string()) {
            return false;
        }
        self.persist_if_initialized(&mut inner);
        true
    }

    /// Saves the current state unconditionally.
    pub fn save_now(&self) {
        let mut inner = self.lock();
        Self::persist(&*self.repository, &*self.clock, &mut inner);
    }

    /// Saves the state with the widget marked open.
    ///
    /// Called right before a directive that may unload the page, so the
    /// widget reopens on the next page even if it was hidden meanwhile.
    pub fn save_for_navigation(&self) {
        let mut inner = self.lock();
        inner.state.is_open = true;
        Self::persist(&*self.repository, &*self.clock, &mut inner);
    }

    /// Clears the stored record and the in-memory rated set.
    pub fn end(&self) {
        let mut inner = self.lock();
        self.repository.clear();
        inner.state = SessionState::new(self.clock.now());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WidgetState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_if_initialized(&self, inner: &mut WidgetState) {
        if inner.initialized {
            Self::persist(&*self.repository, &*self.clock, inner);
        }
    }

    fn persist(
        repository: &dyn SessionStateRepository,
        clock: &dyn Clock,
        inner: &mut WidgetState,
    ) {
        inner.state.saved_at = clock.now();
        repository.save(&inner.state);
    }
}

impl std::fmt::Debug for WidgetSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("WidgetSession")
            .field("state", &inner.state)
            .field("initialized", &inner.initialized)
            .finish()
    }
}
