//! Runtime capabilities registered by the page currently displayed.

use izzico_core::Result;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Callback that opens a modal or starts a tour on the current page.
pub type PageCallback = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Modals and tours mounted on the current page, plus filters waiting for
/// the search page to pick them up.
///
/// Pages register their entries when they mount and unregister them when
/// they unmount, so a lookup reflects what is actually on screen.
#[derive(Default)]
pub struct PageRegistry {
    modals: RwLock<HashMap<String, PageCallback>>,
    tours: RwLock<HashMap<String, PageCallback>>,
    pending_filters: Mutex<BTreeMap<String, String>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_modal(&self, modal_id: impl Into<String>, open: PageCallback) {
        let mut modals = self.modals.write().unwrap_or_else(PoisonError::into_inner);
        modals.insert(modal_id.into(), open);
    }

    pub fn unregister_modal(&self, modal_id: &str) {
        let mut modals = self.modals.write().unwrap_or_else(PoisonError::into_inner);
        modals.remove(modal_id);
    }

    pub fn modal(&self, modal_id: &str) -> Option<PageCallback> {
        let modals = self.modals.read().unwrap_or_else(PoisonError::into_inner);
        modals.get(modal_id).cloned()
    }

    pub fn register_tour(&self, tour_id: impl Into<String>, start: PageCallback) {
        let mut tours = self.tours.write().unwrap_or_else(PoisonError::into_inner);
        tours.insert(tour_id.into(), start);
    }

    pub fn unregister_tour(&self, tour_id: &str) {
        let mut tours = self.tours.write().unwrap_or_else(PoisonError::into_inner);
        tours.remove(tour_id);
    }

    pub fn tour(&self, tour_id: &str) -> Option<PageCallback> {
        let tours = self.tours.read().unwrap_or_else(PoisonError::into_inner);
        tours.get(tour_id).cloned()
    }

    /// Replaces the pending search filters.
    pub fn set_pending_filters(&self, filters: BTreeMap<String, String>) {
        *self.pending_filters.lock().unwrap_or_else(PoisonError::into_inner) = filters;
    }

    pub fn pending_filters(&self) -> BTreeMap<String, String> {
        self.pending_filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Called by the search page once it has applied the filters.
    pub fn clear_pending_filters(&self) {
        self.pending_filters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let modals = self.modals.read().unwrap_or_else(PoisonError::into_inner);
        let tours = self.tours.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("PageRegistry")
            .field("modals", &modals.keys().collect::<Vec<_>>())
            .field("tours", &tours.keys().collect::<Vec<_>>())
            .field("pending_filters", &self.pending_filters())
            .finish()
    }
}
