//! Per-turn progress view of executed directives.

use izzico_core::directive::{ActionDirective, ActionResult};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Pending,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFeedbackEntry {
    pub sequence: usize,
    pub action_type: String,
    pub label: String,
    pub status: ActionStatus,
}

#[derive(Debug, Default)]
struct BoardState {
    generation: u64,
    entries: Vec<ActionFeedbackEntry>,
}

/// Shows pending, then succeeded or failed, for each directive of the
/// latest batch.
///
/// Entries flip from pending as each result arrives. Once a batch has all
/// its results the board clears itself after the display window. Starting a new batch invalidates the timer of the
/// previous one.
#[derive(Debug, Clone)]
pub struct ActionFeedbackBoard {
    inner: Arc<Mutex<BoardState>>,
    display_window: Duration,
}

impl ActionFeedbackBoard {
    pub fn new(display_window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BoardState::default())),
            display_window,
        }
    }

    /// Marks every directive pending and returns the batch generation.
    pub fn begin(&self, directives: &[ActionDirective]) -> u64 {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        state.entries = directives
            .iter()
            .map(|d| ActionFeedbackEntry {
                sequence: d.sequence,
                action_type: d.action_type.clone(),
                label: d.label().to_string(),
                status: ActionStatus::Pending,
            })
            .collect();
        state.generation
    }

    /// Applies one result to batch `generation` as soon as it is known.
    ///
    /// Results for a batch that has since been replaced are ignored.
    pub fn record(&self, generation: u64, result: &ActionResult) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation != generation {
            return;
        }
        if let Some(entry) = state
            .entries
            .iter_mut()
            .find(|e| e.sequence == result.sequence)
        {
            entry.status = if result.success {
                ActionStatus::Succeeded(result.message.clone())
            } else {
                ActionStatus::Failed(result.message.clone())
            };
        }
    }

    /// Schedules the auto-clear of batch `generation` after its last result.
    ///
    /// The timer runs on the current tokio runtime. Without one the entries
    /// stay until the next batch or an explicit [`clear`](Self::clear).
    pub fn finish(&self, generation: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("[ActionFeedback] No tokio runtime, auto-clear skipped");
            return;
        };

        let inner = self.inner.clone();
        let window = self.display_window;
        handle.spawn(async move {
            tokio::time::sleep(window).await;
            let mut state = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation {
                state.entries.clear();
            }
        });
    }

    /// Applies a whole batch of results, then schedules the auto-clear.
    pub fn complete(&self, generation: u64, results: &[ActionResult]) {
        for result in results {
            self.record(generation, result);
        }
        self.finish(generation);
    }

    pub fn entries(&self) -> Vec<ActionFeedbackEntry> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .is_empty()
    }

    /// Clears immediately and cancels any pending auto-clear.
    pub fn clear(&self) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        state.entries.clear();
    }
}
