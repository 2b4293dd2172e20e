//! Conversation-level rating prompt.

use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct PromptState {
    offered: bool,
    dismissed: bool,
    submitted: bool,
}

/// Decides when to offer the "rate this conversation" prompt.
///
/// Offered once, after `min_turns` completed turns. Never offered again
/// after dismissal or after conversation feedback was submitted.
#[derive(Debug)]
pub struct FeedbackPrompt {
    min_turns: usize,
    state: Mutex<PromptState>,
}

impl FeedbackPrompt {
    pub fn new(min_turns: usize) -> Self {
        Self {
            min_turns,
            state: Mutex::new(PromptState::default()),
        }
    }

    /// Called after each completed turn. Returns `true` when the prompt
    /// should appear now.
    pub fn on_turn_completed(&self, completed_turns: usize) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.offered || state.dismissed || state.submitted || completed_turns < self.min_turns {
            return false;
        }
        state.offered = true;
        true
    }

    pub fn is_visible(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.offered && !state.dismissed && !state.submitted
    }

    pub fn dismiss(&self) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).dismissed = true;
    }

    pub fn mark_submitted(&self) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).submitted = true;
    }

    pub fn reset(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = PromptState::default();
    }
}
