//! Conversation state machine: turns, directive execution, feedback and
//! close.

use crate::action::ActionFeedbackBoard;
use crate::feedback::{FeedbackPrompt, FeedbackTracker, RateOutcome};
use crate::session::WidgetSession;
use futures::StreamExt;
use izzico_core::action::{ActionExecutor, NoopExecutor};
use izzico_core::clock::Clock;
use izzico_core::config::AssistantConfig;
use izzico_core::conversation::{
    ConversationStatus, ConversationTransport, Message, MessageRole, TurnInput,
};
use izzico_core::directive::{ActionResult, parse};
use izzico_core::feedback::{
    FeedbackClient, FeedbackSubmission, Suggestion, SuggestionCategory, SuggestionPriority,
    Valence,
};
use izzico_core::session_state::SessionStateRepository;
use izzico_core::{AssistantError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Result of a submitted turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply was finalized. `results` is empty when nothing was executed.
    Completed {
        message: Message,
        results: Vec<ActionResult>,
    },
    /// The transport failed; the error is also exposed by `last_error`.
    Failed { error: String },
    /// The conversation was closed while the reply was streaming.
    Discarded,
}

#[derive(Debug)]
struct ControllerState {
    conversation_id: String,
    status: ConversationStatus,
    messages: Vec<Message>,
    draft: String,
    last_error: Option<String>,
    turn_count: usize,
    /// Id of the turn allowed to write the draft and finalize.
    active_turn: Option<u64>,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            conversation_id: Uuid::new_v4().to_string(),
            status: ConversationStatus::Idle,
            messages: Vec::new(),
            draft: String::new(),
            last_error: None,
            turn_count: 0,
            active_turn: None,
        }
    }

    fn owns(&self, turn: u64) -> bool {
        self.active_turn == Some(turn) && self.status.is_busy()
    }
}

/// Drives one assistant widget.
///
/// # Turn lifecycle
///
/// ```text
///   Idle ──submit──▶ Submitted ──first token──▶ Streaming ──finish──▶ Idle
///     ▲                  │                          │
///     └──── error ───────┴──────────────────────────┘
///
///   any ──close──▶ Ended ──open──▶ Idle
/// ```
///
/// On finish the reply is parsed, stored with its clean text, and its
/// directives are handed to the executor. When a directive may unload the
/// page the widget state is saved open before execution starts.
///
/// Each submit gets a fresh turn id. A stream that outlives its turn, for
/// example across `close` and `open`, is dropped without touching the
/// current conversation.
pub struct ConversationController {
    transport: Arc<dyn ConversationTransport>,
    executor: Arc<dyn ActionExecutor>,
    feedback_client: Arc<dyn FeedbackClient>,
    clock: Arc<dyn Clock>,
    session: Arc<WidgetSession>,
    tracker: FeedbackTracker,
    prompt: FeedbackPrompt,
    board: ActionFeedbackBoard,
    state: Mutex<ControllerState>,
    next_turn: AtomicU64,
}

impl ConversationController {
    /// Creates a controller without an execution context.
    pub fn new(
        transport: Arc<dyn ConversationTransport>,
        feedback_client: Arc<dyn FeedbackClient>,
        repository: Arc<dyn SessionStateRepository>,
        clock: Arc<dyn Clock>,
        config: &AssistantConfig,
    ) -> Self {
        let session = Arc::new(WidgetSession::new(repository, clock.clone()));
        let tracker = FeedbackTracker::new(feedback_client.clone(), session.clone(), clock.clone());
        Self {
            transport,
            executor: Arc::new(NoopExecutor),
            feedback_client,
            clock,
            session,
            tracker,
            prompt: FeedbackPrompt::new(config.feedback_prompt_min_turns),
            board: ActionFeedbackBoard::new(config.action_feedback_display()),
            state: Mutex::new(ControllerState::new()),
            next_turn: AtomicU64::new(1),
        }
    }

    /// Attaches the page's action execution context.
    pub fn with_executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = executor;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Widget lifecycle
    // ========================================================================

    /// Restores persisted widget state on first mount.
    ///
    /// Returns whether the widget should be displayed open.
    pub fn mount(&self) -> bool {
        self.session.initialize();
        self.session.is_open()
    }

    /// Opens the panel. Reopening after `close` starts a new conversation.
    pub fn open(&self) {
        self.session.initialize();
        {
            let mut state = self.lock();
            if state.status == ConversationStatus::Ended {
                *state = ControllerState::new();
            }
        }
        self.session.set_open(true);
    }

    /// Hides the panel without ending the conversation.
    pub fn hide(&self) {
        self.session.set_open(false);
    }

    // ========================================================================
    // Turns
    // ========================================================================

    /// Sends `text` and drives the turn to completion.
    ///
    /// # Errors
    ///
    /// `InvalidState` when the text is blank, a turn is already in progress,
    /// or the conversation has ended. Transport failures are not errors here:
    /// they come back as [`TurnOutcome::Failed`].
    ///
    /// Must run inside a tokio runtime for the action board to auto-clear.
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::invalid_state("message cannot be empty"));
        }

        let turn = self.next_turn.fetch_add(1, Ordering::Relaxed);
        let input = {
            let mut state = self.lock();
            match state.status {
                ConversationStatus::Ended => {
                    return Err(AssistantError::invalid_state("conversation has ended"));
                }
                status if status.is_busy() => {
                    return Err(AssistantError::invalid_state("a turn is already in progress"));
                }
                _ => {}
            }

            let input = TurnInput {
                conversation_id: state.conversation_id.clone(),
                text: text.to_string(),
                history: state.messages.clone(),
            };
            state
                .messages
                .push(Message::user(Uuid::new_v4().to_string(), text, self.clock.now()));
            state.status = ConversationStatus::Submitted;
            state.active_turn = Some(turn);
            state.draft.clear();
            state.last_error = None;
            input
        };
        tracing::debug!("[Conversation] Turn submitted ({})", input.conversation_id);

        let mut stream = match self.transport.send(input).await {
            Ok(stream) => stream,
            Err(e) => return Ok(self.fail_turn(turn, e)),
        };

        while let Some(item) = stream.next().await {
            match item {
                Ok(token) => {
                    let mut state = self.lock();
                    if !state.owns(turn) {
                        tracing::debug!("[Conversation] Dropping stream of stale turn {}", turn);
                        return Ok(TurnOutcome::Discarded);
                    }
                    state.status = ConversationStatus::Streaming;
                    state.draft.push_str(&token);
                }
                Err(e) => return Ok(self.fail_turn(turn, e)),
            }
        }

        Ok(self.finish_turn(turn).await)
    }

    fn fail_turn(&self, turn: u64, error: AssistantError) -> TurnOutcome {
        let mut state = self.lock();
        if !state.owns(turn) {
            return TurnOutcome::Discarded;
        }
        tracing::warn!("[Conversation] Turn failed: {}", error);
        let message = error.to_string();
        state.status = ConversationStatus::Idle;
        state.active_turn = None;
        state.draft.clear();
        state.last_error = Some(message.clone());
        TurnOutcome::Failed { error: message }
    }

    async fn finish_turn(&self, turn: u64) -> TurnOutcome {
        let (message, parsed, turn_count) = {
            let mut state = self.lock();
            if !state.owns(turn) {
                return TurnOutcome::Discarded;
            }
            let raw_text = std::mem::take(&mut state.draft);
            let parsed = parse(&raw_text);
            let message = Message::assistant(
                Uuid::new_v4().to_string(),
                raw_text,
                parsed.clean_text.clone(),
                self.clock.now(),
            );
            state.messages.push(message.clone());
            state.turn_count += 1;
            state.status = ConversationStatus::Idle;
            state.active_turn = None;
            (message, parsed, state.turn_count)
        };
        tracing::debug!(
            "[Conversation] Turn {} finished with {} directive(s)",
            turn_count,
            parsed.directives.len()
        );

        if self.prompt.on_turn_completed(turn_count) {
            tracing::debug!("[Conversation] Offering feedback prompt");
        }

        if parsed.directives.is_empty() || !self.executor.is_available() {
            return TurnOutcome::Completed {
                message,
                results: Vec::new(),
            };
        }

        if parsed.unloads_page() {
            self.session.save_for_navigation();
        }

        let board = &self.board;
        let generation = board.begin(&parsed.directives);
        let on_result = |result: &ActionResult| board.record(generation, result);
        let results = self
            .executor
            .execute_actions_with(&parsed.directives, &on_result)
            .await;
        board.finish(generation);

        TurnOutcome::Completed { message, results }
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    /// Rates one assistant message. See [`FeedbackTracker::rate`].
    pub async fn rate(&self, message_id: &str, valence: Valence) -> Result<RateOutcome> {
        let is_assistant_message = self
            .lock()
            .messages
            .iter()
            .any(|m| m.id() == message_id && m.role() == MessageRole::Assistant);
        if !is_assistant_message && !self.session.is_rated(message_id) {
            return Err(AssistantError::invalid_state(format!(
                "no assistant message {}",
                message_id
            )));
        }
        Ok(self.tracker.rate(message_id, valence).await)
    }

    pub fn is_rating_disabled(&self, message_id: &str) -> bool {
        self.tracker.is_rating_disabled(message_id)
    }

    pub fn is_feedback_prompt_visible(&self) -> bool {
        self.prompt.is_visible()
    }

    pub fn dismiss_feedback_prompt(&self) {
        self.prompt.dismiss();
    }

    /// Submits a 1 to 5 rating of the whole conversation.
    ///
    /// Failures are logged and returned for a non-blocking notice; the
    /// prompt stays available for another attempt.
    pub async fn submit_conversation_feedback(&self, rating: u8, text: Option<String>) -> Result<()> {
        let submission = FeedbackSubmission::conversation(rating, text)?;
        match self.feedback_client.submit_feedback(submission).await {
            Ok(()) => {
                self.prompt.mark_submitted();
                tracing::info!("[Feedback] Conversation rated {}", rating);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[Feedback] Conversation feedback failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn submit_suggestion(
        &self,
        text: &str,
        category: SuggestionCategory,
        priority: SuggestionPriority,
    ) -> Result<()> {
        let suggestion = Suggestion::new(text, category, priority)?;
        self.feedback_client
            .submit_suggestion(suggestion)
            .await
            .inspect_err(|e| tracing::warn!("[Feedback] Suggestion failed: {}", e))
    }

    // ========================================================================
    // Close
    // ========================================================================

    /// Ends the conversation.
    ///
    /// Notifies the feedback collaborator when at least one turn happened,
    /// then clears persisted widget state and all local feedback state.
    pub async fn close(&self) {
        let (conversation_id, turn_count) = {
            let mut state = self.lock();
            state.status = ConversationStatus::Ended;
            state.active_turn = None;
            state.draft.clear();
            (state.conversation_id.clone(), state.turn_count)
        };

        if turn_count > 0 {
            if let Err(e) = self
                .feedback_client
                .end_conversation(&conversation_id, turn_count)
                .await
            {
                tracing::warn!("[Conversation] Failed to report end of {}: {}", conversation_id, e);
            }
        }

        self.session.end();
        self.tracker.reset();
        self.prompt.reset();
        self.board.clear();

        let mut state = self.lock();
        state.messages.clear();
        state.last_error = None;
        state.turn_count = 0;
        tracing::info!("[Conversation] Closed {} after {} turn(s)", conversation_id, turn_count);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn conversation_id(&self) -> String {
        self.lock().conversation_id.clone()
    }

    pub fn status(&self) -> ConversationStatus {
        self.lock().status
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Text streamed so far for the turn in progress.
    pub fn draft(&self) -> String {
        self.lock().draft.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn turn_count(&self) -> usize {
        self.lock().turn_count
    }

    pub fn action_board(&self) -> &ActionFeedbackBoard {
        &self.board
    }

    pub fn session(&self) -> &Arc<WidgetSession> {
        &self.session
    }
}
