//! End-to-end turn handling with mock collaborators.

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, unbounded};
use izzico_application::action::{ActionRegistry, ActionStatus, SEARCH_PATH, UNSUPPORTED_ACTION};
use izzico_application::{ConversationController, RateOutcome, TurnOutcome};
use izzico_core::action::Navigator;
use izzico_core::clock::{Clock, ManualClock};
use izzico_core::config::AssistantConfig;
use izzico_core::conversation::{
    ConversationStatus, ConversationTransport, Message, MessageRole, TokenStream, TurnInput,
};
use izzico_core::directive::ActionResult;
use izzico_core::feedback::{
    FeedbackClient, FeedbackSubmission, FeedbackType, Suggestion, SuggestionCategory,
    SuggestionPriority, Valence,
};
use izzico_core::session_state::SessionStateRepository;
use izzico_core::storage::KeyValueStore;
use izzico_core::{AssistantError, Result};
use izzico_infrastructure::{InMemoryKeyValueStore, KvSessionStateRepository};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock collaborators
// ============================================================================

enum Script {
    Reply(Vec<Result<String>>),
    /// Tokens arrive whenever the test sends them; the stream ends when the
    /// sender is dropped.
    Live(UnboundedReceiver<Result<String>>),
    SendError,
}

#[derive(Default)]
struct ScriptedTransport {
    scripts: Mutex<VecDeque<Script>>,
    inputs: Mutex<Vec<TurnInput>>,
}

impl ScriptedTransport {
    fn reply(&self, tokens: &[&str]) {
        let tokens = tokens.iter().map(|t| Ok(t.to_string())).collect();
        self.scripts.lock().unwrap().push_back(Script::Reply(tokens));
    }

    fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }
}

#[async_trait]
impl ConversationTransport for ScriptedTransport {
    async fn send(&self, input: TurnInput) -> Result<TokenStream> {
        self.inputs.lock().unwrap().push(input);
        match self.scripts.lock().unwrap().pop_front() {
            Some(Script::Reply(items)) => Ok(futures::stream::iter(items).boxed()),
            Some(Script::Live(receiver)) => Ok(receiver.boxed()),
            Some(Script::SendError) | None => Err(AssistantError::transport("connection refused")),
        }
    }
}

#[derive(Default)]
struct CountingFeedbackClient {
    submissions: Mutex<Vec<FeedbackSubmission>>,
    suggestions: Mutex<Vec<Suggestion>>,
    ended: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl FeedbackClient for CountingFeedbackClient {
    async fn submit_feedback(&self, submission: FeedbackSubmission) -> Result<()> {
        self.submissions.lock().unwrap().push(submission);
        Ok(())
    }

    async fn submit_suggestion(&self, suggestion: Suggestion) -> Result<()> {
        self.suggestions.lock().unwrap().push(suggestion);
        Ok(())
    }

    async fn end_conversation(&self, conversation_id: &str, turn_count: usize) -> Result<()> {
        self.ended
            .lock()
            .unwrap()
            .push((conversation_id.to_string(), turn_count));
        Ok(())
    }
}

/// Records pushed paths and what was persisted at the moment of each push.
struct RecordingNavigator {
    store: Arc<InMemoryKeyValueStore>,
    current: Mutex<String>,
    pushes: Mutex<Vec<(String, Option<String>)>>,
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn push(&self, path: &str) -> Result<()> {
        let persisted = self.store.get(&AssistantConfig::default().storage_key)?;
        self.pushes
            .lock()
            .unwrap()
            .push((path.to_string(), persisted));
        *self.current.lock().unwrap() = path.to_string();
        Ok(())
    }
}

struct Fixture {
    controller: ConversationController,
    transport: Arc<ScriptedTransport>,
    feedback: Arc<CountingFeedbackClient>,
    navigator: Arc<RecordingNavigator>,
    registry: Arc<ActionRegistry>,
    repository: Arc<KvSessionStateRepository>,
    clock: Arc<ManualClock>,
}

fn fixture(with_executor: bool) -> Fixture {
    let config = AssistantConfig::default();
    let store = Arc::new(InMemoryKeyValueStore::new());
    let repository = Arc::new(KvSessionStateRepository::new(store.clone(), &config).unwrap());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let transport = Arc::new(ScriptedTransport::default());
    let feedback = Arc::new(CountingFeedbackClient::default());
    let navigator = Arc::new(RecordingNavigator {
        store,
        current: Mutex::new("/".to_string()),
        pushes: Mutex::new(Vec::new()),
    });
    let registry = Arc::new(ActionRegistry::with_builtin_handlers(
        navigator.clone(),
        &config,
    ));

    let mut controller = ConversationController::new(
        transport.clone(),
        feedback.clone(),
        repository.clone(),
        clock.clone(),
        &config,
    );
    if with_executor {
        controller = controller.with_executor(registry.clone());
    }

    Fixture {
        controller,
        transport,
        feedback,
        navigator,
        registry,
        repository,
        clock,
    }
}

fn completed(outcome: TurnOutcome) -> (Message, Vec<ActionResult>) {
    match outcome {
        TurnOutcome::Completed { message, results } => (message, results),
        other => panic!("expected a completed turn, got {:?}", other),
    }
}

fn persisted_is_open(persisted: &Option<String>) -> bool {
    let value: serde_json::Value = serde_json::from_str(persisted.as_ref().unwrap()).unwrap();
    value["isOpen"] == true
}

fn reload(f: &Fixture) -> ConversationController {
    ConversationController::new(
        f.transport.clone(),
        f.feedback.clone(),
        f.repository.clone(),
        f.clock.clone(),
        &AssistantConfig::default(),
    )
}

// ============================================================================
// Turns
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_navigation_saves_state_before_navigating() {
    let f = fixture(true);
    f.controller.open();
    f.transport.reply(&[
        "Let me help. ",
        "[navigate:/dashboard/owner/leases:View your leases]",
    ]);

    let (message, results) = completed(f.controller.submit("Where are my leases?").await.unwrap());

    assert_eq!(message.clean_text(), "Let me help.");
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].message, "Navigating to View your leases");

    let pushes = f.navigator.pushes.lock().unwrap();
    assert_eq!(pushes.len(), 1);
    let (path, persisted) = &pushes[0];
    assert_eq!(path, "/dashboard/owner/leases");
    assert!(persisted_is_open(persisted));
}

#[tokio::test(start_paused = true)]
async fn test_set_filters_saves_state_before_leaving_page() {
    let f = fixture(true);
    f.controller.open();
    // The record written by `open` is older than the TTL by now.
    f.clock.advance(chrono::Duration::minutes(40));
    f.transport.reply(&["Rooms in Lyon: [setFilters:city=Lyon,maxBudget=700]"]);

    let (_, results) = completed(f.controller.submit("rooms in Lyon").await.unwrap());
    assert!(results[0].success);

    {
        let pushes = f.navigator.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, SEARCH_PATH);
        assert!(persisted_is_open(&pushes[0].1));
    }
    assert!(reload(&f).mount());
}

#[tokio::test(start_paused = true)]
async fn test_hidden_widget_reopens_after_navigation() {
    let f = fixture(true);
    f.controller.open();
    f.transport.reply(&["Your leases: [navigate:/dashboard/owner/leases]"]);
    f.controller.hide();

    completed(f.controller.submit("leases").await.unwrap());

    {
        let pushes = f.navigator.pushes.lock().unwrap();
        assert_eq!(pushes.len(), 1);
        assert!(persisted_is_open(&pushes[0].1));
    }
    assert!(f.controller.session().is_open());
    assert!(reload(&f).mount());
}

#[tokio::test(start_paused = true)]
async fn test_action_board_updates_as_each_directive_finishes() {
    let f = fixture(true);
    f.controller.open();
    f.transport.reply(&["[navigate:/a] [navigate:/b] [navigate:/c]"]);

    // Directives run at 0, 300 and 600 ms.
    let sample = async {
        tokio::time::sleep(Duration::from_millis(450)).await;
        f.controller.action_board().entries()
    };
    let (outcome, mid_batch) = tokio::join!(f.controller.submit("tour"), sample);

    let statuses: Vec<_> = mid_batch.iter().map(|e| &e.status).collect();
    assert!(matches!(statuses[0], ActionStatus::Succeeded(_)));
    assert!(matches!(statuses[1], ActionStatus::Succeeded(_)));
    assert_eq!(statuses[2], &ActionStatus::Pending);

    let (_, results) = completed(outcome.unwrap());
    assert_eq!(results.len(), 3);
    assert!(
        f.controller
            .action_board()
            .entries()
            .iter()
            .all(|e| matches!(e.status, ActionStatus::Succeeded(_)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_isolated_per_directive() {
    let f = fixture(true);
    f.registry
        .page()
        .register_tour("onboarding", Arc::new(|| Ok(())));
    f.controller.open();
    f.transport
        .reply(&["Sure: [navigate:/search] [fly:moon] [startTour:onboarding]"]);

    let (_, results) = completed(f.controller.submit("show me around").await.unwrap());

    assert_eq!(results.len(), 3);
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(results[1].message, UNSUPPORTED_ACTION);
    assert!(results[2].success);

    let board = f.controller.action_board().entries();
    assert_eq!(board.len(), 3);
    assert!(matches!(board[1].status, ActionStatus::Failed(_)));
}

#[tokio::test(start_paused = true)]
async fn test_action_feedback_clears_after_window() {
    let f = fixture(true);
    f.controller.open();
    f.transport.reply(&["[navigate:/search]"]);

    f.controller.submit("search").await.unwrap();
    assert_eq!(f.controller.action_board().entries().len(), 1);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(f.controller.action_board().is_empty());
}

#[tokio::test]
async fn test_without_executor_message_is_still_displayed() {
    let f = fixture(false);
    f.controller.open();
    f.transport.reply(&["Go here [navigate:/search]"]);

    let (message, results) = completed(f.controller.submit("help").await.unwrap());

    assert_eq!(message.clean_text(), "Go here");
    assert!(results.is_empty());
    assert!(f.navigator.pushes.lock().unwrap().is_empty());
    assert!(f.controller.action_board().is_empty());
}

#[tokio::test]
async fn test_stream_error_sets_last_error_and_returns_to_idle() {
    let f = fixture(true);
    f.controller.open();
    f.transport.push(Script::Reply(vec![
        Ok("partial [navigate:/search]".to_string()),
        Err(AssistantError::transport("stream reset")),
    ]));

    let outcome = f.controller.submit("hello").await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Failed { .. }));
    assert_eq!(f.controller.status(), ConversationStatus::Idle);
    assert!(f.controller.last_error().unwrap().contains("stream reset"));
    assert!(f.navigator.pushes.lock().unwrap().is_empty());
    assert_eq!(f.controller.turn_count(), 0);
    assert_eq!(f.controller.draft(), "");

    f.transport.reply(&["Recovered."]);
    completed(f.controller.submit("again").await.unwrap());
    assert_eq!(f.controller.last_error(), None);
}

#[tokio::test]
async fn test_send_error_is_not_fatal() {
    let f = fixture(true);
    f.controller.open();
    f.transport.push(Script::SendError);

    let outcome = f.controller.submit("hello").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Failed { .. }));
    assert_eq!(f.controller.status(), ConversationStatus::Idle);
}

#[tokio::test]
async fn test_history_carries_clean_text() {
    let f = fixture(false);
    f.controller.open();
    f.transport.reply(&["First [navigate:/a]"]);
    f.transport.reply(&["Second"]);

    f.controller.submit("one").await.unwrap();
    f.controller.submit("two").await.unwrap();

    let inputs = f.transport.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[1].history.len(), 2);
    assert_eq!(inputs[1].history[1].clean_text(), "First");
    assert_eq!(inputs[0].conversation_id, inputs[1].conversation_id);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let f = fixture(false);
    f.controller.open();
    assert!(f.controller.submit("   ").await.is_err());
    assert!(f.transport.inputs.lock().unwrap().is_empty());
}

// ============================================================================
// Feedback
// ============================================================================

#[tokio::test]
async fn test_rating_twice_submits_once() {
    let f = fixture(false);
    f.controller.open();
    f.transport.reply(&["Here you go."]);
    let (message, _) = completed(f.controller.submit("hi").await.unwrap());

    let first = f.controller.rate(message.id(), Valence::Up).await.unwrap();
    let second = f.controller.rate(message.id(), Valence::Up).await.unwrap();

    assert_eq!(first, RateOutcome::Submitted);
    assert_eq!(second, RateOutcome::AlreadyRated);
    assert_eq!(f.feedback.submissions.lock().unwrap().len(), 1);
    assert_eq!(
        f.controller.session().rated_message_ids().into_iter().collect::<Vec<_>>(),
        vec![message.id().to_string()]
    );
    assert!(f.controller.is_rating_disabled(message.id()));
}

#[tokio::test]
async fn test_rating_unknown_message_is_rejected() {
    let f = fixture(false);
    f.controller.open();
    assert!(f.controller.rate("missing", Valence::Up).await.is_err());
}

#[tokio::test]
async fn test_feedback_prompt_after_three_turns() {
    let f = fixture(false);
    f.controller.open();
    for _ in 0..3 {
        f.transport.reply(&["ok"]);
    }

    f.controller.submit("1").await.unwrap();
    f.controller.submit("2").await.unwrap();
    assert!(!f.controller.is_feedback_prompt_visible());

    f.controller.submit("3").await.unwrap();
    assert!(f.controller.is_feedback_prompt_visible());

    f.controller
        .submit_conversation_feedback(4, Some("Very useful".to_string()))
        .await
        .unwrap();
    assert!(!f.controller.is_feedback_prompt_visible());
    let submissions = f.feedback.submissions.lock().unwrap();
    assert_eq!(submissions[0].feedback_type, FeedbackType::Conversation);
}

#[tokio::test]
async fn test_suggestion_is_forwarded() {
    let f = fixture(false);
    f.controller
        .submit_suggestion("Dark mode", SuggestionCategory::Feature, SuggestionPriority::Low)
        .await
        .unwrap();
    assert_eq!(f.feedback.suggestions.lock().unwrap().len(), 1);
    assert!(
        f.controller
            .submit_suggestion("", SuggestionCategory::Bug, SuggestionPriority::High)
            .await
            .is_err()
    );
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_close_clears_state_and_reports_end() {
    let f = fixture(false);
    f.controller.open();
    f.transport.reply(&["Hello!"]);
    let (message, _) = completed(f.controller.submit("hi").await.unwrap());
    f.controller.rate(message.id(), Valence::Up).await.unwrap();
    let conversation_id = f.controller.conversation_id();

    f.controller.close().await;

    assert_eq!(f.controller.status(), ConversationStatus::Ended);
    assert!(f.controller.messages().is_empty());
    assert!(f.controller.session().rated_message_ids().is_empty());
    assert_eq!(f.repository.restore(f.clock.now()), None);
    assert_eq!(
        f.feedback.ended.lock().unwrap().as_slice(),
        &[(conversation_id.clone(), 1)]
    );
    assert!(f.controller.submit("still there?").await.is_err());

    f.controller.open();
    assert_eq!(f.controller.status(), ConversationStatus::Idle);
    assert_ne!(f.controller.conversation_id(), conversation_id);
}

#[tokio::test]
async fn test_stream_from_closed_conversation_is_dropped() {
    let f = fixture(false);
    f.controller.open();

    let (stale_tx, stale_rx) = unbounded();
    let (fresh_tx, fresh_rx) = unbounded();
    stale_tx.unbounded_send(Ok("old ".to_string())).unwrap();
    fresh_tx.unbounded_send(Ok("fresh".to_string())).unwrap();
    f.transport.push(Script::Live(stale_rx));

    let stale = f.controller.submit("first");
    let fresh = async {
        while f.controller.draft() != "old " {
            tokio::task::yield_now().await;
        }
        f.controller.close().await;
        f.controller.open();
        f.transport.push(Script::Live(fresh_rx));
        f.controller.submit("second").await
    };
    let late_tokens = async {
        while f.controller.draft() != "fresh" {
            tokio::task::yield_now().await;
        }
        stale_tx.unbounded_send(Ok("hijack".to_string())).unwrap();
        drop(stale_tx);
        fresh_tx.unbounded_send(Ok(" reply".to_string())).unwrap();
        drop(fresh_tx);
    };
    let (stale, fresh, ()) = tokio::join!(stale, fresh, late_tokens);

    assert_eq!(stale.unwrap(), TurnOutcome::Discarded);
    let (message, _) = completed(fresh.unwrap());
    assert_eq!(message.clean_text(), "fresh reply");

    let messages = f.controller.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role(), MessageRole::User);
    assert_eq!(messages[1].clean_text(), "fresh reply");
    assert_eq!(f.controller.turn_count(), 1);
    assert_eq!(f.controller.status(), ConversationStatus::Idle);
}

#[tokio::test]
async fn test_close_without_turns_does_not_report_end() {
    let f = fixture(false);
    f.controller.open();
    f.controller.close().await;
    assert!(f.feedback.ended.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_mount_restores_open_widget_once() {
    let f = fixture(false);
    f.controller.open();
    f.transport.reply(&["Hi"]);
    let (message, _) = completed(f.controller.submit("hi").await.unwrap());
    f.controller.rate(message.id(), Valence::Down).await.unwrap();

    // Same storage, new widget instance (page reload).
    let reloaded = reload(&f);
    assert!(reloaded.mount());
    assert!(reloaded.session().is_rated(message.id()));
    assert_eq!(
        reloaded.rate(message.id(), Valence::Down).await.unwrap(),
        RateOutcome::AlreadyRated
    );

    reloaded.hide();
    assert!(!reloaded.mount());
}

#[tokio::test]
async fn test_stale_state_is_not_restored() {
    let f = fixture(false);
    f.controller.open();

    f.clock.advance(chrono::Duration::minutes(31));
    let reloaded = reload(&f);
    assert!(!reloaded.mount());
}
