//! Handler registry and sequential directive executor.

use super::handlers::{NavigateHandler, OpenModalHandler, SetFiltersHandler, StartTourHandler};
use super::page::PageRegistry;
use async_trait::async_trait;
use futures::FutureExt;
use izzico_core::AssistantError;
use izzico_core::action::{ActionExecutor, ActionHandler, Navigator};
use izzico_core::config::AssistantConfig;
use izzico_core::directive::{ActionDirective, ActionResult, action_types};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

/// Message reported for a directive type without a handler.
pub const UNSUPPORTED_ACTION: &str = "unsupported action";

/// Maps directive types to handlers and executes directive batches.
///
/// Every directive yields exactly one [`ActionResult`]. A missing handler,
/// a handler error and a handler panic all become failed results, and the
/// rest of the batch still runs.
pub struct ActionRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn ActionHandler>>>,
    page: Arc<PageRegistry>,
    step_delay: Duration,
    last_result: Mutex<Option<ActionResult>>,
}

impl ActionRegistry {
    /// Creates an empty registry pausing `step_delay` between directives.
    pub fn new(step_delay: Duration) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            page: Arc::new(PageRegistry::new()),
            step_delay,
            last_result: Mutex::new(None),
        }
    }

    /// Creates a registry with the `navigate`, `setFilters`, `openModal`
    /// and `startTour` handlers wired to `navigator`.
    pub fn with_builtin_handlers(navigator: Arc<dyn Navigator>, config: &AssistantConfig) -> Self {
        let registry = Self::new(config.action_step_delay());
        let page = registry.page.clone();

        registry.register(
            action_types::NAVIGATE,
            Arc::new(NavigateHandler::new(navigator.clone())),
        );
        registry.register(
            action_types::SET_FILTERS,
            Arc::new(SetFiltersHandler::new(navigator, page.clone())),
        );
        registry.register(
            action_types::OPEN_MODAL,
            Arc::new(OpenModalHandler::new(page.clone())),
        );
        registry.register(action_types::START_TOUR, Arc::new(StartTourHandler::new(page)));
        registry
    }

    /// Registers `handler` for `action_type`, replacing any previous one.
    pub fn register(&self, action_type: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.insert(action_type.into(), handler);
    }

    pub fn unregister(&self, action_type: &str) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.remove(action_type);
    }

    pub fn registered_types(&self) -> Vec<String> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        let mut types: Vec<String> = handlers.keys().cloned().collect();
        types.sort();
        types
    }

    /// Modals, tours and pending filters of the current page.
    pub fn page(&self) -> &Arc<PageRegistry> {
        &self.page
    }

    /// Result of the most recently executed directive.
    pub fn last_result(&self) -> Option<ActionResult> {
        self.last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn handler(&self, action_type: &str) -> Option<Arc<dyn ActionHandler>> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(action_type).cloned()
    }
}

fn failure_message(error: &AssistantError) -> String {
    match error {
        AssistantError::Handler(message) => message.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ActionExecutor for ActionRegistry {
    fn supports(&self, action_type: &str) -> bool {
        self.handler(action_type).is_some()
    }

    async fn execute_action(&self, directive: &ActionDirective) -> ActionResult {
        let result = match self.handler(&directive.action_type) {
            None => {
                let error = AssistantError::UnsupportedAction(directive.action_type.clone());
                tracing::warn!("[Action] #{}: {}", directive.sequence, error);
                ActionResult::failure(directive.sequence, UNSUPPORTED_ACTION)
            }
            Some(handler) => {
                match AssertUnwindSafe(handler.handle(directive))
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(message)) => {
                        tracing::debug!(
                            "[Action] #{} {} succeeded: {}",
                            directive.sequence,
                            directive.action_type,
                            message
                        );
                        ActionResult::success(directive.sequence, message)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(
                            "[Action] #{} {} failed: {}",
                            directive.sequence,
                            directive.action_type,
                            e
                        );
                        ActionResult::failure(directive.sequence, failure_message(&e))
                    }
                    Err(_) => {
                        tracing::error!(
                            "[Action] #{} {} handler panicked",
                            directive.sequence,
                            directive.action_type
                        );
                        ActionResult::failure(
                            directive.sequence,
                            format!("{} failed unexpectedly", directive.action_type),
                        )
                    }
                }
            }
        };

        *self.last_result.lock().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
        result
    }

    async fn execute_actions_with(
        &self,
        directives: &[ActionDirective],
        on_result: &(dyn for<'r> Fn(&'r ActionResult) + Send + Sync),
    ) -> Vec<ActionResult> {
        let mut ordered: Vec<&ActionDirective> = directives.iter().collect();
        ordered.sort_by_key(|d| d.sequence);

        let mut results = Vec::with_capacity(ordered.len());
        for (i, directive) in ordered.into_iter().enumerate() {
            if i > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
            let result = self.execute_action(directive).await;
            on_result(&result);
            results.push(result);
        }
        results
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("handlers", &self.registered_types())
            .field("step_delay", &self.step_delay)
            .finish()
    }
}
