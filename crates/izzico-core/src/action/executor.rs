//! Action execution ports.

use async_trait::async_trait;

use crate::directive::{ActionDirective, ActionResult};
use crate::error::Result;

/// Effect handler for one directive type.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Performs the effect and returns the user-facing success message.
    ///
    /// Errors are converted into a failed `ActionResult` by the executor; they
    /// never propagate past it.
    async fn handle(&self, directive: &ActionDirective) -> Result<String>;
}

/// Executes directive lists against the live application.
///
/// The executor is an optional collaborator. [`NoopExecutor`] stands in when
/// no execution context exists, so callers never branch on its presence.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// False when no execution context exists; directives are then never run.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether a handler exists for `action_type`.
    fn supports(&self, action_type: &str) -> bool;

    /// Executes a single directive. Never fails: every outcome is a result.
    async fn execute_action(&self, directive: &ActionDirective) -> ActionResult;

    /// Executes directives one after another in `sequence` order and returns
    /// exactly one result per directive.
    async fn execute_actions(&self, directives: &[ActionDirective]) -> Vec<ActionResult> {
        self.execute_actions_with(directives, &|_: &ActionResult| {}).await
    }

    /// Like [`ActionExecutor::execute_actions`], calling `on_result` as soon
    /// as each directive finishes.
    async fn execute_actions_with(
        &self,
        directives: &[ActionDirective],
        on_result: &(dyn for<'r> Fn(&'r ActionResult) + Send + Sync),
    ) -> Vec<ActionResult> {
        let mut ordered: Vec<&ActionDirective> = directives.iter().collect();
        ordered.sort_by_key(|d| d.sequence);

        let mut results = Vec::with_capacity(ordered.len());
        for directive in ordered {
            let result = self.execute_action(directive).await;
            on_result(&result);
            results.push(result);
        }
        results
    }
}

/// Executor used when the page provides no action context.
///
/// Supports nothing and executes nothing; the assistant message is still
/// displayed normally.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExecutor;

#[async_trait]
impl ActionExecutor for NoopExecutor {
    fn is_available(&self) -> bool {
        false
    }

    fn supports(&self, _action_type: &str) -> bool {
        false
    }

    async fn execute_action(&self, directive: &ActionDirective) -> ActionResult {
        ActionResult::failure(directive.sequence, "no action context available")
    }

    async fn execute_actions_with(
        &self,
        _directives: &[ActionDirective],
        _on_result: &(dyn for<'r> Fn(&'r ActionResult) + Send + Sync),
    ) -> Vec<ActionResult> {
        Vec::new()
    }
}
