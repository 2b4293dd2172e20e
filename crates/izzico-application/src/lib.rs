//! Application layer for the izzico assistant widget.
//!
//! Wires the pure directive parser and the storage ports into the
//! behaviour of one widget instance: executing directives, tracking
//! ratings, and the conversation turn cycle.

pub mod action;
pub mod conversation;
pub mod feedback;
pub mod session;

pub use action::{ActionFeedbackBoard, ActionRegistry, PageRegistry};
pub use conversation::{ConversationController, TurnOutcome};
pub use feedback::{FeedbackPrompt, FeedbackTracker, RateOutcome};
pub use session::WidgetSession;
