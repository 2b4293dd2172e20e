//! Rating idempotency and the conversation feedback prompt.

mod prompt;
mod tracker;

pub use prompt::FeedbackPrompt;
pub use tracker::{FeedbackTracker, RateOutcome};
