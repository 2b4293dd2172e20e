mod controller;

pub use controller::{ConversationController, TurnOutcome};
