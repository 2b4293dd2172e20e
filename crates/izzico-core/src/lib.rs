//! Domain layer for the IzzIco in-app assistant.
//!
//! Holds the directive protocol (pure parsing of assistant replies), the data
//! model shared by the widget, and the ports implemented by infrastructure and
//! by the hosting application.

pub mod action;
pub mod clock;
pub mod config;
pub mod conversation;
pub mod directive;
pub mod error;
pub mod feedback;
pub mod session_state;
pub mod storage;

// Re-export common error type
pub use error::{AssistantError, Result};
