//! Conversation domain module.
//!
//! - `message`: finalized conversation messages (`Message`, `MessageRole`)
//! - `status`: per-turn lifecycle (`ConversationStatus`)
//! - `transport`: streaming transport port (`ConversationTransport`)

mod message;
mod status;
mod transport;

pub use message::{Message, MessageRole};
pub use status::ConversationStatus;
pub use transport::{ConversationTransport, TokenStream, TurnInput};
