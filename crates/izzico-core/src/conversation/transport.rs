//! Conversation transport port.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::error::Result;

/// Stream of text tokens for one assistant reply.
///
/// The stream ending without error is the "finish" event of the turn; an
/// `Err` item aborts the turn.
pub type TokenStream = BoxStream<'static, Result<String>>;

/// Input for a single turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnInput {
    pub conversation_id: String,
    /// The new user message.
    pub text: String,
    /// Finalized history preceding this turn (clean text only).
    pub history: Vec<Message>,
}

/// Streams assistant replies from the LLM backend.
#[async_trait]
pub trait ConversationTransport: Send + Sync {
    /// Sends a turn and returns the reply's token stream.
    async fn send(&self, input: TurnInput) -> Result<TokenStream>;
}
