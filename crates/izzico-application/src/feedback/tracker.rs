//! Per-message rating with idempotency.

use crate::session::WidgetSession;
use izzico_core::clock::Clock;
use izzico_core::feedback::{FeedbackClient, FeedbackRecord, FeedbackSubmission, Valence};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Outcome of [`FeedbackTracker::rate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    /// The rating was accepted by the feedback collaborator.
    Submitted,
    /// The message was rated before; nothing was sent.
    AlreadyRated,
    /// A rating for this message is still being submitted; nothing was sent.
    InFlight,
    /// Submission failed. The message stays unrated so the user can retry.
    Failed,
}

/// Guarantees at most one successful rating submission per message.
///
/// The rated and in-flight checks happen synchronously before any await, so
/// repeated clicks never race each other onto the network.
pub struct FeedbackTracker {
    client: Arc<dyn FeedbackClient>,
    session: Arc<WidgetSession>,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<HashSet<String>>,
}

impl FeedbackTracker {
    pub fn new(
        client: Arc<dyn FeedbackClient>,
        session: Arc<WidgetSession>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            session,
            clock,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub async fn rate(&self, message_id: &str, valence: Valence) -> RateOutcome {
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if self.session.is_rated(message_id) {
                return RateOutcome::AlreadyRated;
            }
            if !in_flight.insert(message_id.to_string()) {
                return RateOutcome::InFlight;
            }
        }

        let record = FeedbackRecord {
            message_id: message_id.to_string(),
            valence,
            submitted_at: self.clock.now(),
        };
        let result = self
            .client
            .submit_feedback(FeedbackSubmission::from(&record))
            .await;

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let still_tracked = in_flight.remove(message_id);
        match result {
            Ok(()) => {
                if still_tracked {
                    self.session.mark_rated(message_id);
                }
                tracing::info!("[Feedback] Rated message {} ({:?})", message_id, valence);
                RateOutcome::Submitted
            }
            Err(e) => {
                tracing::warn!("[Feedback] Failed to rate message {}: {}", message_id, e);
                RateOutcome::Failed
            }
        }
    }

    /// Whether rating controls for `message_id` should be disabled.
    pub fn is_rating_disabled(&self, message_id: &str) -> bool {
        let in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.contains(message_id) || self.session.is_rated(message_id)
    }

    /// Forgets in-flight submissions. Ratings completing afterwards are not
    /// recorded.
    pub fn reset(&self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
