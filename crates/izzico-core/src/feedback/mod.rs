//! User feedback domain module.

mod client;
mod model;

pub use client::FeedbackClient;
pub use model::{
    FeedbackRecord, FeedbackSubmission, FeedbackType, Suggestion, SuggestionCategory,
    SuggestionPriority, Valence,
};
