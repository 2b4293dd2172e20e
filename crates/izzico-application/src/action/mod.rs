//! Directive execution: handler registry, built-in handlers and progress
//! feedback.

mod feedback_board;
mod handlers;
mod page;
mod registry;

pub use feedback_board::{ActionFeedbackBoard, ActionFeedbackEntry, ActionStatus};
pub use handlers::{
    NavigateHandler, OpenModalHandler, SEARCH_PATH, SetFiltersHandler, StartTourHandler,
    parse_filters,
};
pub use page::{PageCallback, PageRegistry};
pub use registry::{ActionRegistry, UNSUPPORTED_ACTION};
