//! Widget session state.

mod model;
mod repository;

pub use model::SessionState;
pub use repository::SessionStateRepository;
