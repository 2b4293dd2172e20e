//! Action execution ports.

mod executor;
mod navigator;

pub use executor::{ActionExecutor, ActionHandler, NoopExecutor};
pub use navigator::Navigator;
