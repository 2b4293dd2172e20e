//! Directive protocol.
//!
//! - `model`: `ActionDirective`, `ActionResult`, `ParsedReply`, known type tags
//! - `parser`: pure extraction of directives from assistant text

mod model;
mod parser;

pub use model::{ActionDirective, ActionResult, ParsedReply, action_types};
pub use parser::parse;
