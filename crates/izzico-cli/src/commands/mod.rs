pub mod config;
pub mod parse;
pub mod state;
pub mod utils;
