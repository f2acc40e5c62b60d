//! Command-line interface for lexdraft.

mod commands;
mod helpers;

pub use commands::{is_verbose, run};
