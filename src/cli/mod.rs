mod commands;
pub mod repl;

pub use commands::{Cli, Commands};
