pub mod commands;

pub use commands::{Cli, Command, OrphansArg, OutputFormat, SyntaxArg};
