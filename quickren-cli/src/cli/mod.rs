pub mod args;
pub mod types;

pub use args::{Cli, Commands, FilterArgs, PatternArgs};
pub use types::{ListFormat, OutputFormat, PatternArg, PreviewArg};
