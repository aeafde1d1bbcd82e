//! CLI domain: parse, route, and output only.
//! No domain orchestration; single route table dispatches to the engine.

mod output;
mod parse;
mod route;

pub use output::{format_manifest_text, format_value, map_error};
pub use parse::{Cli, Commands, ContextArgs};
pub use route::RunContext;
