//! CLI domain: parse, route, and output mapping only.
//! No resource logic; a single route table dispatches to the client,
//! renderer, and persistence adapter.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{
    BlueprintCommands, Cli, Commands, ComposeCommands, FreezeArgs, FreezeCommands, ModuleCommands,
};
pub use route::RunContext;
