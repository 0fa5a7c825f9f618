//! CLI domain: parse, route, output, and presentation only.
//! No registry logic; a single route table dispatches to the warden service.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, DomainCommands, SceneCommands, ZoneCommands};
pub use route::RunContext;
