//! Typed outbound IRC commands.
//!
//! [`Command`] renders to a single protocol line (without CRLF) through
//! its `Display` impl. The client's command API builds these and queues
//! the rendered text.

mod serialize;
pub mod subcommands;
mod types;

pub use subcommands::CapSubCommand;
pub use types::Command;
