//! Command dispatch: bridges CLI args -> session operations -> output formatting.

pub mod albums;
pub mod config_cmd;
pub mod photos;
pub mod tags;
pub mod upload;
pub mod util;

use albumkit_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Albums(args) => albums::handle(session, args, global).await,
        Command::Photos(args) => photos::handle(session, args, global).await,
        Command::Tags(args) => tags::handle(session, args, global).await,
        Command::Upload(args) => upload::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Config {
            message: "command does not use a server session".into(),
        }),
    }
}
