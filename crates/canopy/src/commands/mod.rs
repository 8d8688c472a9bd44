//! Command dispatch: bridges CLI args -> core view controller -> output.

pub mod auth;
pub mod config_cmd;
pub mod entity;
pub mod util;

use canopy_core::{Animal, ForestOfficer, Plant, Resource, Tree, Visitor};

use crate::cli::Command;
use crate::config::{self, Settings};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(args, settings).await,
        Command::Signup(args) => auth::signup(args, settings).await,
        Command::Logout => auth::logout(settings),
        Command::Whoami => auth::whoami(settings),

        records => {
            let session = config::stored_session();
            let client = config::connect(settings, session.as_ref())?;
            match records {
                Command::Animals(args) => entity::handle::<Animal>(client, args, settings).await,
                Command::Trees(args) => entity::handle::<Tree>(client, args, settings).await,
                Command::Plants(args) => entity::handle::<Plant>(client, args, settings).await,
                Command::Officers(args) => {
                    entity::handle::<ForestOfficer>(client, args, settings).await
                }
                Command::Visitors(args) => entity::handle::<Visitor>(client, args, settings).await,
                Command::Resources(args) => {
                    entity::handle::<Resource>(client, args, settings).await
                }
                // Handled above or before dispatch
                _ => unreachable!(),
            }
        }
    }
}
