//! `gallery delete` - delete an image after confirmation.

use anyhow::Result;

use gallery::controller::{Command, Outcome};

use super::{Session, require_found};

/// Execute the delete command.
pub async fn execute(session: &Session, id: &str) -> Result<()> {
    session.load().await?;

    let outcome = require_found(
        session.controller.handle(Command::Delete(id.to_string())).await,
        id,
    )?;
    if outcome == Outcome::Declined {
        println!("Cancelled.");
    }

    session.finish(outcome)
}
