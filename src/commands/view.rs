//! `gallery view` - show one image's details.

use anyhow::Result;

use gallery::controller::Command;
use gallery::ui;

use super::{Session, require_found};

/// Execute the view command.
pub async fn execute(session: &Session, id: &str) -> Result<()> {
    session.load().await?;

    let outcome = require_found(
        session.controller.handle(Command::View(id.to_string())).await,
        id,
    )?;
    if let Some(detail) = session.ui.detail.detail() {
        ui::print_detail(&detail);
    }

    session.finish(outcome)
}
