//! `gallery edit` - change an image's title, description or tags.
//!
//! The edit form is pre-filled from the current record, so flags that are
//! left out keep their value. Passing an empty string clears the field.

use anyhow::Result;

use gallery::controller::Command;
use gallery::widgets::TextField;

use super::{Session, require_found};

/// Replacement values; `None` keeps the pre-filled value.
pub struct EditArgs<'a> {
    pub id: &'a str,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub tags: Option<&'a str>,
}

/// Execute the edit command.
pub async fn execute(session: &Session, args: EditArgs<'_>) -> Result<()> {
    session.load().await?;

    let controller = &session.controller;
    let ui = &session.ui;

    require_found(
        controller.handle(Command::Edit(args.id.to_string())).await,
        args.id,
    )?;

    if let Some(title) = args.title {
        ui.edit_title.set_value(title);
    }
    if let Some(description) = args.description {
        ui.edit_description.set_value(description);
    }
    if let Some(tags) = args.tags {
        ui.edit_tags.set_value(tags);
    }

    let outcome = controller.handle(Command::SaveEdit).await;
    session.finish(outcome)
}
