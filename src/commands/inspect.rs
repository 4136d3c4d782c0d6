//! `gallery inspect` - print one record as the server returns it.
//!
//! Skips the list and store entirely; useful when checking a record right
//! after another client changed it.

use anyhow::{Context, Result};

use gallery::api::GalleryApi;

use super::Session;

/// Execute the inspect command.
pub async fn execute(session: &Session, id: &str) -> Result<()> {
    let record = match session.api.get(id).await {
        Ok(record) => record,
        Err(e) if e.is_not_found() => anyhow::bail!("Image '{id}' not found"),
        Err(e) => return Err(e).context("Failed to fetch image"),
    };

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
