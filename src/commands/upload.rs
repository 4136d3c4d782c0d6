//! `gallery upload` - upload a new image.

use std::path::Path;

use anyhow::{Context, Result};

use gallery::controller::Command;
use gallery::model::SelectedFile;
use gallery::widgets::TextField;

use super::Session;

/// Form input for an upload.
pub struct UploadArgs<'a> {
    pub file: &'a Path,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub tags: Option<&'a str>,
}

/// Execute the upload command.
pub async fn execute(session: &Session, args: UploadArgs<'_>) -> Result<()> {
    let bytes = tokio::fs::read(args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("Upload path has no file name")?;

    let controller = &session.controller;
    let ui = &session.ui;

    controller.handle(Command::OpenUpload).await;
    ui.upload_file.select(SelectedFile::new(name, bytes));
    controller.handle(Command::FileSelected).await;
    ui.upload_title.set_value(args.title);
    ui.upload_description
        .set_value(args.description.unwrap_or_default());
    ui.upload_tags.set_value(args.tags.unwrap_or_default());

    let outcome = controller.handle(Command::SubmitUpload).await;
    if !ui.upload_dialog.is_open() {
        controller.handle(Command::UploadClosed).await;
    }

    session.finish(outcome)
}
