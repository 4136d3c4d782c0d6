//! CLI command implementations for gallery.
//!
//! Each submodule drives the [`GalleryController`] through the terminal
//! widgets, the same way a browser front end would through its DOM:
//!
//! - [`list`] - Load and print the gallery
//! - [`view`] - Show one image's details
//! - [`inspect`] - Fetch one record straight from the server
//! - [`upload`] - Upload a new image
//! - [`edit`] - Change title, description or tags
//! - [`delete`] - Delete an image after confirmation

pub mod delete;
pub mod edit;
pub mod inspect;
pub mod list;
pub mod upload;
pub mod view;

use std::sync::Arc;

use anyhow::{Context, Result};

use gallery::api::HttpGalleryApi;
use gallery::config::Config;
use gallery::controller::{GalleryController, Outcome};
use gallery::terminal::TerminalUi;

/// A controller wired to the terminal for one command.
pub struct Session {
    pub api: Arc<HttpGalleryApi>,
    pub controller: GalleryController,
    pub ui: TerminalUi,
}

impl Session {
    /// Build the API client, widgets and controller from configuration.
    pub fn new(config: &Config, assume_yes: bool) -> Result<Self> {
        let api = Arc::new(
            HttpGalleryApi::new(&config.server.base_url, &config.server.collection_path)
                .context("Failed to create gallery client")?,
        );
        let ui = TerminalUi::new(config.ui.locale, assume_yes);
        let controller = GalleryController::new(api.clone(), ui.widgets(), config.renderer())
            .with_notification_ttl(config.notification_ttl());

        Ok(Self {
            api,
            controller,
            ui,
        })
    }

    /// Load the gallery, failing when the list cannot be fetched.
    pub async fn load(&self) -> Result<()> {
        if self.controller.start().await.is_failure() {
            anyhow::bail!("Could not load images from {}", self.api.collection_url());
        }
        Ok(())
    }

    /// Fail when the controller rejected input or reported an error.
    pub fn finish(&self, outcome: Outcome) -> Result<()> {
        if outcome.is_failure() || outcome == Outcome::Invalid || self.ui.notifier.had_error() {
            anyhow::bail!("Command failed");
        }
        Ok(())
    }
}

/// Fail with a uniform message when a record is not in the gallery.
pub fn require_found(outcome: Outcome, id: &str) -> Result<Outcome> {
    if outcome == Outcome::NotFound {
        anyhow::bail!("Image '{id}' not found");
    }
    Ok(outcome)
}
