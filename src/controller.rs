//! Gallery controller.
//!
//! Maps user commands onto API calls and widget updates. Every successful
//! mutation is followed by exactly one full list reload; nothing is patched
//! locally.
//!
//! # Example
//!
//! ```ignore
//! let controller = GalleryController::new(api, widgets, Renderer::local(Locale::En));
//! controller.start().await;
//! controller.handle(Command::Delete("a1".into())).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::GalleryApi;
use crate::constants::DEFAULT_NOTIFICATION_SECS;
use crate::error::Error;
use crate::i18n::Messages;
use crate::model::{ImageUpdate, NewImage, non_empty};
use crate::render::Renderer;
use crate::store::GalleryStore;
use crate::widgets::{BusyGuard, Level, Notification, Widgets};

/// A user action the controller responds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reload,
    OpenUpload,
    FileSelected,
    SubmitUpload,
    UploadClosed,
    View(String),
    Edit(String),
    SaveEdit,
    Delete(String),
}

impl Command {
    /// Command for a card control's `data-action`/`data-id` pair.
    pub fn from_card_action(action: &str, id: &str) -> Option<Self> {
        match action {
            "view" => Some(Self::View(id.to_string())),
            "edit" => Some(Self::Edit(id.to_string())),
            "delete" => Some(Self::Delete(id.to_string())),
            _ => None,
        }
    }
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran to completion.
    Completed,
    /// Input failed validation; a warning was shown and nothing was sent.
    Invalid,
    /// The user declined the confirmation prompt.
    Declined,
    /// The referenced record is not in the store.
    NotFound,
    /// The request failed; an error notification was shown.
    Failed,
    /// A newer list fetch already won; this result was dropped.
    Stale,
}

impl Outcome {
    /// Whether the user was shown an error.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Orchestrates the gallery UI against a [`GalleryApi`].
pub struct GalleryController {
    api: Arc<dyn GalleryApi>,
    store: GalleryStore,
    widgets: Widgets,
    renderer: Renderer,
    notification_ttl: Duration,
    /// Record targeted by the open edit dialog.
    editing: Mutex<Option<String>>,
    loads_in_flight: AtomicUsize,
}

/// Keeps the loading indicator up while any list fetch is in flight.
struct LoadingGuard<'a> {
    controller: &'a GalleryController,
}

impl<'a> LoadingGuard<'a> {
    fn new(controller: &'a GalleryController) -> Self {
        controller.loads_in_flight.fetch_add(1, Ordering::SeqCst);
        controller.widgets.loading.set_visible(true);
        Self { controller }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.controller.loads_in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.controller.widgets.loading.set_visible(false);
        }
    }
}

impl GalleryController {
    pub fn new(api: Arc<dyn GalleryApi>, widgets: Widgets, renderer: Renderer) -> Self {
        Self {
            api,
            store: GalleryStore::new(),
            widgets,
            renderer,
            notification_ttl: Duration::from_secs(DEFAULT_NOTIFICATION_SECS),
            editing: Mutex::new(None),
            loads_in_flight: AtomicUsize::new(0),
        }
    }

    /// Set how long notifications stay up.
    #[must_use]
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn store(&self) -> &GalleryStore {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Id of the record the edit dialog targets, if any.
    pub fn editing_id(&self) -> Option<String> {
        self.editing.lock().clone()
    }

    fn messages(&self) -> &'static Messages {
        self.renderer.locale().messages()
    }

    fn notify(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        debug!(%level, %message, "Notification");
        self.widgets.notifier.notify(Notification {
            level,
            message,
            dismiss_after: self.notification_ttl,
        });
    }

    /// Initial load.
    pub async fn start(&self) -> Outcome {
        self.load().await
    }

    /// Run one user command.
    pub async fn handle(&self, command: Command) -> Outcome {
        debug!(?command, "Handling command");
        match command {
            Command::Reload => self.load().await,
            Command::OpenUpload => self.open_upload(),
            Command::FileSelected => self.file_selected(),
            Command::SubmitUpload => self.submit_upload().await,
            Command::UploadClosed => self.upload_dialog_closed(),
            Command::View(id) => self.view(&id),
            Command::Edit(id) => self.edit(&id),
            Command::SaveEdit => self.save_edit().await,
            Command::Delete(id) => self.delete(&id).await,
        }
    }

    /// Fetch the full list and re-render.
    pub async fn load(&self) -> Outcome {
        let ticket = self.store.begin_fetch();
        let _loading = LoadingGuard::new(self);
        self.widgets.empty_state.set_visible(false);
        self.widgets.grid.set_visible(false);

        match self.api.list().await {
            Ok(records) => {
                let count = records.len();
                if !self.store.install(ticket, records) {
                    return Outcome::Stale;
                }
                info!(count, ticket = ticket.sequence(), "Gallery loaded");
                self.render();
                Outcome::Completed
            },
            Err(e) => {
                if self.store.is_stale(ticket) {
                    debug!(error = %e, "Ignoring failure of superseded fetch");
                    return Outcome::Stale;
                }
                warn!(error = %e, "Error loading images");
                self.notify(Level::Danger, self.messages().load_failed);
                Outcome::Failed
            },
        }
    }

    /// Draw the store's current contents.
    fn render(&self) {
        let records = self.store.snapshot();
        if records.is_empty() {
            self.widgets.grid.set_cards(Vec::new());
            self.widgets.grid.set_visible(false);
            self.widgets.empty_state.set_visible(true);
        } else {
            self.widgets.grid.set_cards(self.renderer.cards(&records));
            self.widgets.empty_state.set_visible(false);
            self.widgets.grid.set_visible(true);
        }
    }

    pub fn open_upload(&self) -> Outcome {
        self.widgets.upload.dialog.open();
        Outcome::Completed
    }

    /// Preview the picked file when it is an image.
    pub fn file_selected(&self) -> Outcome {
        match self.widgets.upload.file.selected() {
            Some(file) if file.is_image() => {
                self.widgets.upload.preview.show(&file);
                Outcome::Completed
            },
            Some(_) => Outcome::Invalid,
            None => Outcome::NotFound,
        }
    }

    /// Reset the upload form after its dialog is dismissed.
    pub fn upload_dialog_closed(&self) -> Outcome {
        let form = &self.widgets.upload;
        form.file.clear();
        form.title.set_value("");
        form.description.set_value("");
        form.tags.set_value("");
        form.preview.hide();
        Outcome::Completed
    }

    /// Validate the upload form and send it.
    pub async fn submit_upload(&self) -> Outcome {
        let form = &self.widgets.upload;
        let messages = self.messages();

        let Some(file) = form.file.selected() else {
            self.notify(Level::Warning, messages.select_image);
            return Outcome::Invalid;
        };
        let Some(title) = non_empty(&form.title.value()) else {
            self.notify(Level::Warning, messages.enter_title);
            return Outcome::Invalid;
        };

        let image = NewImage {
            file,
            title,
            description: non_empty(&form.description.value()),
            tags: non_empty(&form.tags.value()),
        };

        let _busy = BusyGuard::new(Arc::clone(&form.submit));
        match self.api.create(image).await {
            Ok(()) => {
                info!("Image uploaded");
                self.notify(Level::Success, messages.upload_succeeded);
                form.dialog.close();
                self.load().await;
                Outcome::Completed
            },
            Err(e) => {
                warn!(error = %e, "Upload error");
                let reason = match &e {
                    Error::Status {
                        detail: Some(detail),
                        ..
                    } => detail.clone(),
                    Error::Status { .. } | Error::Decode(_) => {
                        messages.upload_failed_generic.to_string()
                    },
                    other => other.to_string(),
                };
                self.notify(Level::Danger, messages.upload_failed(&reason));
                Outcome::Failed
            },
        }
    }

    /// Show a record in the detail view.
    pub fn view(&self, id: &str) -> Outcome {
        let Some(record) = self.store.find(id) else {
            return Outcome::NotFound;
        };
        self.widgets.view.detail.show(self.renderer.detail(&record));
        self.widgets.view.dialog.open();
        Outcome::Completed
    }

    /// Open the edit dialog pre-filled with a record's fields.
    pub fn edit(&self, id: &str) -> Outcome {
        let Some(record) = self.store.find(id) else {
            return Outcome::NotFound;
        };
        let form = &self.widgets.edit;
        *self.editing.lock() = Some(record.id.clone());
        form.title.set_value(&record.title);
        form.description
            .set_value(record.description.as_deref().unwrap_or_default());
        form.tags.set_value(&record.joined_tags());
        form.dialog.open();
        Outcome::Completed
    }

    /// Send the edit form. Empty fields clear the server value.
    pub async fn save_edit(&self) -> Outcome {
        let Some(id) = self.editing_id() else {
            warn!("Save requested without an edit target");
            return Outcome::NotFound;
        };
        let form = &self.widgets.edit;
        let messages = self.messages();
        let update = ImageUpdate::from_form(
            &form.title.value(),
            &form.description.value(),
            &form.tags.value(),
        );

        let _busy = BusyGuard::new(Arc::clone(&form.save));
        match self.api.update(&id, &update).await {
            Ok(()) => {
                info!(%id, "Image updated");
                self.notify(Level::Success, messages.update_succeeded);
                form.dialog.close();
                self.editing.lock().take();
                self.load().await;
                Outcome::Completed
            },
            Err(e) => {
                warn!(%id, error = %e, "Edit error");
                self.notify(Level::Danger, messages.update_failed);
                Outcome::Failed
            },
        }
    }

    /// Delete a record after the user confirms.
    pub async fn delete(&self, id: &str) -> Outcome {
        let Some(record) = self.store.find(id) else {
            return Outcome::NotFound;
        };
        let messages = self.messages();
        if !self
            .widgets
            .confirm
            .confirm(&messages.confirm_delete(&record.title))
        {
            debug!(%id, "Delete declined");
            return Outcome::Declined;
        }

        match self.api.delete(id).await {
            Ok(()) => {
                info!(%id, "Image deleted");
                self.notify(Level::Success, messages.delete_succeeded);
                self.load().await;
                Outcome::Completed
            },
            Err(e) => {
                warn!(%id, error = %e, "Delete error");
                self.notify(Level::Danger, messages.delete_failed);
                Outcome::Failed
            },
        }
    }
}
