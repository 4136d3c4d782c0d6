//! Widget capabilities the controller drives.
//!
//! The controller never touches a concrete toolkit. A front end implements
//! these small traits (a browser binding, the terminal front end in
//! [`crate::terminal`], or test doubles) and hands them over in a
//! [`Widgets`] bundle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::model::SelectedFile;
use crate::render::{ImageDetail, RenderedCard};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Danger,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        };
        f.write_str(name)
    }
}

/// A dismissible message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    /// The notification removes itself after this long.
    pub dismiss_after: Duration,
}

/// Shows notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// A region that can be shown or hidden (loading indicator, empty state).
pub trait Toggle: Send + Sync {
    fn set_visible(&self, visible: bool);
}

/// A submit control. Busy means disabled with a progress label.
pub trait Button: Send + Sync {
    fn set_busy(&self, busy: bool);
}

/// A modal dialog.
pub trait Dialog: Send + Sync {
    fn open(&self);
    fn close(&self);
}

/// A file picker.
pub trait FileInput: Send + Sync {
    fn selected(&self) -> Option<SelectedFile>;
    fn clear(&self);
}

/// A single-line or multi-line text input.
pub trait TextField: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
}

/// Asks the user a yes/no question.
///
/// Called from async controller methods and may block until the user
/// answers. Implementations reading a terminal should move off the async
/// worker (see [`crate::terminal::StdinConfirm`]).
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// The card grid.
pub trait Grid: Send + Sync {
    /// Replace every card, in order.
    fn set_cards(&self, cards: Vec<RenderedCard>);
    fn set_visible(&self, visible: bool);
}

/// Read-only detail view of a single image.
pub trait DetailView: Send + Sync {
    fn show(&self, detail: ImageDetail);
}

/// Preview of the file picked for upload.
pub trait ImagePreview: Send + Sync {
    fn show(&self, file: &SelectedFile);
    fn hide(&self);
}

/// Fields of the upload dialog.
#[derive(Clone)]
pub struct UploadForm {
    pub dialog: Arc<dyn Dialog>,
    pub file: Arc<dyn FileInput>,
    pub title: Arc<dyn TextField>,
    pub description: Arc<dyn TextField>,
    pub tags: Arc<dyn TextField>,
    pub preview: Arc<dyn ImagePreview>,
    pub submit: Arc<dyn Button>,
}

/// Fields of the edit dialog.
#[derive(Clone)]
pub struct EditForm {
    pub dialog: Arc<dyn Dialog>,
    pub title: Arc<dyn TextField>,
    pub description: Arc<dyn TextField>,
    pub tags: Arc<dyn TextField>,
    pub save: Arc<dyn Button>,
}

/// Detail dialog.
#[derive(Clone)]
pub struct ViewPanel {
    pub dialog: Arc<dyn Dialog>,
    pub detail: Arc<dyn DetailView>,
}

/// Every widget the controller needs.
#[derive(Clone)]
pub struct Widgets {
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn Confirm>,
    pub loading: Arc<dyn Toggle>,
    pub empty_state: Arc<dyn Toggle>,
    pub grid: Arc<dyn Grid>,
    pub upload: UploadForm,
    pub edit: EditForm,
    pub view: ViewPanel,
}

/// Marks a button busy until dropped.
///
/// Restores the button on every exit path, including early returns and
/// errors.
pub struct BusyGuard {
    button: Arc<dyn Button>,
}

impl BusyGuard {
    pub fn new(button: Arc<dyn Button>) -> Self {
        button.set_busy(true);
        Self { button }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.button.set_busy(false);
    }
}
