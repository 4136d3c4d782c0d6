//! Terminal implementation of the gallery widgets.
//!
//! Dialogs and fields hold state in memory, busy states and the loading
//! indicator are spinners on stderr, notifications print as they arrive and
//! confirmations prompt on stdin. The grid and detail view only record what
//! the controller gave them; commands print that state when they finish.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::debug;

use crate::i18n::Locale;
use crate::model::SelectedFile;
use crate::render::{ImageDetail, RenderedCard};
use crate::ui;
use crate::widgets::{
    Button, Confirm, DetailView, Dialog, EditForm, FileInput, Grid, ImagePreview, Level,
    Notification, Notifier, TextField, Toggle, UploadForm, ViewPanel, Widgets,
};

const SPINNER_TICK: Duration = Duration::from_millis(80);

fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(SPINNER_TICK);
    spinner
}

/// Prints notifications and remembers whether an error was shown.
#[derive(Default)]
pub struct ConsoleNotifier {
    failed: AtomicBool,
    history: Mutex<Vec<Notification>>,
}

impl ConsoleNotifier {
    pub fn had_error(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn history(&self) -> Vec<Notification> {
        self.history.lock().clone()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.level == Level::Danger {
            self.failed.store(true, Ordering::SeqCst);
        }
        ui::print_notification(&notification);
        self.history.lock().push(notification);
    }
}

/// Spinner shown while visible.
pub struct Spinner {
    message: &'static str,
    bar: Mutex<Option<ProgressBar>>,
}

impl Spinner {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            bar: Mutex::new(None),
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    fn set_running(&self, running: bool) {
        let mut bar = self.bar.lock();
        match (running, bar.is_some()) {
            (true, false) => *bar = Some(start_spinner(self.message)),
            (false, true) => {
                if let Some(spinner) = bar.take() {
                    spinner.finish_and_clear();
                }
            },
            _ => {},
        }
    }
}

impl Toggle for Spinner {
    fn set_visible(&self, visible: bool) {
        self.set_running(visible);
    }
}

impl Button for Spinner {
    fn set_busy(&self, busy: bool) {
        self.set_running(busy);
    }
}

/// Visibility flag with no output of its own.
#[derive(Default)]
pub struct Flag(AtomicBool);

impl Flag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Toggle for Flag {
    fn set_visible(&self, visible: bool) {
        self.0.store(visible, Ordering::SeqCst);
    }
}

/// Dialog open/closed state.
pub struct DialogState {
    name: &'static str,
    open: AtomicBool,
}

impl DialogState {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            open: AtomicBool::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl Dialog for DialogState {
    fn open(&self) {
        debug!(dialog = self.name, "Dialog opened");
        self.open.store(true, Ordering::SeqCst);
    }

    fn close(&self) {
        debug!(dialog = self.name, "Dialog closed");
        self.open.store(false, Ordering::SeqCst);
    }
}

/// In-memory text input.
#[derive(Default)]
pub struct Field(Mutex<String>);

impl TextField for Field {
    fn value(&self) -> String {
        self.0.lock().clone()
    }

    fn set_value(&self, value: &str) {
        *self.0.lock() = value.to_string();
    }
}

/// File picked from the command line.
#[derive(Default)]
pub struct FileSlot(Mutex<Option<SelectedFile>>);

impl FileSlot {
    pub fn select(&self, file: SelectedFile) {
        *self.0.lock() = Some(file);
    }
}

impl FileInput for FileSlot {
    fn selected(&self) -> Option<SelectedFile> {
        self.0.lock().clone()
    }

    fn clear(&self) {
        self.0.lock().take();
    }
}

/// Logs the previewed file.
#[derive(Default)]
pub struct PreviewLog;

impl ImagePreview for PreviewLog {
    fn show(&self, file: &SelectedFile) {
        debug!(
            file = %file.name,
            content_type = %file.content_type,
            size = file.bytes.len(),
            "Previewing upload"
        );
    }

    fn hide(&self) {}
}

/// Last cards handed to the grid.
#[derive(Default)]
pub struct CardList {
    cards: Mutex<Vec<RenderedCard>>,
    visible: AtomicBool,
}

impl CardList {
    pub fn cards(&self) -> Vec<RenderedCard> {
        self.cards.lock().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl Grid for CardList {
    fn set_cards(&self, cards: Vec<RenderedCard>) {
        *self.cards.lock() = cards;
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }
}

/// Last detail the controller showed.
#[derive(Default)]
pub struct DetailSlot(Mutex<Option<ImageDetail>>);

impl DetailSlot {
    pub fn detail(&self) -> Option<ImageDetail> {
        self.0.lock().clone()
    }
}

impl DetailView for DetailSlot {
    fn show(&self, detail: ImageDetail) {
        *self.0.lock() = Some(detail);
    }
}

/// Asks on stdin unless confirmation was given up front.
pub struct StdinConfirm {
    assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        run_blocking(|| ask(prompt, &mut io::stdin().lock()))
    }
}

/// Run blocking console I/O, handing the worker thread back to the runtime
/// first when on a multi-thread runtime.
fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        },
        _ => f(),
    }
}

/// Print `prompt` and read one answer line from `input`.
fn ask(prompt: &str, input: &mut impl BufRead) -> bool {
    print!("{prompt} [y/N]: ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "כ" | "כן")
}

/// Every terminal widget, with typed handles for the commands.
pub struct TerminalUi {
    pub notifier: Arc<ConsoleNotifier>,
    pub loading: Arc<Spinner>,
    pub empty_state: Arc<Flag>,
    pub grid: Arc<CardList>,
    pub detail: Arc<DetailSlot>,
    pub upload_dialog: Arc<DialogState>,
    pub upload_file: Arc<FileSlot>,
    pub upload_title: Arc<Field>,
    pub upload_description: Arc<Field>,
    pub upload_tags: Arc<Field>,
    pub edit_dialog: Arc<DialogState>,
    pub edit_title: Arc<Field>,
    pub edit_description: Arc<Field>,
    pub edit_tags: Arc<Field>,
    widgets: Widgets,
}

impl TerminalUi {
    pub fn new(locale: Locale, assume_yes: bool) -> Self {
        let messages = locale.messages();
        let notifier = Arc::new(ConsoleNotifier::default());
        let loading = Arc::new(Spinner::new(messages.loading));
        let empty_state = Arc::new(Flag::default());
        let grid = Arc::new(CardList::default());
        let detail = Arc::new(DetailSlot::default());
        let upload_dialog = Arc::new(DialogState::new("upload"));
        let upload_file = Arc::new(FileSlot::default());
        let upload_title = Arc::new(Field::default());
        let upload_description = Arc::new(Field::default());
        let upload_tags = Arc::new(Field::default());
        let edit_dialog = Arc::new(DialogState::new("edit"));
        let edit_title = Arc::new(Field::default());
        let edit_description = Arc::new(Field::default());
        let edit_tags = Arc::new(Field::default());

        let widgets = Widgets {
            notifier: notifier.clone(),
            confirm: Arc::new(StdinConfirm { assume_yes }),
            loading: loading.clone(),
            empty_state: empty_state.clone(),
            grid: grid.clone(),
            upload: UploadForm {
                dialog: upload_dialog.clone(),
                file: upload_file.clone(),
                title: upload_title.clone(),
                description: upload_description.clone(),
                tags: upload_tags.clone(),
                preview: Arc::new(PreviewLog),
                submit: Arc::new(Spinner::new(messages.uploading)),
            },
            edit: EditForm {
                dialog: edit_dialog.clone(),
                title: edit_title.clone(),
                description: edit_description.clone(),
                tags: edit_tags.clone(),
                save: Arc::new(Spinner::new(messages.saving)),
            },
            view: ViewPanel {
                dialog: Arc::new(DialogState::new("view")),
                detail: detail.clone(),
            },
        };

        Self {
            notifier,
            loading,
            empty_state,
            grid,
            detail,
            upload_dialog,
            upload_file,
            upload_title,
            upload_description,
            upload_tags,
            edit_dialog,
            edit_title,
            edit_description,
            edit_tags,
            widgets,
        }
    }

    /// Widget bundle for a controller.
    pub fn widgets(&self) -> Widgets {
        self.widgets.clone()
    }
}
