//! Shared test harness.
//!
//! - [`TestServer`] - in-process gallery server (axum) on an ephemeral port
//! - [`FakeApi`] - scripted [`GalleryApi`] with call recording
//! - [`TestUi`] - widgets that record everything the controller does

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use axum::extract::{Multipart, Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use chrono::FixedOffset;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use gallery::api::GalleryApi;
use gallery::i18n::Locale;
use gallery::model::{ImageRecord, ImageUpdate, NewImage, SelectedFile};
use gallery::render::{ImageDetail, RenderedCard, Renderer};
use gallery::widgets::{
    Button, Confirm, DetailView, Dialog, EditForm, FileInput, Grid, ImagePreview, Level,
    Notification, Notifier, TextField, Toggle, UploadForm, ViewPanel, Widgets,
};
use gallery::{Error, Result};

// =============================================================================
// Fixtures
// =============================================================================

/// A record with predictable fields.
pub fn record(id: &str, title: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(format!("About {title}")),
        tags: vec!["nature".to_string(), "sky".to_string()],
        url: format!("https://cdn.test/{id}.jpg"),
        thumbnail_url: Some(format!("https://cdn.test/{id}_thumb.jpg")),
        size: 1536,
        created_at: "2024-05-01T10:00:00".to_string(),
        content_type: Some("image/jpeg".to_string()),
    }
}

/// Renderer pinned to English and UTC.
pub fn renderer() -> Renderer {
    Renderer::new(Locale::En, FixedOffset::east_opt(0).unwrap())
}

pub fn png(name: &str) -> SelectedFile {
    SelectedFile::new(name, vec![0x89, b'P', b'N', b'G'])
}

// =============================================================================
// In-process gallery server
// =============================================================================

/// Multipart upload as the server received it.
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub fields: Vec<String>,
}

/// Server state shared with the test.
#[derive(Default)]
pub struct ServerState {
    pub records: Mutex<Vec<ImageRecord>>,
    pub requests: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<ReceivedUpload>>,
    pub updates: Mutex<Vec<(String, Value)>>,
    pub fail_list: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    next_id: AtomicU64,
}

impl ServerState {
    fn log(&self, line: String) {
        self.requests.lock().push(line);
    }

    /// Number of requests matching `method path`.
    pub fn count(&self, request: &str) -> usize {
        self.requests.lock().iter().filter(|r| *r == request).count()
    }
}

type Shared = Arc<ServerState>;

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn list_images(State(state): State<Shared>) -> Response {
    state.log("GET /api/images".to_string());
    if state.fail_list.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list images");
    }
    Json(state.records.lock().clone()).into_response()
}

async fn get_image(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    state.log(format!("GET /api/images/{id}"));
    match state.records.lock().iter().find(|r| r.id == id) {
        Some(record) => Json(record.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Image not found"),
    }
}

async fn upload_image(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    state.log("POST /api/images".to_string());
    let mut upload = ReceivedUpload::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        upload.fields.push(name.clone());
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().map(ToString::to_string);
                upload.content_type = field.content_type().map(ToString::to_string);
                upload.bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            },
            "title" => upload.title = field.text().await.ok(),
            "description" => upload.description = field.text().await.ok(),
            "tags" => upload.tags = field.text().await.ok(),
            _ => {},
        }
    }
    state.uploads.lock().push(upload.clone());

    let Some(title) = upload.title.clone() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "title"], "msg": "field required" }] })),
        )
            .into_response();
    };
    if !upload
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"))
    {
        return detail(StatusCode::BAD_REQUEST, "File must be an image");
    }

    let id = format!("img-{}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    let record = ImageRecord {
        id: id.clone(),
        title,
        description: upload.description.clone(),
        tags: upload
            .tags
            .as_deref()
            .map(gallery::model::split_tags)
            .unwrap_or_default(),
        url: format!("https://cdn.test/{id}.png"),
        thumbnail_url: Some(format!("https://cdn.test/{id}_thumb.png")),
        size: upload.bytes.len() as u64,
        created_at: "2024-06-01T12:00:00".to_string(),
        content_type: upload.content_type.clone(),
    };
    state.records.lock().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn redirect_to_collection(State(state): State<Shared>, method: Method) -> Redirect {
    state.log(format!("{method} /api/images (redirected)"));
    Redirect::temporary("/api/images/")
}

async fn update_image(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.log(format!("PUT /api/images/{id}"));
    state.updates.lock().push((id.clone(), body.clone()));
    if state.fail_update.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update image");
    }

    let mut records = state.records.lock();
    let Some(record) = records.iter_mut().find(|r| r.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Image not found");
    };
    if let Some(title) = body["title"].as_str() {
        record.title = title.to_string();
    }
    record.description = body["description"].as_str().map(ToString::to_string);
    record.tags = body["tags"]
        .as_array()
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.as_str().map(ToString::to_string))
                .collect()
        })
        .unwrap_or_default();
    Json(record.clone()).into_response()
}

async fn delete_image(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    state.log(format!("DELETE /api/images/{id}"));
    if state.fail_delete.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete image");
    }
    let mut records = state.records.lock();
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
        return detail(StatusCode::NOT_FOUND, "Image not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Gallery server bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start(records: Vec<ImageRecord>) -> Self {
        let state = Self::state(records);
        let app = Router::new()
            .route("/api/images", get(list_images).post(upload_image))
            .route(
                "/api/images/{id}",
                get(get_image).put(update_image).delete(delete_image),
            )
            .with_state(state.clone());
        Self::serve(app, state).await
    }

    /// Server that registers the collection as `/api/images/` and answers the
    /// slash-less path with a 307 redirect, like FastAPI does.
    pub async fn start_slash_terminated(records: Vec<ImageRecord>) -> Self {
        let state = Self::state(records);
        let app = Router::new()
            .route("/api/images/", get(list_images).post(upload_image))
            .route("/api/images", any(redirect_to_collection))
            .route(
                "/api/images/{id}",
                get(get_image).put(update_image).delete(delete_image),
            )
            .with_state(state.clone());
        Self::serve(app, state).await
    }

    fn state(records: Vec<ImageRecord>) -> Shared {
        let state: Shared = Arc::new(ServerState::default());
        *state.records.lock() = records;
        state
    }

    async fn serve(app: Router, state: Shared) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("No local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Scripted API
// =============================================================================

/// [`GalleryApi`] double that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub records: Mutex<Vec<ImageRecord>>,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<NewImage>>,
    pub updates: Mutex<Vec<(String, ImageUpdate)>>,
    /// Operations ("list", "create", "update", "delete") that fail.
    pub failing: Mutex<HashSet<&'static str>>,
    /// Detail attached to a failing create.
    pub create_detail: Mutex<Option<String>>,
    /// Pending list responses, consumed in call order.
    gates: Mutex<VecDeque<oneshot::Receiver<Result<Vec<ImageRecord>>>>>,
}

impl FakeApi {
    pub fn with_records(records: Vec<ImageRecord>) -> Arc<Self> {
        let api = Self::default();
        *api.records.lock() = records;
        Arc::new(api)
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    pub fn heal(&self, operation: &'static str) {
        self.failing.lock().remove(operation);
    }

    /// Hold the next list call until the returned sender fires.
    pub fn gate_next_list(&self) -> oneshot::Sender<Result<Vec<ImageRecord>>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.split(' ').next() == Some(operation))
            .count()
    }

    /// Calls other than list.
    pub fn mutations(&self) -> usize {
        self.calls.lock().iter().filter(|c| *c != "list").count()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn is_failing(&self, operation: &str) -> bool {
        self.failing.lock().contains(operation)
    }
}

#[async_trait]
impl GalleryApi for FakeApi {
    async fn list(&self) -> Result<Vec<ImageRecord>> {
        self.record_call("list".to_string());
        let gate = self.gates.lock().pop_front();
        if let Some(gate) = gate {
            return gate.await.unwrap_or_else(|_| Err(Error::decode("gate dropped")));
        }
        if self.is_failing("list") {
            return Err(Error::status(500));
        }
        Ok(self.records.lock().clone())
    }

    async fn get(&self, id: &str) -> Result<ImageRecord> {
        self.record_call(format!("get {id}"));
        self.records
            .lock()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::status(404))
    }

    async fn create(&self, image: NewImage) -> Result<()> {
        self.record_call(format!("create {}", image.title));
        if self.is_failing("create") {
            return Err(match self.create_detail.lock().clone() {
                Some(detail) => Error::status_with_detail(400, detail),
                None => Error::status(500),
            });
        }
        let mut records = self.records.lock();
        let id = format!("new-{}", records.len() + 1);
        records.push(ImageRecord {
            description: image.description.clone(),
            tags: image
                .tags
                .as_deref()
                .map(gallery::model::split_tags)
                .unwrap_or_default(),
            ..record(&id, &image.title)
        });
        drop(records);
        self.created.lock().push(image);
        Ok(())
    }

    async fn update(&self, id: &str, update: &ImageUpdate) -> Result<()> {
        self.record_call(format!("update {id}"));
        self.updates.lock().push((id.to_string(), update.clone()));
        if self.is_failing("update") {
            return Err(Error::status_with_detail(500, "Failed to update image"));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.record_call(format!("delete {id}"));
        if self.is_failing("delete") {
            return Err(Error::status(500));
        }
        self.records.lock().retain(|r| r.id != id);
        Ok(())
    }
}

// =============================================================================
// Recording widgets
// =============================================================================

/// Ordered log of widget events, shared by every test widget.
#[derive(Default)]
pub struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.lock().iter().any(|e| e == event)
    }
}

pub struct TestToggle {
    name: &'static str,
    visible: AtomicBool,
    log: Arc<EventLog>,
}

impl TestToggle {
    fn new(name: &'static str, log: &Arc<EventLog>) -> Arc<Self> {
        Arc::new(Self {
            name,
            visible: AtomicBool::new(false),
            log: log.clone(),
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl Toggle for TestToggle {
    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
        self.log.push(format!("{}:{}", self.name, if visible { "show" } else { "hide" }));
    }
}

pub struct TestButton {
    name: &'static str,
    busy: AtomicBool,
    log: Arc<EventLog>,
}

impl TestButton {
    fn new(name: &'static str, log: &Arc<EventLog>) -> Arc<Self> {
        Arc::new(Self {
            name,
            busy: AtomicBool::new(false),
            log: log.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Button for TestButton {
    fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
        self.log.push(format!("{}:{}", self.name, if busy { "busy" } else { "idle" }));
    }
}

pub struct TestDialog {
    name: &'static str,
    open: AtomicBool,
    log: Arc<EventLog>,
}

impl TestDialog {
    fn new(name: &'static str, log: &Arc<EventLog>) -> Arc<Self> {
        Arc::new(Self {
            name,
            open: AtomicBool::new(false),
            log: log.clone(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl Dialog for TestDialog {
    fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.log.push(format!("{}:open", self.name));
    }

    fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.log.push(format!("{}:close", self.name));
    }
}

#[derive(Default)]
pub struct TestField(Mutex<String>);

impl TestField {
    pub fn set(&self, value: &str) {
        *self.0.lock() = value.to_string();
    }

    pub fn get(&self) -> String {
        self.0.lock().clone()
    }
}

impl TextField for TestField {
    fn value(&self) -> String {
        self.get()
    }

    fn set_value(&self, value: &str) {
        self.set(value);
    }
}

#[derive(Default)]
pub struct TestFile(Mutex<Option<SelectedFile>>);

impl TestFile {
    pub fn pick(&self, file: SelectedFile) {
        *self.0.lock() = Some(file);
    }
}

impl FileInput for TestFile {
    fn selected(&self) -> Option<SelectedFile> {
        self.0.lock().clone()
    }

    fn clear(&self) {
        self.0.lock().take();
    }
}

#[derive(Default)]
pub struct TestPreview(Mutex<Option<String>>);

impl TestPreview {
    pub fn shown(&self) -> Option<String> {
        self.0.lock().clone()
    }
}

impl ImagePreview for TestPreview {
    fn show(&self, file: &SelectedFile) {
        *self.0.lock() = Some(file.name.clone());
    }

    fn hide(&self) {
        self.0.lock().take();
    }
}

#[derive(Default)]
pub struct TestNotifier(Mutex<Vec<Notification>>);

impl TestNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.0.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.0.lock().last().cloned()
    }

    pub fn with_level(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for TestNotifier {
    fn notify(&self, notification: Notification) {
        self.0.lock().push(notification);
    }
}

pub struct TestConfirm {
    pub answer: AtomicBool,
    pub prompts: Mutex<Vec<String>>,
}

impl Confirm for TestConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct TestGrid {
    cards: Mutex<Vec<RenderedCard>>,
    visible: AtomicBool,
}

impl TestGrid {
    pub fn cards(&self) -> Vec<RenderedCard> {
        self.cards.lock().clone()
    }

    pub fn ids(&self) -> Vec<String> {
        self.cards.lock().iter().map(|c| c.id.clone()).collect()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl Grid for TestGrid {
    fn set_cards(&self, cards: Vec<RenderedCard>) {
        *self.cards.lock() = cards;
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct TestDetail(Mutex<Option<ImageDetail>>);

impl TestDetail {
    pub fn get(&self) -> Option<ImageDetail> {
        self.0.lock().clone()
    }
}

impl DetailView for TestDetail {
    fn show(&self, detail: ImageDetail) {
        *self.0.lock() = Some(detail);
    }
}

/// Every widget, with typed handles for assertions.
pub struct TestUi {
    pub log: Arc<EventLog>,
    pub notifier: Arc<TestNotifier>,
    pub confirm: Arc<TestConfirm>,
    pub loading: Arc<TestToggle>,
    pub empty_state: Arc<TestToggle>,
    pub grid: Arc<TestGrid>,
    pub upload_dialog: Arc<TestDialog>,
    pub upload_file: Arc<TestFile>,
    pub upload_title: Arc<TestField>,
    pub upload_description: Arc<TestField>,
    pub upload_tags: Arc<TestField>,
    pub upload_preview: Arc<TestPreview>,
    pub upload_button: Arc<TestButton>,
    pub edit_dialog: Arc<TestDialog>,
    pub edit_title: Arc<TestField>,
    pub edit_description: Arc<TestField>,
    pub edit_tags: Arc<TestField>,
    pub save_button: Arc<TestButton>,
    pub view_dialog: Arc<TestDialog>,
    pub detail: Arc<TestDetail>,
}

impl TestUi {
    pub fn new() -> Self {
        let log = Arc::new(EventLog::default());
        Self {
            notifier: Arc::new(TestNotifier::default()),
            confirm: Arc::new(TestConfirm {
                answer: AtomicBool::new(true),
                prompts: Mutex::new(Vec::new()),
            }),
            loading: TestToggle::new("loading", &log),
            empty_state: TestToggle::new("empty", &log),
            grid: Arc::new(TestGrid::default()),
            upload_dialog: TestDialog::new("upload", &log),
            upload_file: Arc::new(TestFile::default()),
            upload_title: Arc::new(TestField::default()),
            upload_description: Arc::new(TestField::default()),
            upload_tags: Arc::new(TestField::default()),
            upload_preview: Arc::new(TestPreview::default()),
            upload_button: TestButton::new("upload-button", &log),
            edit_dialog: TestDialog::new("edit", &log),
            edit_title: Arc::new(TestField::default()),
            edit_description: Arc::new(TestField::default()),
            edit_tags: Arc::new(TestField::default()),
            save_button: TestButton::new("save-button", &log),
            view_dialog: TestDialog::new("view", &log),
            detail: Arc::new(TestDetail::default()),
            log,
        }
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirm.answer.store(answer, Ordering::SeqCst);
    }

    pub fn widgets(&self) -> Widgets {
        Widgets {
            notifier: self.notifier.clone(),
            confirm: self.confirm.clone(),
            loading: self.loading.clone(),
            empty_state: self.empty_state.clone(),
            grid: self.grid.clone(),
            upload: UploadForm {
                dialog: self.upload_dialog.clone(),
                file: self.upload_file.clone(),
                title: self.upload_title.clone(),
                description: self.upload_description.clone(),
                tags: self.upload_tags.clone(),
                preview: self.upload_preview.clone(),
                submit: self.upload_button.clone(),
            },
            edit: EditForm {
                dialog: self.edit_dialog.clone(),
                title: self.edit_title.clone(),
                description: self.edit_description.clone(),
                tags: self.edit_tags.clone(),
                save: self.save_button.clone(),
            },
            view: ViewPanel {
                dialog: self.view_dialog.clone(),
                detail: self.detail.clone(),
            },
        }
    }
}
