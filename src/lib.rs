//! Client for image gallery REST collections.
//!
//! The crate is split along the seams of a single-page gallery:
//!
//! - [`api`] - the REST contract ([`api::GalleryApi`]) and its HTTP client
//! - [`store`] - replace-only list of the current records
//! - [`controller`] - maps user commands to requests and widget updates
//! - [`widgets`] - toolkit-neutral UI capabilities the controller drives
//! - [`render`] - HTML cards and detail view content
//! - [`terminal`] / [`ui`] - console implementation of the widgets
//! - [`config`] - `gallery.toml` loading and validation

pub mod api;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod i18n;
pub mod model;
pub mod render;
pub mod store;
pub mod terminal;
pub mod ui;
pub mod utils;
pub mod widgets;

pub use api::{GalleryApi, HttpGalleryApi};
pub use controller::{Command, GalleryController, Outcome};
pub use error::{Error, Result};
pub use model::{ImageRecord, ImageUpdate, NewImage, SelectedFile};
pub use store::GalleryStore;
