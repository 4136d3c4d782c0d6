//! Console output formatting.
//!
//! Provides shared printing functions for notifications, record listings
//! and the detail view.

use crate::model::ImageRecord;
use crate::render::{ImageDetail, Renderer};
use crate::utils::format_file_size;
use crate::widgets::{Level, Notification};

/// Width of error box separators.
const ERROR_BOX_WIDTH: usize = 60;

/// Print a notification to stderr.
///
/// Errors get a boxed layout so they stand out between progress output:
///
/// ```text
/// ============================================================
/// Error uploading image: File must be an image
/// ============================================================
/// ```
pub fn print_notification(notification: &Notification) {
    match notification.level {
        Level::Danger => print_error_box(&notification.message),
        Level::Warning => eprintln!("warning: {}", notification.message),
        Level::Success => eprintln!("ok: {}", notification.message),
        Level::Info => eprintln!("{}", notification.message),
    }
}

/// Print an error box with a title.
pub fn print_error_box(title: &str) {
    eprintln!("\n{}", "=".repeat(ERROR_BOX_WIDTH));
    eprintln!("{title}");
    eprintln!("{}", "=".repeat(ERROR_BOX_WIDTH));
}

/// Print records as a table, one line per record.
pub fn print_records(records: &[ImageRecord], renderer: &Renderer) {
    let id_width = records
        .iter()
        .map(|r| r.id.chars().count())
        .max()
        .unwrap_or(2)
        .max(2);

    println!(
        "{:<id_width$}  {:<10}  {:>10}  {}",
        "ID", "CREATED", "SIZE", "TITLE"
    );
    for record in records {
        let tags = if record.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", record.joined_tags())
        };
        println!(
            "{:<id_width$}  {:<10}  {:>10}  {}{tags}",
            record.id,
            renderer.card_date(record),
            format_file_size(record.size),
            record.title,
        );
    }
}

/// Print the detail view of one record.
pub fn print_detail(detail: &ImageDetail) {
    println!("{}", detail.title);
    println!("{}", "-".repeat(detail.title.chars().count().max(1)));
    println!("{}", detail.image_url);
    if !detail.description.is_empty() {
        println!();
        println!("{}", detail.description);
    }
    if !detail.tags.is_empty() {
        println!();
        println!("{}", detail.tags.join(", "));
    }
    println!();
    println!("{}", detail.uploaded_at);
}
