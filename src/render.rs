//! HTML rendering of gallery cards and the detail view.
//!
//! Every piece of server-provided text is escaped before it reaches markup,
//! tags and ids included.

use std::fmt::Write;

use chrono::{FixedOffset, Local, Offset};

use crate::i18n::Locale;
use crate::model::ImageRecord;
use crate::utils::{escape_html, format_file_size, format_timestamp};

/// Markup for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub id: String,
    pub html: String,
}

/// Content of the read-only detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetail {
    pub id: String,
    /// Plain text.
    pub title: String,
    pub image_url: String,
    /// Plain text, empty when the record has none.
    pub description: String,
    pub tags: Vec<String>,
    /// Escaped badge markup for `tags`.
    pub tags_html: String,
    /// Localized "uploaded at" caption, plain text.
    pub uploaded_at: String,
}

/// Renders records for one locale and timezone.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    locale: Locale,
    offset: FixedOffset,
}

impl Renderer {
    pub fn new(locale: Locale, offset: FixedOffset) -> Self {
        Self { locale, offset }
    }

    /// Renderer using the machine's current UTC offset.
    pub fn local(locale: Locale) -> Self {
        Self::new(locale, Local::now().offset().fix())
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Creation date as shown on cards.
    pub fn card_date(&self, record: &ImageRecord) -> String {
        format_timestamp(
            &record.created_at,
            self.locale.messages().date_format,
            self.offset,
        )
    }

    /// Creation date and time as shown in the detail view.
    pub fn detail_datetime(&self, record: &ImageRecord) -> String {
        format_timestamp(
            &record.created_at,
            self.locale.messages().datetime_format,
            self.offset,
        )
    }

    /// One card per record, in input order.
    pub fn cards(&self, records: &[ImageRecord]) -> Vec<RenderedCard> {
        records.iter().map(|record| self.card(record)).collect()
    }

    /// Card markup for a single record.
    pub fn card(&self, record: &ImageRecord) -> RenderedCard {
        let messages = self.locale.messages();
        let id = escape_html(&record.id);
        let title = escape_html(&record.title);

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<div class="col" data-id="{id}">
    <div class="card h-100">
        <img src="{thumb}" class="card-img-top" alt="{title}" data-action="view" data-id="{id}">
        <div class="card-body">
            <h5 class="card-title">{title}</h5>
"#,
            thumb = escape_html(record.thumbnail()),
        );

        if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(
                html,
                r#"            <p class="card-text">{}</p>"#,
                escape_html(description)
            );
        }

        if !record.tags.is_empty() {
            let _ = writeln!(
                html,
                r#"            <div class="tags-container">{}</div>"#,
                tag_badges(&record.tags, "")
            );
        }

        let _ = write!(
            html,
            r#"            <div class="image-info">
                <i class="bi bi-calendar"></i> {date} |
                <i class="bi bi-file-earmark"></i> {size}
            </div>
        </div>
        <div class="card-footer bg-transparent border-0">
            <div class="card-actions">
                <button class="btn btn-sm btn-outline-primary" data-action="view" data-id="{id}">
                    <i class="bi bi-eye"></i> {view}
                </button>
                <div>
                    <button class="btn btn-sm btn-outline-secondary" data-action="edit" data-id="{id}">
                        <i class="bi bi-pencil"></i> {edit}
                    </button>
                    <button class="btn btn-sm btn-outline-danger" data-action="delete" data-id="{id}">
                        <i class="bi bi-trash"></i> {delete}
                    </button>
                </div>
            </div>
        </div>
    </div>
</div>"#,
            date = escape_html(&self.card_date(record)),
            size = format_file_size(record.size),
            view = messages.view,
            edit = messages.edit,
            delete = messages.delete,
        );

        RenderedCard {
            id: record.id.clone(),
            html,
        }
    }

    /// Detail view content for a record.
    pub fn detail(&self, record: &ImageRecord) -> ImageDetail {
        let messages = self.locale.messages();
        ImageDetail {
            id: record.id.clone(),
            title: record.title.clone(),
            image_url: record.url.clone(),
            description: record.description.clone().unwrap_or_default(),
            tags: record.tags.clone(),
            tags_html: tag_badges(&record.tags, " "),
            uploaded_at: messages.uploaded_at(&self.detail_datetime(record)),
        }
    }

    /// Grid wrapper around rendered cards.
    pub fn grid(&self, cards: &[RenderedCard]) -> String {
        let mut html = format!(
            r#"<div id="galleryGrid" class="row row-cols-1 row-cols-md-3 g-4" lang="{}" dir="{}">"#,
            self.locale.tag(),
            self.locale.dir()
        );
        for card in cards {
            html.push('\n');
            html.push_str(&card.html);
        }
        html.push_str("\n</div>\n");
        html
    }
}

fn tag_badges(tags: &[String], separator: &str) -> String {
    tags.iter()
        .map(|tag| format!(r#"<span class="badge bg-secondary">{}</span>"#, escape_html(tag)))
        .collect::<Vec<_>>()
        .join(separator)
}
