//! Localized user-facing strings.
//!
//! Two catalogs ship: Hebrew (the gallery's primary audience) and English.
//! Date patterns follow the conventions of each locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported display languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    He,
    #[default]
    En,
}

impl Locale {
    /// Message catalog for this locale.
    pub fn messages(self) -> &'static Messages {
        match self {
            Self::He => &HEBREW,
            Self::En => &ENGLISH,
        }
    }

    /// BCP 47 tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::He => "he-IL",
            Self::En => "en-US",
        }
    }

    /// Text direction for rendered markup.
    pub fn dir(self) -> &'static str {
        match self {
            Self::He => "rtl",
            Self::En => "ltr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::He => f.write_str("he"),
            Self::En => f.write_str("en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "he" | "he-il" | "hebrew" => Ok(Self::He),
            "en" | "en-us" | "english" => Ok(Self::En),
            other => Err(format!("unsupported locale '{other}' (expected 'he' or 'en')")),
        }
    }
}

/// One locale's strings.
#[derive(Debug)]
pub struct Messages {
    pub load_failed: &'static str,
    pub select_image: &'static str,
    pub enter_title: &'static str,
    pub upload_succeeded: &'static str,
    /// Prefix for upload failures; the reason follows.
    pub upload_failed: &'static str,
    /// Reason used when the server gives no detail.
    pub upload_failed_generic: &'static str,
    pub update_succeeded: &'static str,
    pub update_failed: &'static str,
    pub delete_succeeded: &'static str,
    pub delete_failed: &'static str,
    /// Confirmation prompt; `{title}` is replaced with the image title.
    pub confirm_delete: &'static str,
    /// Detail view caption; `{date}` is replaced with the creation time.
    pub uploaded_at: &'static str,
    pub view: &'static str,
    pub edit: &'static str,
    pub delete: &'static str,
    /// Shown while the gallery list loads.
    pub loading: &'static str,
    pub uploading: &'static str,
    pub saving: &'static str,
    pub empty_gallery: &'static str,
    /// chrono pattern for dates on cards.
    pub date_format: &'static str,
    /// chrono pattern for date and time in the detail view.
    pub datetime_format: &'static str,
}

impl Messages {
    /// Delete confirmation naming the image.
    pub fn confirm_delete(&self, title: &str) -> String {
        self.confirm_delete.replace("{title}", title)
    }

    /// Upload failure with its reason.
    pub fn upload_failed(&self, reason: &str) -> String {
        format!("{}: {reason}", self.upload_failed)
    }

    /// Detail view caption for a formatted creation time.
    pub fn uploaded_at(&self, date: &str) -> String {
        self.uploaded_at.replace("{date}", date)
    }
}

static HEBREW: Messages = Messages {
    load_failed: "שגיאה בטעינת התמונות",
    select_image: "אנא בחר תמונה",
    enter_title: "אנא הזן כותרת",
    upload_succeeded: "התמונה הועלתה בהצלחה!",
    upload_failed: "שגיאה בהעלאת התמונה",
    upload_failed_generic: "Upload failed",
    update_succeeded: "התמונה עודכנה בהצלחה!",
    update_failed: "שגיאה בעדכון התמונה",
    delete_succeeded: "התמונה נמחקה בהצלחה!",
    delete_failed: "שגיאה במחיקת התמונה",
    confirm_delete: "האם אתה בטוח שברצונך למחוק את \"{title}\"?",
    uploaded_at: "הועלה בתאריך: {date}",
    view: "צפה",
    edit: "ערוך",
    delete: "מחק",
    loading: "טוען...",
    uploading: "מעלה...",
    saving: "שומר...",
    empty_gallery: "הגלריה ריקה",
    date_format: "%-d.%-m.%Y",
    datetime_format: "%-d.%-m.%Y, %H:%M:%S",
};

static ENGLISH: Messages = Messages {
    load_failed: "Failed to load images",
    select_image: "Please select an image",
    enter_title: "Please enter a title",
    upload_succeeded: "Image uploaded successfully!",
    upload_failed: "Error uploading image",
    upload_failed_generic: "Upload failed",
    update_succeeded: "Image updated successfully!",
    update_failed: "Error updating image",
    delete_succeeded: "Image deleted successfully!",
    delete_failed: "Error deleting image",
    confirm_delete: "Are you sure you want to delete \"{title}\"?",
    uploaded_at: "Uploaded on: {date}",
    view: "View",
    edit: "Edit",
    delete: "Delete",
    loading: "Loading...",
    uploading: "Uploading...",
    saving: "Saving...",
    empty_gallery: "The gallery is empty",
    date_format: "%-m/%-d/%Y",
    datetime_format: "%-m/%-d/%Y, %-I:%M:%S %p",
};
