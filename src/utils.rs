//! Shared formatting helpers.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Format a byte count the way gallery cards show it.
///
/// Binary prefixes, at most two decimals, no trailing zeros. Sizes beyond the
/// gigabyte range stay in GB.
///
/// # Examples
///
/// ```
/// use gallery::utils::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1024), "1 KB");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(1048576), "1 MB");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const K: u64 = 1024;
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut index = 0;
    let mut scale = 1u64;
    while index + 1 < UNITS.len() && bytes >= scale * K {
        scale *= K;
        index += 1;
    }

    let value = (bytes as f64 / scale as f64 * 100.0).round() / 100.0;
    format!("{value} {}", UNITS[index])
}

/// Escape text for insertion into HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Parse a server timestamp.
///
/// Accepts RFC 3339 and naive ISO-8601 (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a server timestamp with a chrono pattern in the given offset.
///
/// Unparseable input is returned unchanged.
pub fn format_timestamp(raw: &str, pattern: &str, offset: FixedOffset) -> String {
    parse_timestamp(raw).map_or_else(
        || raw.to_string(),
        |dt| dt.with_timezone(&offset).format(pattern).to_string(),
    )
}
