//! Shared defaults for the gallery client.

/// Server the client talks to when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Path of the image collection resource on the server.
///
/// The trailing slash matters: the server redirects `/api/images` to
/// `/api/images/`, and a multipart upload is not replayed across a redirect.
pub const DEFAULT_COLLECTION_PATH: &str = "/api/images/";

/// Seconds before a notification dismisses itself.
pub const DEFAULT_NOTIFICATION_SECS: u64 = 5;

/// Config file name looked up in the working and config directories.
pub const CONFIG_FILE_NAME: &str = "gallery.toml";

/// HTTP connect timeout. Requests themselves are never timed out.
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Separator used when joining tags into a single form field.
pub const TAG_SEPARATOR: &str = ", ";
