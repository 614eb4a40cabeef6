//! Media-type classification for uploaded site files.
//!
//! Classification is a pure suffix match against a fixed table, never a
//! content sniff: the same filename always maps to the same media type, and
//! no extra I/O is performed. The suffix match is case-sensitive.

/// Media type used for files with no matching suffix.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Suffix table for the file types a static site is made of.
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".png", "image/png"),
    (".jpg", "image/jpg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
];

/// Classify a filename into a media type.
///
/// Total: unknown extensions (and no extension at all) map to
/// [`DEFAULT_CONTENT_TYPE`].
#[must_use]
pub fn classify(filename: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| filename.ends_with(suffix))
        .map_or(DEFAULT_CONTENT_TYPE, |(_, content_type)| content_type)
}
