//! Content types for static files, looked up by file extension.

use std::path::Path;

/// Returned for any extension missing from [`MIME_TYPES`].
pub const DEFAULT_CONTENT_TYPE: &str = "application/zip";

/// Extension (case-sensitive, without the dot) to content type.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("txt", "text/plain"),
];

/// Matched against the whole file name, so a file called just `.js` or
/// `.txt` still gets its type.
const SUFFIX_TYPES: &[(&str, &str)] = &[(".js", "text/javascript"), (".txt", "text/plain")];

/// Extension of a file name: the text after the last `.`, or an empty
/// string when there is no dot or the only dot starts the name.
///
/// # Example
///
/// ```
/// # use lantern::http::mime::extension;
/// assert_eq!(extension("photo.tar.gz"), "gz");
/// assert_eq!(extension(".bashrc"), "");
/// assert_eq!(extension("README"), "");
/// ```
pub fn extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(i) if i > 0 => &file_name[i + 1..],
        _ => "",
    }
}

/// Extension of the last component of `path`.
pub fn path_extension(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(extension)
        .unwrap_or("")
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path_extension(path);
    if let Some((_, mime)) = MIME_TYPES.iter().find(|(known, _)| *known == ext) {
        return mime;
    }

    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    SUFFIX_TYPES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
