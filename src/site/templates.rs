//! HTML pages rendered by the server itself.

use crate::http::response::StatusCode;

/// Value of the `Server` header and the page footer
pub const SERVER_NAME: &str = "Lantern/0.1";
pub const SERVER_DESC: &str = "A small static and CGI web server.";

fn footer() -> String {
    format!(
        "<hr><p>Powered by {} ({}) <br><i>{}</i></p>",
        SERVER_NAME,
        std::env::consts::OS,
        SERVER_DESC
    )
}

fn error_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BadRequest => "GET and POST requests only.",
        StatusCode::Forbidden => "You are not allowed to be here!",
        StatusCode::NotFound => "Are you sure you are looking in the right place?",
        StatusCode::InternalServerError => "Something went wrong while handling the request.",
        _ => "",
    }
}

pub fn error_page(status: StatusCode) -> String {
    format!(
        "<html><head><title>{code} {reason}</title></head><body><h1>{code} {reason}</h1><p>{message}</p>{footer}</body></html>",
        code = status.as_u16(),
        reason = status.reason_phrase(),
        message = error_message(status),
        footer = footer(),
    )
}

pub fn moved_page(location: &str) -> String {
    format!(
        "<html><head><title>301 Moved Permanently</title></head><body><h1>Moved Permanently</h1><p>The document has moved <a href=\"{location}\">here</a>.</p>{footer}</body></html>",
        location = location,
        footer = footer(),
    )
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Renders the index page of the directory at request path `web_path`.
///
/// `hidden` names the extensions that were filtered out; `ignored` is how
/// many entries they removed.
pub fn directory_page<'a>(
    web_path: &str,
    entries: &[ListingEntry],
    ignored: usize,
    hidden: impl IntoIterator<Item = &'a String>,
) -> String {
    let mut items = String::new();
    if web_path != "/" {
        items.push_str("<li> <a href=\"../\"> Parent Directory </a> </li>");
    }
    for entry in entries {
        let (kind, href) = if entry.is_dir {
            ("[Folder]", format!("{}/", entry.name))
        } else {
            ("[File]", entry.name.clone())
        };
        items.push_str(&format!(
            "<li> {} <a href=\"{}\"> {} </a> </li>",
            kind, href, entry.name
        ));
    }

    let hidden: Vec<&str> = hidden.into_iter().map(String::as_str).collect();

    format!(
        "<!DOCTYPE html><html><head><title>Index for: {path}</title></head><body><h3>Index for: {path}</h3><hr><ul> {items} </ul> {ignored} files ignored ({hidden}){footer}</body></html>",
        path = web_path,
        items = items,
        ignored = ignored,
        hidden = hidden.join(", "),
        footer = footer(),
    )
}
