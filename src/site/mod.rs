//! Site logic: what a request maps to on disk and how it is answered.
//!
//! - **`router`**: decides between listing, redirect, static file and CGI
//! - **`listing`**: reads directories for index pages
//! - **`cgi`**: runs scripts under an external interpreter
//! - **`templates`**: the HTML pages the server renders itself

pub mod cgi;
pub mod listing;
pub mod router;
pub mod templates;
