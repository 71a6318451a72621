//! Lantern - a small HTTP/1.1 web server
//!
//! Serves static files and directory listings from a web root and runs
//! CGI scripts, one request per connection.

pub mod config;
pub mod http;
pub mod server;
pub mod site;
