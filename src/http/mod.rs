//! HTTP protocol implementation.
//!
//! This module implements the wire side of a one-request-per-connection
//! HTTP/1.1 server.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The per-connection state machine driving parse, route and respond
//! - **`parser`**: Parses request heads from byte buffers
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes responses and streams file bodies to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for request head (and POST body)
//!        └──────┬──────┘
//!               │ Request received ──── parse error ───┐
//!               ▼                                      │
//!        ┌──────────────────┐                          │
//!        │     Routing      │ ── unexpected error ─────┤
//!        └──────┬───────────┘                          ▼
//!               │ Response ready              ┌──────────────────┐
//!               ▼                             │      Failed      │ ← Send 500
//!        ┌──────────────────┐                 └────────┬─────────┘
//!        │    Writing       │ ← Send response          │
//!        └──────┬───────────┘                          │
//!               ▼                                      │
//!        ┌──────────────────┐                          │
//!        │     Closed       │ ◄────────────────────────┘
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lantern::config::SiteConfig;
//! use lantern::http::connection::Connection;
//! use lantern::site::router::Router;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let router = Arc::new(Router::new(Arc::new(SiteConfig::rooted_at("/srv/www"))));
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let router = router.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, peer, router);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
