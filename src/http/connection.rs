use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::parser::{parse_request_head, ParseError};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::site::router::Router;

/// Sent before reading a POST body when `legacy_post_ack` is on.
pub const LEGACY_POST_ACK: &[u8] = b"HTTP/1.1 200 OK\r\n";

/// Serves exactly one request on one client connection.
pub struct Connection<S = TcpStream> {
    stream: S,
    peer: SocketAddr,
    buffer: BytesMut,
    router: Arc<Router>,
    legacy_post_ack: bool,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Routing(Request),
    Writing(Request, Response),
    /// Reading or routing failed; a 500 is owed to the client
    Failed(anyhow::Error),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, router: Arc<Router>) -> Self {
        Self {
            stream,
            peer,
            buffer: BytesMut::with_capacity(4096),
            router,
            legacy_post_ack: false,
            state: ConnectionState::Reading,
        }
    }

    pub fn legacy_post_ack(mut self, enabled: bool) -> Self {
        self.legacy_post_ack = enabled;
        self
    }

    /// Drives the connection from the first byte read to close.
    ///
    /// An error means a prepared response failed to reach the client. A
    /// fallback 500 that cannot be delivered is logged here and the
    /// connection just closes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(Some(req)) => ConnectionState::Routing(req),
                    Ok(None) => {
                        tracing::debug!(peer = %self.peer, "client closed before sending a request");
                        ConnectionState::Closed
                    }
                    Err(e) => ConnectionState::Failed(e),
                },

                ConnectionState::Routing(req) => match self.router.route(&req).await {
                    Ok(response) => ConnectionState::Writing(req, response),
                    Err(e) => ConnectionState::Failed(e),
                },

                ConnectionState::Writing(req, response) => {
                    match ResponseWriter::prepare(&response).await {
                        Ok(mut writer) => {
                            writer.write_to_stream(&mut self.stream).await?;
                            log_access(&req, &response);
                            ConnectionState::Closed
                        }
                        Err(e) => ConnectionState::Failed(e),
                    }
                }

                ConnectionState::Failed(e) => {
                    tracing::warn!(
                        peer = %self.peer,
                        error = %e,
                        "error while processing request, sending 500"
                    );
                    if let Err(send_err) = self.send_internal_error().await {
                        tracing::error!(
                            peer = %self.peer,
                            error = %format!("{:#}", send_err),
                            "failed to send 500 response"
                        );
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => {
                    break;
                }
            };
        }

        // The peer may already be gone.
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    /// Reads one request: the head, then for POST exactly Content-Length
    /// bytes of body.
    ///
    /// Returns `None` when the client closed the connection without
    /// sending anything.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let (head, consumed) = loop {
            // Try parsing whatever we already have
            match parse_request_head(&self.buffer) {
                Ok(parsed) => break parsed,

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    return Err(anyhow!("HTTP parse error: {:?}", e));
                }
            }

            if self.fill_buffer().await? == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(anyhow!("HTTP parse error: {:?}", ParseError::Incomplete));
            }
        };

        self.buffer.advance(consumed);

        let body_len = head
            .body_length()
            .map_err(|e| anyhow!("HTTP parse error: {:?}", e))?;

        if head.method == Method::POST && self.legacy_post_ack {
            self.stream.write_all(LEGACY_POST_ACK).await?;
            self.stream.flush().await?;
        }

        while self.buffer.len() < body_len {
            if self.fill_buffer().await? == 0 {
                return Err(anyhow!("HTTP parse error: {:?}", ParseError::Incomplete));
            }
        }

        let body = self.buffer.split_to(body_len).to_vec();
        Ok(Some(head.into_request(body, self.peer.ip().to_string())))
    }

    async fn fill_buffer(&mut self) -> std::io::Result<usize> {
        self.buffer.reserve(4096);
        self.stream.read_buf(&mut self.buffer).await
    }

    async fn send_internal_error(&mut self) -> anyhow::Result<()> {
        let response = Response::internal_error();
        let mut writer = ResponseWriter::prepare(&response).await?;
        writer.write_to_stream(&mut self.stream).await
    }
}

fn log_access(req: &Request, response: &Response) {
    tracing::info!(
        client = %req.client_addr,
        method = %req.method.as_str(),
        status = response.status().as_u16(),
        target = %req.display_target(),
        user_agent = %req.header("User-Agent").unwrap_or("-"),
        "request served"
    );
}
