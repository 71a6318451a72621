use anyhow::Context;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response, StatusCode};
use crate::site::templates::SERVER_NAME;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Size of the chunks a file body is streamed in
pub const CHUNK_SIZE: usize = 8192;

/// Serializes the status line and headers, including the blank line that
/// separates them from the body.
pub fn serialize_head(resp: &Response, content_length: u64) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status().as_u16(),
        resp.status().reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    if resp.status() == StatusCode::MovedPermanently {
        if let Some(location) = resp.location() {
            buf.extend_from_slice(format!("Location: {}\r\n", location).as_bytes());
        }
    }

    buf.extend_from_slice(format!("Server: {}\r\n", SERVER_NAME).as_bytes());
    buf.extend_from_slice(format!("Content-Type: {}\r\n", resp.content_type()).as_bytes());
    buf.extend_from_slice(format!("Content-Length: {}\r\n", content_length).as_bytes());

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

enum PreparedBody {
    /// Text body plus its trailing CRLF
    Text(Vec<u8>),
    File(File),
}

/// Writes one response onto a stream.
///
/// Preparing opens any file body up front, so a missing file is reported
/// before a single byte reaches the client.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: PreparedBody,
}

impl ResponseWriter {
    pub async fn prepare(response: &Response) -> anyhow::Result<Self> {
        match response.body() {
            Body::Text(text) => {
                let head = serialize_head(response, text.len() as u64);
                let mut body = Vec::with_capacity(text.len() + 2);
                body.extend_from_slice(text.as_bytes());
                body.extend_from_slice(b"\r\n");
                Ok(Self { head, body: PreparedBody::Text(body) })
            }
            Body::File(path) => {
                let file = File::open(path)
                    .await
                    .with_context(|| format!("cannot open {}", path.display()))?;
                let len = file.metadata().await?.len();
                let head = serialize_head(response, len);
                Ok(Self { head, body: PreparedBody::File(file) })
            }
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;

        match &mut self.body {
            PreparedBody::Text(body) => {
                stream.write_all(body).await?;
            }
            PreparedBody::File(file) => {
                let mut chunk = vec![0u8; CHUNK_SIZE];
                loop {
                    let n = file.read(&mut chunk).await?;
                    if n == 0 {
                        break;
                    }
                    stream.write_all(&chunk[..n]).await?;
                }
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
