use crate::http::request::{split_target, Method, Request};
use std::collections::HashMap;

/// Largest request head (request line plus headers) accepted, in bytes.
pub const MAX_HEAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line has fewer than three space-separated tokens
    InvalidRequestLine,
    /// POST without a numeric Content-Length header
    InvalidContentLength,
    HeadTooLarge,
    /// More bytes are needed before the head can be parsed
    Incomplete,
}

/// Request line and headers, parsed before any body bytes are read.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub target: String,
    pub version: String,
    pub headers: HashMap<String, String>,
}

impl RequestHead {
    /// Number of body bytes that follow the head.
    ///
    /// Only POST carries a body, and for POST the Content-Length header
    /// is mandatory.
    pub fn body_length(&self) -> Result<usize, ParseError> {
        if self.method != Method::POST {
            return Ok(0);
        }

        self.headers
            .get("Content-Length")
            .ok_or(ParseError::InvalidContentLength)?
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength)
    }

    /// Completes the request with its body and the peer address.
    pub fn into_request(self, body: Vec<u8>, client_addr: impl Into<String>) -> Request {
        let (path, query) = split_target(&self.target);
        let body = if self.method == Method::POST { body } else { Vec::new() };

        Request {
            path: path.to_string(),
            query: query.to_string(),
            method: self.method,
            version: self.version,
            headers: self.headers,
            body,
            client_addr: client_addr.into(),
        }
    }
}

/// Parses the request head at the start of `buf`.
///
/// On success returns the head and the number of bytes it occupied,
/// including the blank line that ends it. Any body bytes are left for
/// the caller.
pub fn parse_request_head(buf: &[u8]) -> Result<(RequestHead, usize), ParseError> {
    let (head_end, consumed) = match find_head_end(buf) {
        Some(found) => found,
        None if buf.len() > MAX_HEAD_SIZE => return Err(ParseError::HeadTooLarge),
        None => return Err(ParseError::Incomplete),
    };

    if head_end > MAX_HEAD_SIZE {
        return Err(ParseError::HeadTooLarge);
    }

    let head = String::from_utf8_lossy(&buf[..head_end]);
    let mut lines = head
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;
    let tokens: Vec<&str> = request_line.split(' ').collect();
    if tokens.len() < 3 || tokens[0].is_empty() {
        return Err(ParseError::InvalidRequestLine);
    }

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        // Lines without a colon carry nothing we can use.
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.to_string(), value.trim().to_string());
        }
    }

    let head = RequestHead {
        method: Method::parse(tokens[0]),
        target: tokens[1].to_string(),
        version: tokens[2].to_string(),
        headers,
    };

    Ok((head, consumed))
}

/// Finds the blank line ending the head. Returns the offset of the
/// newline that terminates the last header line and the offset just past
/// the blank line.
fn find_head_end(buf: &[u8]) -> Option<(usize, usize)> {
    buf.iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .find_map(|(i, _)| match &buf[i + 1..] {
            [b'\n', ..] => Some((i, i + 2)),
            [b'\r', b'\n', ..] => Some((i, i + 3)),
            _ => None,
        })
}
