use std::path::PathBuf;

use crate::site::templates;

/// HTTP status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::MovedPermanently => 301,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Payload of a response: either text held in memory or a file streamed
/// from disk when the response is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    File(PathBuf),
}

/// A complete HTTP response, ready for the writer.
///
/// A `Location` is present exactly when the status is 301; the only way
/// to get one is [`Response::moved_permanently`].
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    content_type: String,
    body: Body,
    location: Option<String>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use lantern::http::response::{Body, ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/plain")
///     .text("hello")
///     .build();
/// assert_eq!(response.body(), &Body::Text("hello".to_string()));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    body: Body,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    ///
    /// Redirects are built with [`Response::moved_permanently`] instead.
    pub fn new(status: StatusCode) -> Self {
        debug_assert!(status != StatusCode::MovedPermanently);
        Self {
            status,
            content_type: "text/html".to_string(),
            body: Body::Text(String::new()),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets an in-memory body, replacing any file set earlier.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Body::Text(body.into());
        self
    }

    /// Streams `path` as the body, replacing any text set earlier.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.body = Body::File(path.into());
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
            location: None,
        }
    }
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Creates a 301 redirect to `location` with a short HTML body.
    pub fn moved_permanently(location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            status: StatusCode::MovedPermanently,
            content_type: "text/html".to_string(),
            body: Body::Text(templates::moved_page(&location)),
            location: Some(location),
        }
    }

    /// Creates an HTML error page for `status`.
    pub fn error(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .content_type("text/html")
            .text(templates::error_page(status))
            .build()
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest)
    }

    pub fn forbidden() -> Self {
        Self::error(StatusCode::Forbidden)
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError)
    }
}
