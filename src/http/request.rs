use std::collections::HashMap;

/// HTTP request methods.
///
/// Only GET and POST are served; anything else is kept verbatim so the
/// router can answer it with 400 Bad Request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Submit a body, typically to a CGI script
    POST,
    /// Any other token found in the request line
    Other(String),
}

impl Method {
    /// Parses an HTTP method token. Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(s) => s,
        }
    }

    /// Returns true for the methods the server knows how to route.
    pub fn is_supported(&self) -> bool {
        matches!(self, Method::GET | Method::POST)
    }
}

/// Represents a parsed HTTP request from a client.
///
/// Built once per connection and never modified afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Request path without the query string (e.g. "/cgi/form.pl")
    pub path: String,
    /// Raw query string, empty when the target had no `?`
    pub query: String,
    /// HTTP version token from the request line (e.g. "HTTP/1.1")
    pub version: String,
    /// Headers with keys exactly as the client sent them
    pub headers: HashMap<String, String>,
    /// Request body, only ever filled for POST
    pub body: Vec<u8>,
    /// IP address of the peer
    pub client_addr: String,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    client_addr: String,
}

/// Splits a request target at the first `?` into path and query.
///
/// # Example
///
/// ```
/// # use lantern::http::request::split_target;
/// assert_eq!(split_target("/a.pl?x=1?y"), ("/a.pl", "x=1?y"));
/// assert_eq!(split_target("/index.html"), ("/index.html", ""));
/// ```
pub fn split_target(target: &str) -> (&str, &str) {
    target.split_once('?').unwrap_or((target, ""))
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            target: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
            client_addr: String::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the request target; a `?` in it starts the query string.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn client_addr(mut self, addr: impl Into<String>) -> Self {
        self.client_addr = addr.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let target = self.target.ok_or("target missing")?;
        let (path, query) = split_target(&target);

        // Bodies only travel with POST.
        let body = if method == Method::POST {
            self.body
        } else {
            Vec::new()
        };

        Ok(Request {
            method,
            path: path.to_string(),
            query: query.to_string(),
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body,
            client_addr: self.client_addr,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Retrieves a header value by its exact name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(key)
            .map(|v| v.as_str())
    }

    /// `Host` header followed by the request path, as used in access logs.
    pub fn display_target(&self) -> String {
        format!("{}{}", self.header("Host").unwrap_or(""), self.path)
    }
}
