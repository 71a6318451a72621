//! Request routing
//!
//! Maps a request onto the web root and decides how to answer it:
//! directory listing, redirect, static file, CGI script or an error page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::http::mime::{content_type_for, path_extension};
use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::site::cgi::CgiBridge;
use crate::site::listing::read_listing;
use crate::site::templates::directory_page;

pub struct Router {
    site: Arc<SiteConfig>,
    cgi: CgiBridge,
}

impl Router {
    pub fn new(site: Arc<SiteConfig>) -> Self {
        let cgi = CgiBridge::from_config(&site);
        Self { site, cgi }
    }

    /// `/forbidden` and `/forbidden/` name the same directory.
    fn is_forbidden(&self, request_path: &str) -> bool {
        let forbidden = &self.site.forbidden_paths;
        forbidden.contains(request_path)
            || request_path
                .strip_suffix('/')
                .is_some_and(|trimmed| forbidden.contains(trimmed))
    }

    /// Filesystem path for a request path: the web root with the request
    /// path appended as-is.
    pub fn resolve(&self, request_path: &str) -> PathBuf {
        let mut path = self.site.web_root.clone().into_os_string();
        path.push(request_path);
        PathBuf::from(path)
    }

    /// Decides the response for `request`.
    ///
    /// Everything the client can cause is answered with a 4xx page, and a
    /// failing CGI script with a 500 page. The error path is left to the
    /// connection's catch-all.
    pub async fn route(&self, request: &Request) -> anyhow::Result<Response> {
        if !request.method.is_supported() {
            return Ok(Response::bad_request());
        }

        if request.path.split('/').any(|segment| segment == "..") {
            return Ok(Response::forbidden());
        }

        let file_path = self.resolve(&request.path);

        if is_directory(&file_path).await {
            return Ok(self.directory(&file_path, request).await);
        }

        if request.path.ends_with('/') {
            return Ok(Response::not_found());
        }

        Ok(self.file(file_path, request).await)
    }

    async fn directory(&self, dir: &Path, request: &Request) -> Response {
        if self.is_forbidden(&request.path) {
            return Response::forbidden();
        }

        let listing = match read_listing(dir, &self.site.hidden_extensions).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::debug!(path = %dir.display(), error = %e, "directory not readable");
                return Response::forbidden();
            }
        };

        if !request.path.ends_with('/') {
            return match request.header("Host") {
                Some(host) => Response::moved_permanently(format!("http://{}{}/", host, request.path)),
                None => Response::bad_request(),
            };
        }

        let page = directory_page(
            &request.path,
            &listing.entries,
            listing.ignored,
            &self.site.hidden_extensions,
        );

        ResponseBuilder::new(StatusCode::Ok)
            .content_type("text/html")
            .text(page)
            .build()
    }

    async fn file(&self, file_path: PathBuf, request: &Request) -> Response {
        // Readable means we can open it.
        if tokio::fs::File::open(&file_path).await.is_err() {
            return Response::not_found();
        }

        if path_extension(&file_path) == self.site.cgi_extension {
            return match self.cgi.invoke(&file_path, request).await {
                Ok(output) => ResponseBuilder::new(StatusCode::Ok)
                    .content_type(output.content_type)
                    .text(output.body)
                    .build(),
                Err(e) => {
                    tracing::warn!(
                        script = %file_path.display(),
                        error = %e,
                        "CGI script failed"
                    );
                    Response::internal_error()
                }
            };
        }

        ResponseBuilder::new(StatusCode::Ok)
            .content_type(content_type_for(&file_path))
            .file(file_path)
            .build()
    }
}

/// Whether `path` names a directory. Any path we cannot stat (missing,
/// unreadable, name too long, symlink loop) is not one, and is left for
/// the file branch to answer.
async fn is_directory(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_dir(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot stat");
            false
        }
    }
}
