//! CGI script execution
//!
//! Scripts run under an external interpreter with a small, fixed
//! environment. Their output uses a reduced CGI contract: the first line
//! is a single `Name: value` header whose value becomes the content type,
//! and every following non-empty line is part of the body.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::config::SiteConfig;
use crate::http::request::{Method, Request};

/// What a script produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgiOutput {
    pub content_type: String,
    /// Body lines, each terminated by CRLF
    pub body: String,
}

/// Runs CGI scripts on behalf of the router
#[derive(Debug, Clone)]
pub struct CgiBridge {
    interpreter: PathBuf,
    home: PathBuf,
}

impl CgiBridge {
    pub fn new(interpreter: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            home: home.into(),
        }
    }

    pub fn from_config(site: &SiteConfig) -> Self {
        Self::new(&site.cgi_interpreter, &site.cgi_home)
    }

    /// Environment passed to the script for `request`.
    pub fn environment(&self, request: &Request) -> Vec<(String, String)> {
        let mut env = vec![
            ("REQUEST_METHOD".to_string(), request.method.as_str().to_string()),
            ("QUERY_STRING".to_string(), request.query.clone()),
            ("HOME".to_string(), self.home.to_string_lossy().into_owned()),
        ];

        if request.method == Method::POST {
            for (header, var) in [("Content-Type", "CONTENT_TYPE"), ("Content-Length", "CONTENT_LENGTH")] {
                if let Some(value) = request.header(header) {
                    env.push((var.to_string(), value.to_string()));
                }
            }
        }

        env
    }

    /// Runs `script` for `request` and collects its output.
    ///
    /// This function:
    /// 1. Spawns the interpreter with the script path as its argument
    /// 2. For POST, writes the request body to its stdin and closes it,
    ///    while at the same time
    /// 3. reading the content type from the first output line and
    /// 4. collecting the remaining non-empty lines as the body
    pub async fn invoke(&self, script: &Path, request: &Request) -> Result<CgiOutput> {
        let is_post = request.method == Method::POST;

        let mut child = Command::new(&self.interpreter)
            .arg(script)
            .env_clear()
            .envs(self.environment(request))
            .stdin(if is_post { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| {
                format!(
                    "failed to launch {} for {}",
                    self.interpreter.display(),
                    script.display()
                )
            })?;

        tracing::trace!(script = %script.display(), "CGI process started");

        let stdout = child
            .stdout
            .take()
            .context("CGI process has no stdout")?;

        // Scripts may write before they read; both pipes are serviced at once.
        let stdin = child.stdin.take();
        let feed = async {
            if let Some(mut stdin) = stdin {
                stdin
                    .write_all(&request.body)
                    .await
                    .context("failed to write request body to CGI process")?;
                stdin.shutdown().await?;
            }
            Ok::<(), anyhow::Error>(())
        };
        let (fed, output) = tokio::join!(feed, read_output(BufReader::new(stdout)));
        fed?;
        let output = output?;

        let status = child.wait().await.context("failed to reap CGI process")?;
        if !status.success() {
            tracing::debug!(script = %script.display(), %status, "CGI process exited unsuccessfully");
        }

        Ok(output)
    }
}

/// Parses script output: a header line, then body lines.
pub async fn read_output<R>(reader: R) -> Result<CgiOutput>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    let header = lines
        .next_line()
        .await?
        .context("CGI script produced no output")?;
    let (_, content_type) = header
        .split_once(':')
        .with_context(|| format!("malformed CGI header line: {:?}", header))?;

    let mut body = String::new();
    while let Some(line) = lines.next_line().await? {
        if !line.is_empty() {
            body.push_str(&line);
            body.push_str("\r\n");
        }
    }

    Ok(CgiOutput {
        content_type: content_type.trim().to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn header_then_body_lines() {
        let raw: &[u8] = b"Content-Type: text/plain\n\nhello\n\nworld\n";
        let out = read_output(raw).await.unwrap();

        assert_eq!(out.content_type, "text/plain");
        assert_eq!(out.body, "hello\r\nworld\r\n");
    }

    #[tokio::test]
    async fn missing_header_is_an_error() {
        let raw: &[u8] = b"";
        assert!(read_output(raw).await.is_err());

        let raw: &[u8] = b"no colon here\nbody\n";
        assert!(read_output(raw).await.is_err());
    }
}
