use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Server configuration, loaded once at startup and shared read-only
/// between connections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds, e.g. "0.0.0.0:21215"
    pub listen_addr: String,
    /// Write a bare `HTTP/1.1 200 OK` line before reading a POST body.
    /// Some old clients wait for it; conforming clients get confused by it.
    pub legacy_post_ack: bool,
}

/// Everything the router and the CGI bridge need to know about the site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub web_root: PathBuf,
    /// Extension (without the dot) of files executed as CGI scripts
    pub cgi_extension: String,
    pub cgi_interpreter: PathBuf,
    /// Value of `HOME` in the CGI environment
    pub cgi_home: PathBuf,
    /// Extensions left out of directory listings
    pub hidden_extensions: BTreeSet<String>,
    /// Request paths of directories that are never listed
    pub forbidden_paths: BTreeSet<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:21215".to_string(),
            legacy_post_ack: false,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let web_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::rooted_at(web_root)
    }
}

impl SiteConfig {
    /// Default site settings serving `web_root`, with the CGI home set to
    /// its parent directory.
    pub fn rooted_at(web_root: impl Into<PathBuf>) -> Self {
        let web_root = web_root.into();
        let cgi_home = web_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| web_root.clone());

        Self {
            web_root,
            cgi_extension: "pl".to_string(),
            cgi_interpreter: PathBuf::from("/usr/bin/perl"),
            cgi_home,
            hidden_extensions: ["java", "class"].iter().map(|s| s.to_string()).collect(),
            forbidden_paths: ["/forbidden"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Reads the YAML file named by `LANTERN_CONFIG` when set, otherwise
    /// starts from defaults. `LISTEN` and `WEB_ROOT` override the file.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("LANTERN_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        if let Ok(web_root) = std::env::var("WEB_ROOT") {
            cfg.site.web_root = PathBuf::from(web_root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
