use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub root: Root,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub limits: Limits,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Root {
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}
fn default_root_dir() -> PathBuf { PathBuf::from("server_workspace") }

impl Default for Root {
    fn default() -> Self { Self { root_dir: default_root_dir() } }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}
fn default_bind_addr() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 9090 }

impl Default for Server {
    fn default() -> Self { Self { bind_addr: default_bind_addr(), port: default_port() } }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Limits {
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
    /// Caps every response at this many bytes. Unset means responses are sent whole.
    #[serde(default)]
    pub max_response_bytes: Option<usize>,
    /// Bounds how many connections are handled at once. Unset means one task per
    /// accepted connection with no limit.
    #[serde(default)]
    pub max_connections: Option<usize>,
}
fn default_max_request_bytes() -> usize { 4096 }

impl Default for Limits {
    fn default() -> Self {
        Self { max_request_bytes: default_max_request_bytes(), max_response_bytes: None, max_connections: None }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.root.root_dir.as_os_str().is_empty() { anyhow::bail!("root_dir must not be empty"); }
        if self.limits.max_request_bytes == 0 { anyhow::bail!("max_request_bytes must be > 0"); }
        if self.limits.max_response_bytes == Some(0) { anyhow::bail!("max_response_bytes must be > 0 when set"); }
        if self.limits.max_connections == Some(0) { anyhow::bail!("max_connections must be > 0 when set"); }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.bind_addr, self.server.port)
    }

    /// Creates the root directory when it is missing and returns its canonical path.
    pub fn prepare_root(&self) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.root.root_dir)?;
        canonical_root(&self.root.root_dir)
    }
}

pub fn canonical_root(root: &Path) -> anyhow::Result<PathBuf> {
    let c = dunce::canonicalize(root)?;
    Ok(c)
}
