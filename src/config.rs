use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "ROOTSERVE_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_backlog")]
    pub backlog: u32,
    /// Seconds to wait for the request. Unset means a request read may
    /// block forever; `0` is rejected when the config is loaded.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_backlog() -> u32 {
    128
}

fn default_root() -> PathBuf {
    PathBuf::from("/dist")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            backlog: default_backlog(),
            read_timeout_secs: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self { root: default_root() }
    }
}

impl Config {
    /// Reads the file named by `ROOTSERVE_CONFIG`, if any, then applies the
    /// `LISTEN` and `CONTENT_ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let yaml = match std::env::var(CONFIG_ENV) {
            Ok(path) => Some(
                std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?,
            ),
            Err(_) => None,
        };

        Self::from_sources(yaml.as_deref(), |key| std::env::var(key).ok())
    }

    /// Builds a config from optional YAML text and an environment lookup.
    pub fn from_sources(
        yaml: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut cfg = match yaml {
            Some(text) => serde_yaml::from_str(text).context("parsing config")?,
            None => Config::default(),
        };

        if let Some(addr) = env("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Some(root) = env("CONTENT_ROOT") {
            cfg.content.root = PathBuf::from(root);
        }

        if cfg.server.read_timeout_secs == Some(0) {
            anyhow::bail!("server.read_timeout_secs must be at least 1, or left unset");
        }

        Ok(cfg)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address {}", self.server.listen_addr))
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.server.read_timeout_secs.map(Duration::from_secs)
    }
}
