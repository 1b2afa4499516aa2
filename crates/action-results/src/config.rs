// File: src/config.rs
// Purpose: Configuration parsing from action-results.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::negotiation::FormatterOptions;
use crate::routes::{RouteTable, RouteValues};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub formatting: FormatterOptions,

    /// Named routes used for URL generation, in match order
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Body chunks buffered per streamed response
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

/// Where file results read from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Application root directory (default: ".")
    #[serde(default = "default_content_root")]
    pub content_root: String,

    /// Web root, relative to the content root unless absolute (default: "wwwroot")
    #[serde(default = "default_web_root")]
    pub web_root: String,
}

/// One named route template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteConfig {
    pub name: String,
    pub template: String,

    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_stream_buffer() -> usize {
    16
}

fn default_content_root() -> String {
    ".".to_string()
}

fn default_web_root() -> String {
    "wwwroot".to_string()
}

fn default_routes() -> Vec<RouteConfig> {
    vec![RouteConfig {
        name: "default".to_string(),
        template: "{controller=Home}/{action=Index}/{id?}".to_string(),
        defaults: BTreeMap::new(),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfig::default(),
            formatting: FormatterOptions::default(),
            routes: default_routes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            stream_buffer: default_stream_buffer(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            web_root: default_web_root(),
        }
    }
}

impl ContentConfig {
    pub fn content_root_path(&self) -> PathBuf {
        PathBuf::from(&self.content_root)
    }

    pub fn web_root_path(&self) -> PathBuf {
        let web_root = Path::new(&self.web_root);
        if web_root.is_absolute() {
            web_root.to_path_buf()
        } else {
            self.content_root_path().join(web_root)
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./action-results.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("action-results.toml")
    }

    /// Apply `HOST` and `PORT` from the environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn route_table(&self) -> Result<RouteTable> {
        let mut table = RouteTable::new();
        for route in &self.routes {
            let defaults: RouteValues = route.defaults.iter().collect();
            table
                .add(route.name.clone(), &route.template, defaults)
                .with_context(|| format!("Invalid route '{}'", route.name))?;
        }
        Ok(table)
    }
}
