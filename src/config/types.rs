// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Routes configuration: the dispatch chain assembled at startup
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    /// Directory mounts, registered in order
    #[serde(default)]
    pub mounts: Vec<MountConfig>,
    /// Files tried when a request path is a directory
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// Register a catch-all homepage at the end of the chain
    #[serde(default = "default_homepage_enabled")]
    pub default_homepage: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_homepage_enabled() -> bool {
    true
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            mounts: Vec::new(),
            index_files: default_index_files(),
            default_homepage: default_homepage_enabled(),
        }
    }
}

/// One directory mounted under a path prefix
#[derive(Debug, Deserialize, Clone)]
pub struct MountConfig {
    /// Path prefix, e.g. "/static"; empty mounts at the server root
    pub prefix: String,
    /// Directory served from this prefix
    pub dir: String,
    /// Wrap the mount in the caching decorator
    #[serde(default)]
    pub cached: bool,
    /// Client-side cache lifetime in seconds (0 disables)
    #[serde(default)]
    pub client_cache_seconds: i32,
}
