use serde::Deserialize;

/// Main configuration structure for feedharvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    pub harvest: HarvestConfig,
    pub output: OutputConfig,
}

/// HTTP session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory for best-effort error snapshots; disabled when absent
    #[serde(rename = "snapshot-dir", default)]
    pub snapshot_dir: Option<String>,
}

/// Forwarding proxy configuration
///
/// When present, every request URL is rewritten to route through the proxy
/// endpoint with the original URL as a query parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Base URL of the forwarding proxy endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// API key for the proxy service
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Geolocation to request from the proxy
    #[serde(default = "default_country")]
    pub country: String,
}

/// Harvest behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Base URL of the content-aggregation API
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Listing feeds to harvest, in order
    pub listings: Vec<String>,

    /// Maximum number of items requested per listing
    #[serde(rename = "page-limit", default = "default_page_limit")]
    pub page_limit: u32,

    /// Retries after the first attempt; N permits N + 1 total attempts
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Number of detail fetches in flight at once
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where CSV tables are written
    #[serde(rename = "data-dir")]
    pub data_dir: String,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
        .to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_country() -> String {
    "us".to_string()
}

fn default_page_limit() -> u32 {
    100
}

fn default_max_retries() -> u32 {
    3
}

fn default_batch_size() -> usize {
    10
}
