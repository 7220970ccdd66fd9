// src/site_config.rs
use crate::fallback_catalog::FallbackCatalog;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SITE_CONFIG_PATH: &str = "public/site-config.json";

const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8001/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to fetch site config: {0}")]
    Fetch(#[from] gloo_net::Error),

    #[error("site config request returned status {0}")]
    Status(u16),

    #[error("fallback catalog must contain at least one image")]
    EmptyFallbackCatalog,
}

/// Where property listings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    Scraper,
    Mock,
}

/// What to do with images served from a particular third-party host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostPolicy {
    /// Usable, but the CDN serves stale responses unless the URL is keyed per entity.
    CacheBust,
    /// Expiring or hotlink-protected; never requested.
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRule {
    pub host: String,
    pub policy: HostPolicy,
}

impl HostRule {
    pub fn new(host: &str, policy: HostPolicy) -> Self {
        Self {
            host: host.to_ascii_lowercase(),
            policy,
        }
    }

    /// Exact host or any subdomain of it.
    pub fn matches(&self, host: &str) -> bool {
        let rule = self.host.trim_start_matches('.').to_ascii_lowercase();
        if rule.is_empty() {
            return false;
        }
        let host = host.to_ascii_lowercase();
        host == rule
            || host
                .strip_suffix(rule.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePolicy {
    pub host_rules: Vec<HostRule>,
    /// Treat every `CacheBust` host as blocked as well.
    pub block_cache_bust_hosts: bool,
    pub cache_bust_param: String,
    /// Substrings that betray a scraper cache directory leaking into a remote field.
    pub local_path_markers: Vec<String>,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            host_rules: vec![HostRule::new("media.rightmove.co.uk", HostPolicy::CacheBust)],
            block_cache_bust_hosts: false,
            cache_bust_param: String::from("cb"),
            local_path_markers: vec![String::from("media_cache")],
        }
    }
}

impl ImagePolicy {
    /// First matching rule wins, so a host can only ever carry one policy.
    pub fn rule_for_host(&self, host: &str) -> Option<HostPolicy> {
        self.host_rules
            .iter()
            .find(|rule| rule.matches(host))
            .map(|rule| rule.policy)
    }

    pub fn has_local_path_marker(&self, url: &str) -> bool {
        url.contains('\\')
            || self
                .local_path_markers
                .iter()
                .any(|marker| !marker.is_empty() && url.contains(marker.as_str()))
    }
}

#[cfg(test)]
impl ImagePolicy {
    pub fn with_rule(mut self, host: &str, policy: HostPolicy) -> Self {
        self.host_rules.push(HostRule::new(host, policy));
        self
    }

    pub fn with_cache_bust_hosts_blocked(mut self, blocked: bool) -> Self {
        self.block_cache_bust_hosts = blocked;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub backend_base_url: String,
    pub data_source: DataSource,
    pub image_policy: ImagePolicy,
    pub fallback_catalog: FallbackCatalog,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            backend_base_url: option_env!("SCRAPER_API_BASE_URL")
                .unwrap_or(DEFAULT_BACKEND_BASE_URL)
                .to_string(),
            data_source: DataSource::default(),
            image_policy: ImagePolicy::default(),
            fallback_catalog: FallbackCatalog::default(),
        }
    }
}

impl SiteConfig {
    pub fn properties_url(&self) -> String {
        format!("{}/properties", self.backend_base_url.trim().trim_end_matches('/'))
    }
}

async fn fetch_site_config(url: &str) -> Result<SiteConfig, ConfigError> {
    let resp = Request::get(url).send().await?;
    if !resp.ok() {
        return Err(ConfigError::Status(resp.status()));
    }
    Ok(resp.json::<SiteConfig>().await?)
}

/// Load the deployed config file, falling back to compiled defaults.
pub async fn load_site_config(url: &str) -> SiteConfig {
    match fetch_site_config(url).await {
        Ok(config) => {
            log::info!(
                "Loaded site config: backend={} source={:?} fallback images={}",
                config.backend_base_url,
                config.data_source,
                config.fallback_catalog.len()
            );
            config
        }
        Err(e) => {
            log::warn!("Using default site config: {}", e);
            SiteConfig::default()
        }
    }
}
