//! HTTP client for Amazon requests using wreq for TLS fingerprint emulation.

use crate::amazon::models::ProductRecord;
use crate::amazon::parser::Parser;
use crate::amazon::regions::Region;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Anything that can turn a product URL (or ASIN, or path) into a record.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_product(&self, input: &str) -> Result<ProductRecord>;
}

/// Amazon HTTP client with browser impersonation and anti-bot measures.
pub struct AmazonClient {
    client: Client,
    region: Region,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl AmazonClient {
    /// Creates a new Amazon client with the given configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None).await
    }

    /// Creates a new Amazon client with an optional custom base URL (for testing).
    pub async fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            region: config.region,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    /// Returns the configured fallback region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns the base URL (custom for testing, or region-based for production).
    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| self.region.base_url())
    }

    /// Turns user input into a product URL and the marketplace it belongs to.
    ///
    /// A bare ASIN is expanded against the configured region. A URL is
    /// percent-decoded and its marketplace detected from the host, falling
    /// back to the configured region for unknown hosts.
    pub fn resolve_url(&self, input: &str) -> Result<(String, Region)> {
        let input = input.trim();

        if is_asin(input) {
            let asin = input.to_uppercase();
            return Ok((format!("{}/dp/{}", self.base_url(), asin), self.region));
        }

        if !(input.starts_with("http://") || input.starts_with("https://")) {
            anyhow::bail!("Not a product URL or ASIN: {}", input);
        }

        let url = urlencoding::decode(input)
            .with_context(|| format!("Invalid percent-encoding in URL: {}", input))?
            .into_owned();

        let region = Region::from_url(&url).unwrap_or_else(|| {
            debug!("Unknown marketplace host, using configured region {}", self.region);
            self.region
        });

        Ok((url, region))
    }

    /// Performs a GET request with all anti-bot measures.
    async fn get(&self, url: &str, region: Region) -> Result<String> {
        // Add human-like delay with jitter
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", region.accept_language())
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider using a proxy or increasing delay.");
            anyhow::bail!("Rate limited by Amazon. Try increasing --delay or using a proxy.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        // Check for redirect to different region
        let final_url = response.uri().to_string();
        if !final_url.contains(region.domain()) && self.base_url.is_none() {
            warn!(
                "Redirected to different domain: {}. Your IP may be associated with a different region.",
                final_url
            );
        }

        response.text().await.context("Failed to read response body")
    }

    /// Adds a random delay to mimic human behavior.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl ProductSource for AmazonClient {
    async fn fetch_product(&self, input: &str) -> Result<ProductRecord> {
        let (url, region) = self.resolve_url(input)?;

        info!("Fetching product: {} ({})", url, region);
        let html = self.get(&url, region).await?;

        Parser::new(region)
            .parse_product_page(&html, &url)
            .with_context(|| format!("Failed to parse product page: {}", url))
    }
}

/// Returns true for a 10-character alphanumeric ASIN.
fn is_asin(input: &str) -> bool {
    input.len() == 10 && input.chars().all(|c| c.is_ascii_alphanumeric())
}
