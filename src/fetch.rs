//! Shared upstream HTTP client. One instance is built at startup and cloned
//! into every handler; `reqwest::Client` is reference counted internally.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderName, USER_AGENT};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

pub const API_TIMEOUT: Duration = Duration::from_secs(10);
pub const BROWSER_TIMEOUT: Duration = Duration::from_secs(15);

const CLIENT_USER_AGENT: &str = concat!("meteor-gateway/", env!("CARGO_PKG_VERSION"));
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
const BROWSER_LANGUAGE: &str = "en-US,en;q=0.9";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("failed to decode upstream body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404 })
    }
}

/// Upstream locations. Defaults point at the public services; tests swap
/// them for a local fake.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub duckduckgo_html: String,
    pub duckduckgo: String,
    pub duckduckgo_images: String,
    pub nominatim: String,
    pub geocoding: String,
    pub forecast: String,
    pub lrclib: String,
    pub urban_dictionary: String,
    pub dictionary: String,
    pub garfield: String,
    pub otters: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            duckduckgo_html: "https://html.duckduckgo.com/html/".to_string(),
            duckduckgo: "https://duckduckgo.com/".to_string(),
            duckduckgo_images: "https://duckduckgo.com/i.js".to_string(),
            nominatim: "https://nominatim.openstreetmap.org/search".to_string(),
            geocoding: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
            lrclib: "https://lrclib.net/api/search".to_string(),
            urban_dictionary: "https://api.urbandictionary.com/v0/define".to_string(),
            dictionary: "https://api.dictionaryapi.dev/api/v2/entries/en/".to_string(),
            garfield: "https://www.gocomics.com/garfield/".to_string(),
            otters: "https://www.reddit.com/r/Otters/random.json".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
}

impl UpstreamClient {
    pub fn new(endpoints: Endpoints) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(BROWSER_TIMEOUT)
            .user_agent(CLIENT_USER_AGENT)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;
        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `base` with `params` appended as an encoded query string.
    pub fn get(&self, base: &str, params: &[(&str, &str)]) -> Result<UpstreamRequest, FetchError> {
        let url = if params.is_empty() {
            Url::parse(base)?
        } else {
            Url::parse_with_params(base, params)?
        };
        Ok(self.get_url(url))
    }

    pub fn get_url(&self, url: Url) -> UpstreamRequest {
        UpstreamRequest {
            url: url.to_string(),
            builder: self.http.get(url).timeout(API_TIMEOUT),
        }
    }
}

/// A pending upstream GET. Plain API profile by default; `browser()` switches
/// to browser-like headers for upstreams that reject non-browser clients.
pub struct UpstreamRequest {
    url: String,
    builder: reqwest::RequestBuilder,
}

impl UpstreamRequest {
    pub fn browser(mut self) -> Self {
        self.builder = self
            .builder
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, BROWSER_ACCEPT)
            .header(ACCEPT_LANGUAGE, BROWSER_LANGUAGE)
            .timeout(BROWSER_TIMEOUT);
        self
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Sends the request and rejects non-2xx responses. The body of a rejected
    /// response is drained before returning.
    pub async fn send(self) -> Result<reqwest::Response, FetchError> {
        let response = self.builder.send().await.map_err(|e| {
            tracing::debug!(url = %self.url, error = %e, "upstream request failed");
            FetchError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %self.url, status = status.as_u16(), "upstream rejected request");
            let _ = response.bytes().await;
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    pub async fn json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn text(self) -> Result<String, FetchError> {
        Ok(self.send().await?.text().await?)
    }

    pub async fn bytes(self) -> Result<Vec<u8>, FetchError> {
        Ok(self.send().await?.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_encodes_params() {
        let client = UpstreamClient::new(Endpoints::default()).unwrap();
        let request = client
            .get("https://lrclib.net/api/search", &[("q", "never gonna & give")])
            .unwrap();
        assert_eq!(
            request.url,
            "https://lrclib.net/api/search?q=never+gonna+%26+give"
        );
    }

    #[test]
    fn test_get_rejects_relative_base() {
        let client = UpstreamClient::new(Endpoints::default()).unwrap();
        assert!(matches!(
            client.get("not a url", &[]),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(FetchError::Status { status: 404 }.is_not_found());
        assert!(!FetchError::Status { status: 500 }.is_not_found());
    }
}
