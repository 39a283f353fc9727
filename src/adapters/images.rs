//! DuckDuckGo image search. The JSON endpoint needs a short-lived `vqd` token
//! scraped from the regular search page first.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::REFERER;
use serde::Deserialize;

use crate::data_models::{ImageResult, ImageSearchResults};
use crate::envelope::Status;
use crate::error::{AdapterError, require};
use crate::fetch::UpstreamClient;

pub const MAX_RESULTS: usize = 20;
const TOKEN_ERROR: &str = "failed to get search token";

static VQD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"vqd=["']?([^"'&]+)"#).expect("valid vqd pattern"));
static VQD_NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"vqd=(\d+-\d+(?:-\d+)?)").expect("valid vqd pattern"));

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    results: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

impl From<RawImage> for ImageResult {
    fn from(raw: RawImage) -> Self {
        ImageResult {
            title: raw.title,
            url: raw.url,
            image: raw.image,
            thumbnail: raw.thumbnail,
            source: raw.source,
            width: raw.width,
            height: raw.height,
        }
    }
}

fn safe_search(nsfw: bool) -> &'static str {
    if nsfw { "-1" } else { "1" }
}

pub async fn search(
    client: &UpstreamClient,
    query: Option<&str>,
    nsfw: bool,
) -> Result<ImageSearchResults, AdapterError> {
    let query = require(query, "q")?;
    let endpoints = client.endpoints();

    let seed_page = client
        .get(&endpoints.duckduckgo, &[("q", query), ("iax", "images"), ("ia", "images")])
        .map_err(|e| AdapterError::from_fetch("search token", e))?
        .browser()
        .text()
        .await
        .map_err(|e| AdapterError::Upstream {
            message: TOKEN_ERROR.to_string(),
            source: e,
        })?;

    let token = extract_token(&seed_page).ok_or_else(|| AdapterError::parse(TOKEN_ERROR))?;

    let response: ImageResponse = client
        .get(
            &endpoints.duckduckgo_images,
            &[
                ("l", "us-en"),
                ("o", "json"),
                ("q", query),
                ("vqd", token.as_str()),
                ("f", ",,,,,"),
                ("p", safe_search(nsfw)),
            ],
        )
        .map_err(|e| AdapterError::from_fetch("image results", e))?
        .browser()
        .header(REFERER, "https://duckduckgo.com/")
        .json()
        .await
        .map_err(|e| AdapterError::from_fetch("image results", e))?;

    let results: Vec<ImageResult> = response
        .results
        .into_iter()
        .take(MAX_RESULTS)
        .map(ImageResult::from)
        .collect();

    if results.is_empty() {
        return Err(AdapterError::not_found("no image results found"));
    }

    Ok(ImageSearchResults {
        status: Status::Success,
        results,
    })
}

/// Finds the `vqd` token in the seed page, trying the quoted form first and
/// the bare numeric form second.
pub fn extract_token(page: &str) -> Option<String> {
    [&*VQD_TOKEN, &*VQD_NUMERIC_TOKEN]
        .into_iter()
        .find_map(|pattern| pattern.captures(page))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_quoted_token() {
        let page = r#"<script>DDG.deep.initialize('/d.js?q=cats&vqd="4-1234567890123456789012345678901234567"&p=1');</script>"#;
        assert_eq!(
            extract_token(page).as_deref(),
            Some("4-1234567890123456789012345678901234567")
        );
    }

    #[test]
    fn test_extract_unquoted_token() {
        let page = "nrj('/d.js?q=cats&t=D&vqd=4-987654321-12&kl=wt-wt')";
        assert_eq!(extract_token(page).as_deref(), Some("4-987654321-12"));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(extract_token("<html><body>no token here</body></html>"), None);
    }

    #[test]
    fn test_raw_image_defaults() {
        let raw: ImageResponse =
            serde_json::from_str(r#"{"results":[{"title":"cat","image":"https://i/cat.jpg"}]}"#)
                .unwrap();
        let image = ImageResult::from(raw.results.into_iter().next().unwrap());
        assert_eq!(image.title, "cat");
        assert_eq!(image.width, 0);
        assert_eq!(image.thumbnail, "");
    }
}
