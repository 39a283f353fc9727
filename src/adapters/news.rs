use url::Url;

use crate::data_models::{NewsCard, NewsCardType, NewsResults, Publisher};
use crate::envelope::Status;
use crate::error::AdapterError;
use crate::fetch::UpstreamClient;
use crate::scrapper::{self, ScrapedResult};

pub const MAX_CARDS: usize = 15;
pub const DEFAULT_QUERY: &str = "top stories";
const FALLBACK_PUBLISHER: &str = "News";
const LOCALE: &str = "us-en";

/// Unlike the other adapters an empty query is fine: it becomes "top stories".
pub async fn search(client: &UpstreamClient, query: Option<&str>) -> Result<NewsResults, AdapterError> {
    let query = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUERY);
    let qualified = format!("{query} news");

    let html = client
        .get(
            &client.endpoints().duckduckgo_html,
            &[("q", qualified.as_str()), ("kl", LOCALE)],
        )
        .map_err(|e| AdapterError::from_fetch("news results", e))?
        .browser()
        .text()
        .await
        .map_err(|e| AdapterError::from_fetch("news results", e))?;

    let cards = cards_from_html(&html);
    if cards.is_empty() {
        return Err(AdapterError::not_found("no news results found"));
    }

    Ok(NewsResults {
        status: Status::Success,
        cards,
    })
}

pub fn cards_from_html(html: &str) -> Vec<NewsCard> {
    scrapper::parse_results(html, MAX_CARDS)
        .into_iter()
        .map(to_card)
        .collect()
}

fn to_card(scraped: ScrapedResult) -> NewsCard {
    let name = publisher_name(&scraped.display_url);
    NewsCard {
        kind: NewsCardType::Article,
        title: scraped.title,
        url: scraped.url,
        publisher: Publisher {
            icon: favicon_url(&name),
            name,
        },
        description: scraped.snippet,
    }
}

/// Host part of the shown URL, e.g. `www.bbc.com/news/x` -> `www.bbc.com`.
pub fn publisher_name(display_url: &str) -> String {
    if display_url.is_empty() {
        return FALLBACK_PUBLISHER.to_string();
    }
    Url::parse(&format!("https://{display_url}"))
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| display_url.to_string())
}

pub fn favicon_url(host: &str) -> String {
    format!(
        "https://www.google.com/s2/favicons?domain={}&sz=64",
        urlencoding::encode(host)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapper::fixtures::RESULTS_PAGE;

    #[test]
    fn test_publisher_name() {
        assert_eq!(publisher_name("www.bbc.com/news/world-123"), "www.bbc.com");
        assert_eq!(publisher_name(""), "News");
    }

    #[test]
    fn test_cards_from_html() {
        let cards = cards_from_html(RESULTS_PAGE);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].kind, NewsCardType::Article);
        assert_eq!(cards[0].publisher.name, "www.rust-lang.org");
        assert_eq!(
            cards[0].publisher.icon,
            "https://www.google.com/s2/favicons?domain=www.rust-lang.org&sz=64"
        );
        assert_eq!(cards[0].description, "A language empowering everyone.");
        // No display URL on the second block.
        assert_eq!(cards[1].publisher.name, "News");
    }

    #[test]
    fn test_card_type_serializes_as_integer() {
        let value = serde_json::to_value(&cards_from_html(RESULTS_PAGE)[0]).unwrap();
        assert_eq!(value["type"], 1);
    }
}
