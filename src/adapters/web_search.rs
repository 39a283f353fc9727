use crate::data_models::{WebResult, WebResultCard, WebSearchResults, result_type};
use crate::envelope::Status;
use crate::error::{AdapterError, require};
use crate::fetch::UpstreamClient;
use crate::scrapper::{self, ScrapedResult};

pub const MAX_RESULTS: usize = 20;

/// `kp` values understood by the HTML endpoint.
fn safe_search(nsfw: bool) -> &'static str {
    if nsfw { "-2" } else { "1" }
}

pub async fn search(
    client: &UpstreamClient,
    query: Option<&str>,
    nsfw: bool,
) -> Result<WebSearchResults, AdapterError> {
    let query = require(query, "q")?;

    let html = client
        .get(
            &client.endpoints().duckduckgo_html,
            &[("q", query), ("kp", safe_search(nsfw))],
        )
        .map_err(|e| AdapterError::from_fetch("search results", e))?
        .browser()
        .text()
        .await
        .map_err(|e| AdapterError::from_fetch("search results", e))?;

    let results = results_from_html(&html);
    if results.is_empty() {
        return Err(AdapterError::not_found("no results found"));
    }

    Ok(WebSearchResults {
        status: Status::Success,
        results,
        doodle: None,
    })
}

pub fn results_from_html(html: &str) -> Vec<WebResultCard> {
    scrapper::parse_results(html, MAX_RESULTS)
        .into_iter()
        .map(|scraped| WebResultCard {
            kind: result_type::SEARCH_RESULT,
            result: to_web_result(scraped),
        })
        .collect()
}

fn to_web_result(scraped: ScrapedResult) -> WebResult {
    let display_link = if scraped.display_url.is_empty() {
        scrapper::host_of(&scraped.url)
    } else {
        scraped.display_url
    };
    WebResult {
        url: scraped.url,
        title: scraped.title,
        display_link,
        snippet: scraped.snippet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapper::fixtures::RESULTS_PAGE;

    #[test]
    fn test_display_link_falls_back_to_host() {
        let cards = results_from_html(RESULTS_PAGE);
        assert_eq!(cards.len(), 3);
        assert!(cards.iter().all(|c| c.kind == result_type::SEARCH_RESULT));
        assert_eq!(cards[0].result.display_link, "www.rust-lang.org/learn");
        assert_eq!(cards[1].result.display_link, "doc.rust-lang.org");
    }

    #[test]
    fn test_safe_search_flag() {
        assert_eq!(safe_search(false), "1");
        assert_eq!(safe_search(true), "-2");
    }

    #[test]
    fn test_payload_shape() {
        let payload = WebSearchResults {
            status: Status::Success,
            results: results_from_html(RESULTS_PAGE),
            doodle: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["status"], 0);
        assert_eq!(value["doodle"], serde_json::Value::Null);
        assert_eq!(value["results"][0]["type"], 1);
        assert_eq!(value["results"][0]["result"]["title"], "Learn Rust");
    }
}
