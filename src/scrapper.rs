//! Result-block extraction for DuckDuckGo's HTML endpoint, shared by the web
//! and news search adapters.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static RESULT_BLOCK: Lazy<Selector> = Lazy::new(|| selector("div.result, div.results_links"));
static RESULT_LINK: Lazy<Selector> = Lazy::new(|| selector("a.result__a"));
static RESULT_URL: Lazy<Selector> = Lazy::new(|| selector("a.result__url"));
static RESULT_SNIPPET: Lazy<Selector> = Lazy::new(|| selector("a.result__snippet"));

const REDIRECT_MARKER: &str = "duckduckgo.com/l/";
const REDIRECT_TARGET_PARAM: &str = "uddg";

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {css}: {e}"))
}

/// One organic result as it appears on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedResult {
    /// Destination with the redirect wrapper removed.
    pub url: String,
    pub title: String,
    /// The URL text shown under the title; may be empty.
    pub display_url: String,
    pub snippet: String,
}

/// Parses up to `limit` results. Blocks without a link or with an empty title
/// are skipped and do not count against the limit.
pub fn parse_results(html: &str, limit: usize) -> Vec<ScrapedResult> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_BLOCK)
        .filter_map(parse_block)
        .take(limit)
        .collect()
}

fn parse_block(block: ElementRef<'_>) -> Option<ScrapedResult> {
    let link = block.select(&RESULT_LINK).next()?;
    let href = link.value().attr("href").filter(|h| !h.is_empty())?;
    let url = resolve_redirect(href);

    let title = element_text(link);
    if title.is_empty() {
        return None;
    }

    let display_url = block
        .select(&RESULT_URL)
        .next()
        .map(element_text)
        .unwrap_or_default();
    let snippet = block
        .select(&RESULT_SNIPPET)
        .next()
        .map(element_text)
        .unwrap_or_default();

    Some(ScrapedResult {
        url,
        title,
        display_url,
        snippet,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Unwraps `//duckduckgo.com/l/?uddg=<target>` links to their target. Anything
/// that is not a redirect link, or has no target, is returned as is.
pub fn resolve_redirect(href: &str) -> String {
    if !href.contains(REDIRECT_MARKER) {
        return href.to_string();
    }
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };
    Url::parse(&absolute)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(key, _)| key == REDIRECT_TARGET_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|target| !target.is_empty())
        .unwrap_or_else(|| href.to_string())
}

/// Host of `url`, or an empty string when it does not parse.
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const RESULTS_PAGE: &str = r##"
<html><body>
<div class="results">
  <div class="result results_links results_links_deep web-result">
    <h2 class="result__title">
      <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2Flearn&amp;rut=abc">Learn Rust</a>
    </h2>
    <a class="result__url" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2Flearn"> www.rust-lang.org/learn </a>
    <a class="result__snippet" href="#">A language empowering everyone.</a>
  </div>
  <div class="result results_links web-result">
    <a class="result__a" href="https://doc.rust-lang.org/book/"> The Book </a>
    <a class="result__snippet" href="#">The Rust Programming Language</a>
  </div>
  <div class="result results_links web-result">
    <a class="result__a" href="https://example.com/untitled">   </a>
  </div>
  <div class="result results_links web-result">
    <span>no link at all</span>
  </div>
  <div class="result results_links web-result">
    <a class="result__a" href="https://crates.io/">crates.io</a>
    <a class="result__url" href="https://crates.io/">crates.io</a>
  </div>
</div>
</body></html>
"##;
}
