use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Decoded query string. A repeated key keeps its first value; later ones are
/// ignored rather than rejected.
#[derive(Debug, Default)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self(pairs)
    }

    pub fn first(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

/// Query extractor that never fails, so missing or malformed parameters reach
/// the adapter and come back inside the envelope.
#[derive(Debug)]
pub struct Params<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: for<'a> From<&'a QueryPairs>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = QueryPairs::parse(parts.uri.query());
        Ok(Params(T::from(&pairs)))
    }
}

/// Query string shared by the search routes. Everything is optional here;
/// each adapter decides what it requires.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub nsfw: Option<String>,
}

impl SearchParams {
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref()
    }

    pub fn nsfw(&self) -> bool {
        is_true(self.nsfw.as_deref())
    }
}

impl From<&QueryPairs> for SearchParams {
    fn from(pairs: &QueryPairs) -> Self {
        Self {
            q: pairs.first("q"),
            nsfw: pairs.first("nsfw"),
        }
    }
}

#[derive(Debug, Default)]
pub struct WeatherParams {
    pub location: Option<String>,
}

impl From<&QueryPairs> for WeatherParams {
    fn from(pairs: &QueryPairs) -> Self {
        Self {
            location: pairs.first("location"),
        }
    }
}

#[derive(Debug, Default)]
pub struct DictionaryParams {
    pub word: Option<String>,
}

impl From<&QueryPairs> for DictionaryParams {
    fn from(pairs: &QueryPairs) -> Self {
        Self {
            word: pairs.first("word"),
        }
    }
}

#[derive(Debug, Default)]
pub struct UnicodeParams {
    pub character: Option<String>,
}

impl From<&QueryPairs> for UnicodeParams {
    fn from(pairs: &QueryPairs) -> Self {
        Self {
            character: pairs.first("char"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScreenshotParams {
    pub url: Option<String>,
    pub nsfw: Option<String>,
}

impl ScreenshotParams {
    pub fn nsfw(&self) -> bool {
        is_true(self.nsfw.as_deref())
    }
}

impl From<&QueryPairs> for ScreenshotParams {
    fn from(pairs: &QueryPairs) -> Self {
        Self {
            url: pairs.first("url"),
            nsfw: pairs.first("nsfw"),
        }
    }
}

/// Only the literal string "true" enables a flag.
fn is_true(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_wins() {
        let pairs = QueryPairs::parse(Some("char=A&char=B&nsfw=true"));
        assert_eq!(pairs.first("char").as_deref(), Some("A"));
        assert_eq!(pairs.first("missing"), None);
    }

    #[test]
    fn test_decodes_values() {
        let params = SearchParams::from(&QueryPairs::parse(Some("q=never+gonna%20give&nsfw=TRUE")));
        assert_eq!(params.query(), Some("never gonna give"));
        assert!(!params.nsfw());
    }

    #[test]
    fn test_empty_query_string() {
        let params = ScreenshotParams::from(&QueryPairs::parse(None));
        assert!(params.url.is_none());
        assert!(!params.nsfw());
    }
}
