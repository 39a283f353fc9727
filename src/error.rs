use thiserror::Error;

use crate::envelope::Status;
use crate::fetch::FetchError;

/// Failures an adapter reports inside the envelope. None of these ever turn
/// into a transport-level error.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("missing '{0}' query parameter")]
    MissingParameter(&'static str),

    #[error("{message}")]
    Upstream {
        message: String,
        #[source]
        source: FetchError,
    },

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),
}

impl AdapterError {
    pub fn status(&self) -> Status {
        match self {
            AdapterError::NotFound(_) => Status::NotFound,
            AdapterError::MissingParameter(_)
            | AdapterError::Upstream { .. }
            | AdapterError::Parse(_) => Status::Error,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AdapterError::NotFound(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        AdapterError::Parse(message.into())
    }

    /// Classifies a fetch failure for `what` ("lyrics", "weather", ...): an
    /// undecodable body is a parse error, anything else a fetch error.
    pub fn from_fetch(what: &str, err: FetchError) -> Self {
        match err {
            FetchError::Decode(_) => AdapterError::Parse(format!("failed to parse {what} response")),
            source => AdapterError::Upstream {
                message: format!("failed to fetch {what}"),
                source,
            },
        }
    }
}

/// Returns the trimmed parameter or a `MissingParameter` error naming it.
pub fn require<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, AdapterError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AdapterError::MissingParameter(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_missing_and_blank() {
        assert!(matches!(
            require(None, "q"),
            Err(AdapterError::MissingParameter("q"))
        ));
        assert!(matches!(
            require(Some("   "), "word"),
            Err(AdapterError::MissingParameter("word"))
        ));
        assert_eq!(require(Some(" paris "), "location").unwrap(), "paris");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AdapterError::not_found("x").status(), Status::NotFound);
        assert_eq!(AdapterError::parse("x").status(), Status::Error);
        assert_eq!(AdapterError::MissingParameter("q").status(), Status::Error);
        let upstream = AdapterError::from_fetch("lyrics", FetchError::Status { status: 503 });
        assert_eq!(upstream.status(), Status::Error);
        assert_eq!(upstream.to_string(), "failed to fetch lyrics");
    }

    #[test]
    fn test_decode_failure_becomes_parse_error() {
        let decode = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = AdapterError::from_fetch("lyrics", FetchError::Decode(decode));
        assert!(matches!(err, AdapterError::Parse(_)));
        assert_eq!(err.to_string(), "failed to parse lyrics response");
    }
}
