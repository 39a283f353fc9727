use crate::data_models::{DictionaryEntry, DictionaryResults};
use crate::envelope::Status;
use crate::error::{AdapterError, require};
use crate::fetch::UpstreamClient;

/// dictionaryapi.dev lookup. A 404 from upstream means the word is unknown;
/// the entries are otherwise passed through untouched.
pub async fn lookup(client: &UpstreamClient, word: Option<&str>) -> Result<DictionaryResults, AdapterError> {
    let word = require(word, "word")?;
    let url = format!("{}{}", client.endpoints().dictionary, urlencoding::encode(word));

    let entries: Vec<DictionaryEntry> = client
        .get(&url, &[])
        .map_err(|e| AdapterError::from_fetch("dictionary", e))?
        .json()
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AdapterError::not_found("word not found")
            } else {
                AdapterError::from_fetch("dictionary", e)
            }
        })?;

    Ok(DictionaryResults {
        status: Status::Success,
        results: entries,
    })
}

#[cfg(test)]
mod tests {
    use crate::data_models::DictionaryEntry;

    #[test]
    fn test_entry_passes_through_upstream_fields() {
        let upstream = r#"[{
            "word": "hello",
            "phonetic": "həˈləʊ",
            "phonetics": [{"text": "həˈləʊ", "audio": "//ssl.gstatic.com/hello.mp3"}],
            "origin": "early 19th century",
            "meanings": [{
                "partOfSpeech": "exclamation",
                "definitions": [{"definition": "used as a greeting", "example": "hello there",
                                  "synonyms": ["hi"], "antonyms": []}]
            }]
        }]"#;
        let entries: Vec<DictionaryEntry> = serde_json::from_str(upstream).unwrap();
        let value = serde_json::to_value(&entries).unwrap();
        assert_eq!(value[0]["meanings"][0]["partOfSpeech"], "exclamation");
        assert_eq!(value[0]["meanings"][0]["definitions"][0]["synonyms"][0], "hi");
        assert_eq!(value[0]["phonetics"][0]["audio"], "//ssl.gstatic.com/hello.mp3");
        assert_eq!(value[0]["origin"], "early 19th century");
    }

    #[test]
    fn test_missing_fields_default() {
        let entries: Vec<DictionaryEntry> = serde_json::from_str(r#"[{"word": "rust"}]"#).unwrap();
        assert_eq!(entries[0].word, "rust");
        assert!(entries[0].meanings.is_empty());
        assert_eq!(entries[0].origin, "");
    }
}
