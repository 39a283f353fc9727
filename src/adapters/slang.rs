use serde::Deserialize;

use crate::data_models::{SlangResult, SlangResults, SlangScore};
use crate::envelope::Status;
use crate::error::{AdapterError, require};
use crate::fetch::UpstreamClient;

#[derive(Debug, Deserialize)]
pub(crate) struct UrbanResponse {
    #[serde(default)]
    list: Vec<UrbanDefinition>,
}

#[derive(Debug, Deserialize)]
struct UrbanDefinition {
    #[serde(default)]
    word: String,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    written_on: String,
    #[serde(default)]
    example: String,
    #[serde(default)]
    thumbs_up: i64,
    #[serde(default)]
    thumbs_down: i64,
}

impl From<UrbanDefinition> for SlangResult {
    fn from(def: UrbanDefinition) -> Self {
        SlangResult {
            title: def.word,
            link: def.permalink,
            description: def.definition,
            author: def.author,
            date: def.written_on,
            example: def.example,
            score: SlangScore {
                likes: def.thumbs_up,
                dislikes: def.thumbs_down,
            },
        }
    }
}

/// Urban Dictionary lookup. An empty definition list is NotFound; the caller
/// still gets the (empty) list in that case.
pub async fn define(client: &UpstreamClient, term: Option<&str>) -> Result<SlangResults, AdapterError> {
    let term = require(term, "q")?;

    let response: UrbanResponse = client
        .get(&client.endpoints().urban_dictionary, &[("term", term)])
        .map_err(|e| AdapterError::from_fetch("definition", e))?
        .json()
        .await
        .map_err(|e| AdapterError::from_fetch("definition", e))?;

    Ok(to_results(response))
}

pub(crate) fn to_results(response: UrbanResponse) -> SlangResults {
    let results: Vec<SlangResult> = response.list.into_iter().map(SlangResult::from).collect();
    let (status, message) = if results.is_empty() {
        (Status::NotFound, "no definitions found")
    } else {
        (Status::Success, "")
    };
    SlangResults {
        status,
        message: message.to_string(),
        results,
    }
}
