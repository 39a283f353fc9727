use serde::Deserialize;

use crate::data_models::{LyricsResult, Track, TrackMetadata};
use crate::envelope::Status;
use crate::error::{AdapterError, require};
use crate::fetch::UpstreamClient;

/// Provider id the client uses to attribute LRCLIB lyrics.
pub const PROVIDER_LRCLIB: u8 = 3;
const NOT_FOUND: &str = "lyrics not found";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LrclibTrack {
    #[serde(default)]
    track_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    artist_name: Option<String>,
    #[serde(default)]
    album_name: Option<String>,
    #[serde(default)]
    plain_lyrics: Option<String>,
}

pub async fn search(client: &UpstreamClient, query: Option<&str>) -> Result<LyricsResult, AdapterError> {
    let query = require(query, "q")?;

    let tracks: Vec<LrclibTrack> = client
        .get(&client.endpoints().lrclib, &[("q", query)])
        .map_err(|e| AdapterError::from_fetch("lyrics", e))?
        .json()
        .await
        .map_err(|e| AdapterError::from_fetch("lyrics", e))?;

    first_with_lyrics(tracks)
}

/// Only the best match is considered. No match and a match without plain
/// lyrics are reported identically.
pub(crate) fn first_with_lyrics(tracks: Vec<LrclibTrack>) -> Result<LyricsResult, AdapterError> {
    let track = tracks
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::not_found(NOT_FOUND))?;

    let lyrics = non_empty(track.plain_lyrics).ok_or_else(|| AdapterError::not_found(NOT_FOUND))?;
    let title = non_empty(track.track_name)
        .or_else(|| non_empty(track.name))
        .unwrap_or_default();

    Ok(LyricsResult {
        status: Status::Success,
        lyrics,
        lyrics_provider: PROVIDER_LRCLIB,
        track: Track {
            title,
            artist: track.artist_name.unwrap_or_default(),
            metadata: vec![TrackMetadata {
                id: "Album".to_string(),
                value: track.album_name.unwrap_or_default(),
            }],
        },
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(json: &str) -> Vec<LrclibTrack> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_maps_first_track() {
        let result = first_with_lyrics(tracks(
            r#"[{"id": 1, "trackName": "Bohemian Rhapsody", "artistName": "Queen",
                 "albumName": "A Night at the Opera", "plainLyrics": "Is this the real life?"},
                {"id": 2, "trackName": "Other", "plainLyrics": "other"}]"#,
        ))
        .unwrap();
        assert_eq!(result.lyrics, "Is this the real life?");
        assert_eq!(result.lyrics_provider, 3);
        assert_eq!(result.track.title, "Bohemian Rhapsody");
        assert_eq!(result.track.artist, "Queen");
        assert_eq!(result.track.metadata[0].id, "Album");
        assert_eq!(result.track.metadata[0].value, "A Night at the Opera");
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let result = first_with_lyrics(tracks(
            r#"[{"trackName": "", "name": "Fallback", "plainLyrics": "la la"}]"#,
        ))
        .unwrap();
        assert_eq!(result.track.title, "Fallback");
    }

    #[test]
    fn test_empty_list_and_empty_lyrics_are_indistinguishable() {
        let none = first_with_lyrics(Vec::new()).unwrap_err();
        let instrumental = first_with_lyrics(tracks(
            r#"[{"trackName": "Instrumental", "plainLyrics": null}, {"plainLyrics": "later"}]"#,
        ))
        .unwrap_err();
        for err in [none, instrumental] {
            assert_eq!(err.status(), Status::NotFound);
            assert_eq!(err.to_string(), "lyrics not found");
        }
    }
}
