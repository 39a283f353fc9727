//! Canonical payload shapes. Each adapter maps its upstream into one of these;
//! they are built per request and only ever serialized.

use serde::{Deserialize, Serialize};

use crate::envelope::Status;

// Result card tags. Only `SEARCH_RESULT` is produced today; the rest are
// reserved by the client contract.
pub mod result_type {
    pub const UNKNOWN: u8 = 0;
    pub const SEARCH_RESULT: u8 = 1;
    pub const KNOWLEDGE_GRAPH: u8 = 2;
    pub const DOODLE: u8 = 3;
    pub const ENTITY: u8 = 4;
    pub const CALCULATOR: u8 = 5;
    pub const UNIT_CONVERTER: u8 = 6;
    pub const DICTIONARY: u8 = 7;
    pub const MAPS: u8 = 8;
    pub const FUNBOX_COIN_FLIP: u8 = 10;
    pub const COLOR_PICKER: u8 = 11;
    pub const DATA_GENERIC: u8 = 20;
    pub const DATA_FINANCE: u8 = 21;
    pub const DATA_DICTIONARY: u8 = 22;
    pub const DATA_TRANSLATE: u8 = 23;
    pub const DATA_WEATHER: u8 = 24;
    pub const PIVOT_IMAGES: u8 = 100;
}

// ---------------------------------------------------------------------------
// Web search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct WebSearchResults {
    pub status: Status,
    pub results: Vec<WebResultCard>,
    pub doodle: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebResultCard {
    #[serde(rename = "type")]
    pub kind: u8,
    pub result: WebResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebResult {
    pub url: String,
    pub title: String,
    pub display_link: String,
    pub snippet: String,
}

// ---------------------------------------------------------------------------
// Image search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ImageSearchResults {
    pub status: Status,
    pub results: Vec<ImageResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageResult {
    pub title: String,
    pub url: String,
    pub image: String,
    pub thumbnail: String,
    pub source: String,
    pub width: u32,
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MapsResult {
    pub status: Status,
    pub assets: MapAssets,
    pub place: PlaceResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub places: Option<Vec<AlternatePlace>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapAssets {
    pub map: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceResult {
    pub title: String,
    pub address: PlaceAddress,
    pub coordinates: Coordinates,
    pub url: String,
    pub display_type: String,
    pub style: PlaceStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceAddress {
    pub full: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postcode: String,
}

/// Decimal strings exactly as the geocoder returned them.
#[derive(Debug, Clone, Serialize)]
pub struct Coordinates {
    pub lat: String,
    pub lon: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceStyle {
    pub color: String,
    pub icon: IconUrl,
}

#[derive(Debug, Clone, Serialize)]
pub struct IconUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlternatePlace {
    pub place: AlternatePlaceDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlternatePlaceDetails {
    pub name: String,
    pub address: String,
    pub city: String,
    pub lat: String,
    pub lon: String,
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsCardType {
    Article = 1,
    Collection = 2,
}

impl Serialize for NewsCardType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsResults {
    pub status: Status,
    pub cards: Vec<NewsCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsCard {
    #[serde(rename = "type")]
    pub kind: NewsCardType,
    pub title: String,
    pub url: String,
    pub publisher: Publisher,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Publisher {
    pub name: String,
    pub icon: String,
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct WeatherResults {
    pub status: Status,
    pub result: WeatherResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherResult {
    pub location: String,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
    pub warnings: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentConditions {
    pub icon: WeatherIcon,
    pub temperature: CurrentTemperature,
    pub condition: Condition,
    pub wind: Wind,
    pub humidity: Option<f64>,
    pub sun: SunTimes,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherIcon {
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentTemperature {
    pub current: Option<f64>,
    pub feels_like: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Condition {
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Wind {
    pub speed: Option<f64>,
}

/// Epoch milliseconds. Upstream times carry no offset, so these are approximate.
#[derive(Debug, Clone, Serialize)]
pub struct SunTimes {
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    pub day: String,
    pub icon: WeatherIcon,
    pub temperature: TemperatureRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemperatureRange {
    pub max: Option<f64>,
    pub min: Option<f64>,
}

// ---------------------------------------------------------------------------
// Lyrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LyricsResult {
    pub status: Status,
    pub lyrics: String,
    pub lyrics_provider: u8,
    pub track: Track,
}

#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub metadata: Vec<TrackMetadata>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackMetadata {
    pub id: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Dictionaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DictionaryResults {
    pub status: Status,
    pub results: Vec<DictionaryEntry>,
}

/// Passed through from dictionaryapi.dev with its own field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
    #[serde(default)]
    pub origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub audio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlangResults {
    pub status: Status,
    pub message: String,
    pub results: Vec<SlangResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlangResult {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: String,
    pub date: String,
    pub example: String,
    pub score: SlangScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlangScore {
    pub likes: i64,
    pub dislikes: i64,
}

// ---------------------------------------------------------------------------
// Unicode metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CharCategory {
    Control,
    Digit,
    Letter,
    Number,
    Space,
    Symbol,
    Punctuation,
    Mark,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnicodeMetadata {
    pub status: Status,
    #[serde(rename = "char")]
    pub character: String,
    pub name: String,
    pub codepoint: String,
    pub decimal: u32,
    pub hex: String,
    pub category: CharCategory,
    pub html: String,
}

// ---------------------------------------------------------------------------
// Random feeds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ComicStrip {
    pub status: Status,
    pub date: String,
    pub comic: String,
    pub link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomImage {
    pub status: Status,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Supplemental {
    pub status: Status,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Screenshots
// ---------------------------------------------------------------------------

/// Failure body of the screenshot route: `{"error": {"image_url", "message"}}`.
/// This route never uses the envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenshotError {
    pub image_url: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ScreenshotErrorBody<'a> {
    pub error: &'a ScreenshotError,
}
