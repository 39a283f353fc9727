use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::data_models::{
    AlternatePlace, AlternatePlaceDetails, Coordinates, IconUrl, MapAssets, MapsResult,
    PlaceAddress, PlaceResult, PlaceStyle, Supplemental,
};
use crate::envelope::Status;
use crate::error::{AdapterError, require};
use crate::fetch::UpstreamClient;

/// Nominatim's usage policy requires an identifying user agent.
const GEOCODER_USER_AGENT: &str = "MeteorDiscordBot/1.0";
const MAX_MATCHES: &str = "5";
const PLACE_COLOR: &str = "#4285F4";
const PLACE_ICON: &str = "https://maps.gstatic.com/mapfiles/place_api/icons/v1/png_71/geocode-71.png";

#[derive(Debug, Deserialize)]
pub(crate) struct Location {
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    #[serde(default)]
    city: String,
    #[serde(default)]
    town: String,
    #[serde(default)]
    village: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    postcode: String,
}

impl Address {
    /// city, then town, then village.
    fn locality(&self) -> &str {
        [&self.city, &self.town, &self.village]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

pub async fn search(client: &UpstreamClient, query: Option<&str>) -> Result<MapsResult, AdapterError> {
    let query = require(query, "q")?;

    let locations: Vec<Location> = client
        .get(
            &client.endpoints().nominatim,
            &[
                ("q", query),
                ("format", "json"),
                ("limit", MAX_MATCHES),
                ("addressdetails", "1"),
            ],
        )
        .map_err(|e| AdapterError::from_fetch("location", e))?
        .header(USER_AGENT, GEOCODER_USER_AGENT)
        .json()
        .await
        .map_err(|e| AdapterError::from_fetch("location", e))?;

    to_maps_result(locations)
}

pub(crate) fn to_maps_result(locations: Vec<Location>) -> Result<MapsResult, AdapterError> {
    let primary = locations
        .first()
        .ok_or_else(|| AdapterError::not_found("location not found"))?;

    let place = PlaceResult {
        title: primary.display_name.clone(),
        address: PlaceAddress {
            full: primary.display_name.clone(),
            city: primary.address.locality().to_string(),
            state: primary.address.state.clone(),
            country: primary.address.country.clone(),
            postcode: primary.address.postcode.clone(),
        },
        coordinates: Coordinates {
            lat: primary.lat.clone(),
            lon: primary.lon.clone(),
        },
        url: map_page_url(&primary.lat, &primary.lon),
        display_type: primary.kind.clone(),
        style: PlaceStyle {
            color: PLACE_COLOR.to_string(),
            icon: IconUrl {
                url: PLACE_ICON.to_string(),
            },
        },
    };
    let assets = MapAssets {
        map: static_map_url(&primary.lat, &primary.lon),
    };

    let places = (locations.len() > 1).then(|| {
        locations
            .iter()
            .map(|l| AlternatePlace {
                place: AlternatePlaceDetails {
                    name: l.display_name.clone(),
                    address: l.display_name.clone(),
                    city: l.address.locality().to_string(),
                    lat: l.lat.clone(),
                    lon: l.lon.clone(),
                },
            })
            .collect()
    });

    Ok(MapsResult {
        status: Status::Success,
        assets,
        place,
        places,
    })
}

pub fn static_map_url(lat: &str, lon: &str) -> String {
    format!(
        "https://staticmap.openstreetmap.de/staticmap.php?center={lat},{lon}&zoom=14&size=800x400&maptype=mapnik&markers={lat},{lon},red-pushpin"
    )
}

pub fn map_page_url(lat: &str, lon: &str) -> String {
    format!("https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=15/{lat}/{lon}")
}

pub fn supplemental() -> Supplemental {
    Supplemental {
        status: Status::Success,
        message: "supplemental data not available".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations(json: &str) -> Vec<Location> {
        serde_json::from_str(json).unwrap()
    }

    const TWO_MATCHES: &str = r#"[
        {"place_id": 1, "lat": "48.8588897", "lon": "2.3200410", "display_name": "Paris, France",
         "type": "city", "class": "boundary",
         "address": {"city": "Paris", "state": "Ile-de-France", "country": "France", "postcode": "75000"}},
        {"place_id": 2, "lat": "33.6617962", "lon": "-95.555513", "display_name": "Paris, Texas",
         "type": "town", "address": {"town": "Paris", "state": "Texas", "country": "United States"}}
    ]"#;

    #[test]
    fn test_primary_place_and_alternates() {
        let result = to_maps_result(locations(TWO_MATCHES)).unwrap();
        assert_eq!(result.place.title, "Paris, France");
        assert_eq!(result.place.coordinates.lat, "48.8588897");
        assert_eq!(result.place.address.city, "Paris");
        assert_eq!(result.place.display_type, "city");
        assert!(result.assets.map.contains("center=48.8588897,2.3200410"));
        assert!(result.assets.map.contains("markers=48.8588897,2.3200410,red-pushpin"));

        let places = result.places.unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[1].place.city, "Paris");
        assert_eq!(places[1].place.lon, "-95.555513");
    }

    #[test]
    fn test_single_match_omits_places() {
        let single = r#"[{"lat": "1.5", "lon": "2.5", "display_name": "Somewhere",
                          "address": {"village": "Tiny"}}]"#;
        let result = to_maps_result(locations(single)).unwrap();
        assert!(result.places.is_none());
        assert_eq!(result.place.address.city, "Tiny");
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("places").is_none());
        assert_eq!(value["status"], 0);
    }

    #[test]
    fn test_no_matches_is_not_found() {
        let err = to_maps_result(Vec::new()).unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
        assert_eq!(err.to_string(), "location not found");
    }

    #[test]
    fn test_locality_fallback_chain() {
        let address = Address {
            town: "Town".to_string(),
            village: "Village".to_string(),
            ..Default::default()
        };
        assert_eq!(address.locality(), "Town");
        assert_eq!(Address::default().locality(), "");
    }
}
