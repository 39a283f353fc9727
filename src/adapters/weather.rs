//! Open-Meteo weather: geocode the location, then fetch current conditions and
//! a daily series for the first match. The two calls run strictly in order.

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::data_models::{
    Condition, CurrentConditions, CurrentTemperature, ForecastDay, SunTimes, TemperatureRange,
    WeatherIcon, WeatherResult, WeatherResults, Wind,
};
use crate::envelope::Status;
use crate::error::{AdapterError, require};
use crate::fetch::UpstreamClient;

pub const FORECAST_DAYS: usize = 7;
const CURRENT_FIELDS: &str =
    "temperature_2m,weather_code,relative_humidity_2m,apparent_temperature,wind_speed_10m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeoMatch>,
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Forecast {
    current: Current,
    daily: Daily,
}

#[derive(Debug, Deserialize)]
struct Current {
    temperature_2m: Option<f64>,
    weather_code: Option<i64>,
    relative_humidity_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Daily {
    time: Vec<String>,
    weather_code: Vec<Option<i64>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

/// WMO weather interpretation codes.
pub fn condition_label(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

pub async fn forecast(client: &UpstreamClient, location: Option<&str>) -> Result<WeatherResults, AdapterError> {
    let location = require(location, "location")?;
    let endpoints = client.endpoints();

    let geocoding: GeocodingResponse = client
        .get(&endpoints.geocoding, &[("name", location), ("count", "1")])
        .map_err(|e| AdapterError::from_fetch("geolocation", e))?
        .json()
        .await
        .map_err(|e| AdapterError::from_fetch("geolocation", e))?;

    let place = geocoding
        .results
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::not_found("location not found"))?;

    let latitude = format!("{:.4}", place.latitude);
    let longitude = format!("{:.4}", place.longitude);
    let forecast: Forecast = client
        .get(
            &endpoints.forecast,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
            ],
        )
        .map_err(|e| AdapterError::from_fetch("weather", e))?
        .json()
        .await
        .map_err(|e| AdapterError::from_fetch("weather", e))?;

    let today = Local::now().date_naive();
    Ok(WeatherResults {
        status: Status::Success,
        result: build_result(place.name, forecast, today)?,
    })
}

pub(crate) fn build_result(
    location: String,
    forecast: Forecast,
    today: NaiveDate,
) -> Result<WeatherResult, AdapterError> {
    let Forecast { current, daily } = forecast;

    let sunrise = daily
        .sunrise
        .first()
        .ok_or_else(|| AdapterError::parse("unexpected weather response format (invalid daily sunrise)"))?;
    let sunset = daily
        .sunset
        .first()
        .ok_or_else(|| AdapterError::parse("unexpected weather response format (invalid daily sunset)"))?;

    let current = CurrentConditions {
        icon: WeatherIcon {
            id: current.weather_code,
        },
        temperature: CurrentTemperature {
            current: current.temperature_2m,
            feels_like: current.apparent_temperature,
            max: at(&daily.temperature_2m_max, 0),
            min: at(&daily.temperature_2m_min, 0),
        },
        condition: Condition {
            label: current
                .weather_code
                .map_or("Unknown", condition_label)
                .to_string(),
        },
        wind: Wind {
            speed: current.wind_speed_10m,
        },
        humidity: current.relative_humidity_2m,
        sun: SunTimes {
            sunrise: local_time_millis(sunrise),
            sunset: local_time_millis(sunset),
        },
    };

    Ok(WeatherResult {
        location,
        current,
        forecast: build_forecast(&daily, today),
        warnings: Vec::new(),
    })
}

fn build_forecast(daily: &Daily, today: NaiveDate) -> Vec<ForecastDay> {
    daily
        .time
        .iter()
        .take(FORECAST_DAYS)
        .enumerate()
        .filter_map(|(i, raw_date)| {
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").ok()?;
            Some(ForecastDay {
                day: day_label(i, date, today),
                icon: WeatherIcon {
                    id: at(&daily.weather_code, i),
                },
                temperature: TemperatureRange {
                    max: at(&daily.temperature_2m_max, i),
                    min: at(&daily.temperature_2m_min, i),
                },
            })
        })
        .collect()
}

/// Index 0 is always "Today"; the entry dated tomorrow is "Tomorrow"; the rest
/// use the short weekday name.
pub fn day_label(index: usize, date: NaiveDate, today: NaiveDate) -> String {
    if index == 0 {
        return "Today".to_string();
    }
    if today.checked_add_days(Days::new(1)) == Some(date) {
        return "Tomorrow".to_string();
    }
    date.format("%a").to_string()
}

/// Upstream times are local to the location with no offset attached; they are
/// read as UTC wall time. Unparseable values become 0.
pub fn local_time_millis(raw: &str) -> i64 {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map(|t| t.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Missing or null entries are `None` rather than a failure.
fn at<T: Copy>(series: &[Option<T>], index: usize) -> Option<T> {
    series.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST: &str = r#"{
        "latitude": 51.5, "longitude": -0.12,
        "current": {"time": "2024-03-10T12:00", "temperature_2m": 11.2, "weather_code": 3,
                    "relative_humidity_2m": 81, "apparent_temperature": 8.9, "wind_speed_10m": 14.4},
        "daily": {
            "time": ["2024-03-10","2024-03-11","2024-03-12","2024-03-13","2024-03-14","2024-03-15","2024-03-16","2024-03-17"],
            "weather_code": [3, 61, 80, null, 0, 2, 95, 1],
            "temperature_2m_max": [12.1, 10.4, 9.8, 11.0, 13.3],
            "temperature_2m_min": [5.2, 4.1, 3.9, 4.4, 6.0, 6.1, 7.0, 7.1],
            "sunrise": ["2024-03-10T06:22", "2024-03-11T06:20"],
            "sunset": ["2024-03-10T17:57", "2024-03-11T17:59"]
        }
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn forecast() -> Forecast {
        serde_json::from_str(FORECAST).unwrap()
    }

    #[test]
    fn test_build_result() {
        let result = build_result("London".to_string(), forecast(), today()).unwrap();
        assert_eq!(result.location, "London");
        assert_eq!(result.current.icon.id, Some(3));
        assert_eq!(result.current.condition.label, "Overcast");
        assert_eq!(result.current.temperature.current, Some(11.2));
        assert_eq!(result.current.temperature.max, Some(12.1));
        assert_eq!(result.current.temperature.min, Some(5.2));
        assert_eq!(result.current.humidity, Some(81.0));
        assert_eq!(result.current.sun.sunrise, 1_710_051_720_000);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_forecast_is_capped_and_labelled() {
        let result = build_result("London".to_string(), forecast(), today()).unwrap();
        let days: Vec<&str> = result.forecast.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, ["Today", "Tomorrow", "Tue", "Wed", "Thu", "Fri", "Sat"]);
    }

    #[test]
    fn test_short_series_yield_none() {
        let result = build_result("London".to_string(), forecast(), today()).unwrap();
        assert_eq!(result.forecast[3].icon.id, None);
        assert_eq!(result.forecast[5].temperature.max, None);
        assert_eq!(result.forecast[5].temperature.min, Some(6.1));
    }

    #[test]
    fn test_missing_sunrise_is_parse_error() {
        let mut forecast = forecast();
        forecast.daily.sunrise.clear();
        let err = build_result("London".to_string(), forecast, today()).unwrap_err();
        assert_eq!(err.status(), Status::Error);
    }

    #[test]
    fn test_first_entry_is_today_even_if_dated_tomorrow() {
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(day_label(0, tomorrow, today()), "Today");
        assert_eq!(day_label(1, tomorrow, today()), "Tomorrow");
    }

    #[test]
    fn test_condition_labels() {
        assert_eq!(condition_label(0), "Clear sky");
        assert_eq!(condition_label(99), "Thunderstorm with heavy hail");
        assert_eq!(condition_label(42), "Unknown");
    }

    #[test]
    fn test_local_time_millis() {
        assert_eq!(local_time_millis("1970-01-01T00:01"), 60_000);
        assert_eq!(local_time_millis("garbage"), 0);
    }
}
