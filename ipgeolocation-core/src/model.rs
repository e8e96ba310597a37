use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{de, response::FALLBACK_MESSAGE};

/// Result of an `ipgeo` lookup.
///
/// Fields not returned by the service (because of a `fields` selector, or
/// because the call failed) hold their empty/zero default. `status` is the
/// HTTP status of the exchange, `"0"` when no response arrived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geolocation {
    #[serde(deserialize_with = "de::string")]
    pub status: String,
    #[serde(deserialize_with = "de::string")]
    pub message: String,

    #[serde(deserialize_with = "de::string")]
    pub ip: String,
    #[serde(deserialize_with = "de::string")]
    pub hostname: String,
    #[serde(deserialize_with = "de::string")]
    pub continent_code: String,
    #[serde(deserialize_with = "de::string")]
    pub continent_name: String,
    #[serde(deserialize_with = "de::string")]
    pub country_code2: String,
    #[serde(deserialize_with = "de::string")]
    pub country_code3: String,
    #[serde(deserialize_with = "de::string")]
    pub country_name: String,
    #[serde(deserialize_with = "de::string")]
    pub country_capital: String,
    #[serde(deserialize_with = "de::string")]
    pub state_prov: String,
    #[serde(deserialize_with = "de::string")]
    pub district: String,
    #[serde(deserialize_with = "de::string")]
    pub city: String,
    #[serde(deserialize_with = "de::string")]
    pub zipcode: String,
    /// Decimal degrees as sent by the service, see [`Geolocation::coordinates`].
    #[serde(deserialize_with = "de::string")]
    pub latitude: String,
    #[serde(deserialize_with = "de::string")]
    pub longitude: String,
    #[serde(deserialize_with = "de::bool")]
    pub is_eu: bool,
    #[serde(deserialize_with = "de::string")]
    pub calling_code: String,
    #[serde(deserialize_with = "de::string")]
    pub country_tld: String,
    #[serde(deserialize_with = "de::string")]
    pub languages: String,
    #[serde(deserialize_with = "de::string")]
    pub country_flag: String,
    #[serde(deserialize_with = "de::string")]
    pub geoname_id: String,
    #[serde(deserialize_with = "de::string")]
    pub isp: String,
    #[serde(deserialize_with = "de::string")]
    pub connection_type: String,
    #[serde(deserialize_with = "de::string")]
    pub organization: String,
    #[serde(deserialize_with = "lenient_struct")]
    pub currency: Currency,
    #[serde(deserialize_with = "lenient_struct")]
    pub time_zone: GeolocationTimeZone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    #[serde(deserialize_with = "de::string")]
    pub code: String,
    #[serde(deserialize_with = "de::string")]
    pub name: String,
    #[serde(deserialize_with = "de::string")]
    pub symbol: String,
}

/// The `time_zone` block embedded in a geolocation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationTimeZone {
    #[serde(deserialize_with = "de::string")]
    pub name: String,
    /// Hours from UTC, excluding DST.
    #[serde(deserialize_with = "de::f64")]
    pub offset: f64,
    #[serde(deserialize_with = "de::string")]
    pub current_time: String,
    #[serde(deserialize_with = "de::f64")]
    pub current_time_unix: f64,
    #[serde(deserialize_with = "de::bool")]
    pub is_dst: bool,
    #[serde(deserialize_with = "de::i64")]
    pub dst_savings: i64,
}

impl GeolocationTimeZone {
    pub fn current_time_utc(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.current_time_unix)
    }
}

/// Result of a `timezone` lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timezone {
    #[serde(deserialize_with = "de::string")]
    pub status: String,
    #[serde(deserialize_with = "de::string")]
    pub message: String,

    #[serde(deserialize_with = "de::string")]
    pub timezone: String,
    #[serde(deserialize_with = "de::f64")]
    pub timezone_offset: f64,
    #[serde(deserialize_with = "de::string")]
    pub date: String,
    #[serde(deserialize_with = "de::string")]
    pub date_time: String,
    #[serde(deserialize_with = "de::string")]
    pub date_time_txt: String,
    #[serde(deserialize_with = "de::string")]
    pub date_time_wti: String,
    #[serde(deserialize_with = "de::string")]
    pub date_time_ymd: String,
    #[serde(deserialize_with = "de::f64")]
    pub date_time_unix: f64,
    #[serde(deserialize_with = "de::string")]
    pub time_24: String,
    #[serde(deserialize_with = "de::string")]
    pub time_12: String,
    #[serde(deserialize_with = "de::i64")]
    pub week: i64,
    #[serde(deserialize_with = "de::i64")]
    pub month: i64,
    #[serde(deserialize_with = "de::i64")]
    pub year: i64,
    #[serde(deserialize_with = "de::string")]
    pub year_abbr: String,
    #[serde(deserialize_with = "de::bool")]
    pub is_dst: bool,
    #[serde(deserialize_with = "de::i64")]
    pub dst_savings: i64,
    /// Location the zone was resolved from; empty for `tz=` lookups.
    #[serde(deserialize_with = "lenient_struct")]
    pub geo: TimezoneGeo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneGeo {
    #[serde(deserialize_with = "de::string")]
    pub country_code2: String,
    #[serde(deserialize_with = "de::string")]
    pub country_code3: String,
    #[serde(deserialize_with = "de::string")]
    pub country_name: String,
    #[serde(deserialize_with = "de::string")]
    pub state_prov: String,
    #[serde(deserialize_with = "de::string")]
    pub district: String,
    #[serde(deserialize_with = "de::string")]
    pub city: String,
    #[serde(deserialize_with = "de::string")]
    pub zipcode: String,
    #[serde(deserialize_with = "de::string")]
    pub latitude: String,
    #[serde(deserialize_with = "de::string")]
    pub longitude: String,
}

/// Status helpers shared by both result types.
pub trait ApiResult {
    fn status(&self) -> &str;

    /// HTTP status as a number; 0 when no response was received.
    fn status_code(&self) -> u16 {
        self.status().parse().unwrap_or(0)
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code())
    }
}

/// Construction from the normalized response map.
pub(crate) trait FromResponse: ApiResult + DeserializeOwned + Default {
    /// Used when the map does not decode; keeps status and message.
    fn degraded(status: String, message: String) -> Self;

    fn from_map(map: Map<String, Value>) -> Self {
        let status = map.get("status").and_then(Value::as_str).unwrap_or("0").to_string();

        serde_json::from_value(Value::Object(map)).unwrap_or_else(|err| {
            warn!("Failed to decode response object: {err}");
            Self::degraded(status, FALLBACK_MESSAGE.to_string())
        })
    }
}

impl ApiResult for Geolocation {
    fn status(&self) -> &str {
        &self.status
    }
}

impl FromResponse for Geolocation {
    fn degraded(status: String, message: String) -> Self {
        Self { status, message, ..Default::default() }
    }
}

impl ApiResult for Timezone {
    fn status(&self) -> &str {
        &self.status
    }
}

impl FromResponse for Timezone {
    fn degraded(status: String, message: String) -> Self {
        Self { status, message, ..Default::default() }
    }
}

impl Geolocation {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        parse_coordinates(&self.latitude, &self.longitude)
    }
}

impl Timezone {
    pub fn date_time_utc(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.date_time_unix)
    }
}

impl TimezoneGeo {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        parse_coordinates(&self.latitude, &self.longitude)
    }
}

/// Decodes a nested object, treating anything that is not an object as
/// absent.
fn lenient_struct<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Option::<Value>::deserialize(d)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    })
}

fn parse_coordinates(lat: &str, long: &str) -> Option<(f64, f64)> {
    let lat = lat.trim().parse().ok()?;
    let long = long.trim().parse().ok()?;
    Some((lat, long))
}

fn unix_to_utc(ts: f64) -> Option<DateTime<Utc>> {
    if ts <= 0.0 || !ts.is_finite() {
        return None;
    }
    let secs = ts.trunc() as i64;
    let nanos = ((ts - ts.trunc()) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::normalize;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn geolocation_from_service_payload() {
        let body = json!({
            "ip": "8.8.8.8",
            "continent_code": "NA",
            "country_code2": "US",
            "country_name": "United States",
            "city": "Mountain View",
            "latitude": "37.42240",
            "longitude": "-122.08421",
            "is_eu": false,
            "calling_code": "+1",
            "geoname_id": "6301403",
            "currency": { "code": "USD", "name": "US Dollar", "symbol": "$" },
            "time_zone": {
                "name": "America/Los_Angeles",
                "offset": -8,
                "current_time": "2020-12-17 07:49:45.872-0800",
                "current_time_unix": 1608220185.872,
                "is_dst": false,
                "dst_savings": 1
            }
        });
        let geo = Geolocation::from_map(normalize(200, Some(&body.to_string())));

        assert_eq!(geo.status, "200");
        assert!(geo.is_success());
        assert_eq!(geo.ip, "8.8.8.8");
        assert_eq!(geo.country_name, "United States");
        assert_eq!(geo.coordinates(), Some((37.4224, -122.08421)));
        assert_eq!(geo.currency.code, "USD");
        assert_eq!(geo.time_zone.name, "America/Los_Angeles");
        assert_eq!(geo.time_zone.offset, -8.0);
        assert_eq!(geo.time_zone.dst_savings, 1);
        assert_eq!(
            geo.time_zone.current_time_utc().map(|t| t.timestamp()),
            Some(1_608_220_185)
        );
        assert!(geo.message.is_empty());
    }

    #[test]
    fn canada_example() {
        let geo = Geolocation::from_map(normalize(200, Some(r#"{"country_name":"Canada"}"#)));
        assert_eq!(geo.country_name, "Canada");
        assert_eq!(geo.status, "200");
        assert!(geo.city.is_empty());
        assert_eq!(geo.coordinates(), None);
    }

    #[test]
    fn service_error_is_a_normal_value() {
        let geo = Geolocation::from_map(normalize(
            401,
            Some(r#"{"message":"Provided API key is not valid. Contact technical support for assistance at support@ipgeolocation.io"}"#),
        ));
        assert_eq!(geo.status_code(), 401);
        assert!(!geo.is_success());
        assert!(geo.message.starts_with("Provided API key is not valid"));
    }

    #[test]
    fn absent_body_degrades_to_fallback() {
        let tz = Timezone::from_map(normalize(0, None));
        assert_eq!(tz.status, "0");
        assert_eq!(tz.status_code(), 0);
        assert_eq!(tz.message, FALLBACK_MESSAGE);
        assert!(tz.timezone.is_empty());
    }

    #[test]
    fn timezone_from_service_payload() {
        let body = json!({
            "geo": {
                "country_code2": "PK",
                "country_name": "Pakistan",
                "city": "Lahore",
                "latitude": "31.5204",
                "longitude": "74.3587"
            },
            "timezone": "Asia/Karachi",
            "timezone_offset": 5,
            "date": "2020-12-17",
            "date_time": "2020-12-17 20:49:45",
            "date_time_unix": 1608220185.0,
            "time_24": "20:49:45",
            "week": "51",
            "month": "12",
            "year": "2020",
            "year_abbr": "20",
            "is_dst": false,
            "dst_savings": 0
        });
        let tz = Timezone::from_map(normalize(200, Some(&body.to_string())));

        assert_eq!(tz.timezone, "Asia/Karachi");
        assert_eq!(tz.timezone_offset, 5.0);
        assert_eq!(tz.week, 51);
        assert_eq!(tz.year, 2020);
        assert_eq!(tz.geo.city, "Lahore");
        assert_eq!(tz.geo.coordinates(), Some((31.5204, 74.3587)));
        assert_eq!(tz.date_time_utc().map(|t| t.timestamp()), Some(1_608_220_185));
    }

    #[test]
    fn malformed_nested_objects_default() {
        let tz = Timezone::from_map(map(json!({"status": "200", "geo": "unknown"})));
        assert_eq!(tz.geo, TimezoneGeo::default());

        let geo = Geolocation::from_map(map(json!({"status": "200", "currency": ["USD"]})));
        assert_eq!(geo.currency, Currency::default());
    }

    #[test]
    fn wrongly_typed_fields_still_decode_with_status() {
        let geo = Geolocation::from_map(map(json!({
            "status": "200",
            "country_name": ["Canada"],
            "is_eu": {"value": true},
            "time_zone": {"offset": "n/a", "dst_savings": [1]},
            "latitude": null
        })));
        assert_eq!(geo.status, "200");
        assert_eq!(geo.country_name, r#"["Canada"]"#);
        assert!(!geo.is_eu);
        assert_eq!(geo.time_zone.offset, 0.0);
        assert!(geo.message.is_empty());
    }

    #[test]
    fn missing_unix_time_is_none() {
        assert_eq!(Timezone::default().date_time_utc(), None);
    }
}
