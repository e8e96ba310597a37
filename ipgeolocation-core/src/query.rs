//! Query-string construction.
//!
//! Values are concatenated verbatim, without percent-encoding, because
//! existing callers pass pre-encoded values and rely on them arriving
//! unchanged.

use crate::params::{GeolocationParams, TimezoneParams};

/// Accumulates `name=value` pairs behind the mandatory `apiKey`.
#[derive(Debug, Clone)]
struct QueryBuilder {
    query: String,
}

impl QueryBuilder {
    fn new(api_key: &str) -> Self {
        Self { query: format!("apiKey={api_key}") }
    }

    /// Appends `&name=value` unless `value` is empty.
    fn push_non_empty(&mut self, name: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(name, value);
        }
        self
    }

    fn push(&mut self, name: &str, value: impl std::fmt::Display) -> &mut Self {
        self.query.push('&');
        self.query.push_str(name);
        self.query.push('=');
        self.query.push_str(&value.to_string());
        self
    }

    fn finish(self) -> String {
        self.query
    }
}

/// `apiKey=..[&ip=..][&fields=..]`
pub fn geolocation_query(api_key: &str, params: Option<&GeolocationParams>) -> String {
    let mut q = QueryBuilder::new(api_key);

    if let Some(params) = params {
        q.push_non_empty("ip", &params.ip).push_non_empty("fields", &params.fields);
    }

    q.finish()
}

/// `apiKey=..[&ip=..][&tz=..][&lat=..&long=..]`
pub fn timezone_query(api_key: &str, params: Option<&TimezoneParams>) -> String {
    let mut q = QueryBuilder::new(api_key);

    if let Some(params) = params {
        q.push_non_empty("ip", &params.ip).push_non_empty("tz", &params.timezone);

        if let Some((lat, long)) = params.coordinates() {
            q.push("lat", lat).push("long", long);
        }
    }

    q.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_params_is_api_key_only() {
        assert_eq!(geolocation_query("KEY", None), "apiKey=KEY");
        assert_eq!(timezone_query("KEY", None), "apiKey=KEY");
    }

    #[test]
    fn default_params_is_api_key_only() {
        assert_eq!(geolocation_query("KEY", Some(&GeolocationParams::new())), "apiKey=KEY");
        assert_eq!(timezone_query("KEY", Some(&TimezoneParams::new())), "apiKey=KEY");
    }

    #[test]
    fn geolocation_fields_in_fixed_order() {
        let params = GeolocationParams::new().with_fields("geo,time_zone").with_ip("8.8.8.8");
        assert_eq!(
            geolocation_query("KEY", Some(&params)),
            "apiKey=KEY&ip=8.8.8.8&fields=geo,time_zone"
        );
    }

    #[test]
    fn empty_ip_is_omitted() {
        let params = GeolocationParams::new().with_fields("city");
        let query = geolocation_query("KEY", Some(&params));
        assert_eq!(query, "apiKey=KEY&fields=city");
        assert!(!query.contains("ip="));
    }

    #[test]
    fn timezone_full_query() {
        let params = TimezoneParams::new()
            .with_ip("1.1.1.1")
            .with_timezone("Europe/London")
            .with_coordinates(51.5, -0.12);
        assert_eq!(
            timezone_query("KEY", Some(&params)),
            "apiKey=KEY&ip=1.1.1.1&tz=Europe/London&lat=51.5&long=-0.12"
        );
    }

    #[test]
    fn lone_latitude_drops_both_coordinates() {
        let params = TimezoneParams { latitude: Some(10.0), ..Default::default() };
        let query = timezone_query("KEY", Some(&params));
        assert!(!query.contains("lat="));
        assert!(!query.contains("long="));
    }

    #[test]
    fn lone_longitude_drops_both_coordinates() {
        let params = TimezoneParams {
            timezone: "Asia/Tokyo".into(),
            longitude: Some(139.7),
            ..Default::default()
        };
        assert_eq!(timezone_query("KEY", Some(&params)), "apiKey=KEY&tz=Asia/Tokyo");
    }

    #[test]
    fn values_are_not_encoded() {
        let params = TimezoneParams::new().with_timezone("America/Argentina/Buenos Aires");
        assert_eq!(
            timezone_query("K&Y", Some(&params)),
            "apiKey=K&Y&tz=America/Argentina/Buenos Aires"
        );
    }

    #[test]
    fn building_is_idempotent() {
        let params = TimezoneParams::new().with_ip("::1").with_coordinates(-33.86, 151.2);
        assert_eq!(timezone_query("KEY", Some(&params)), timezone_query("KEY", Some(&params)));
    }
}
