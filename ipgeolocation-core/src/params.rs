//! Optional per-call inputs for the two lookups.
//!
//! Empty strings and `None` coordinates mean "not set" and are left out of
//! the request. Values are not validated; the service decides what an
//! acceptable IP, field list or zone name is.

/// Inputs for a geolocation lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeolocationParams {
    /// IPv4/IPv6 address or domain. Empty means the caller's own address.
    pub ip: String,
    /// Comma-separated field selector, e.g. `"geo,time_zone"`.
    pub fields: String,
}

impl GeolocationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = ip.into();
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }
}

/// Inputs for a timezone lookup.
///
/// The coordinate pair is only sent when both halves are set; a lone
/// latitude or longitude is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimezoneParams {
    pub ip: String,
    /// IANA zone name, e.g. `"America/Los_Angeles"`.
    pub timezone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TimezoneParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = ip.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Both coordinates, or nothing.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}
