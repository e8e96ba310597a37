//! Core library for the `ipgeo` CLI.
//!
//! This crate defines:
//! - A blocking client for the ipgeolocation.io `ipgeo` and `timezone` APIs
//! - Per-call parameter objects and the query strings built from them
//! - Typed result values decoded from the service's JSON
//! - Configuration & credentials handling
//!
//! Lookups on [`IpGeolocationClient`] never fail: transport problems and
//! service errors are both reported through the result's `status` field.
//! The `try_*` variants surface transport failures as [`TransportError`].

pub mod client;
pub mod config;
mod de;
pub mod error;
pub mod model;
pub mod params;
pub mod query;
pub mod response;
pub mod transport;

pub use client::{IpGeolocationClient, client_from_config};
pub use config::Config;
pub use error::{ClientError, TransportError};
pub use model::{ApiResult, Currency, Geolocation, GeolocationTimeZone, Timezone, TimezoneGeo};
pub use params::{GeolocationParams, TimezoneParams};
pub use transport::{DEFAULT_BASE_URL, Endpoint, HttpTransport, RawResponse, Transport};
