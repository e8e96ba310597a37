use log::error;

use crate::{
    Config,
    error::{ClientError, TransportError},
    model::{FromResponse, Geolocation, Timezone},
    params::{GeolocationParams, TimezoneParams},
    query::{geolocation_query, timezone_query},
    response::normalize,
    transport::{Endpoint, HttpTransport, RawResponse, Transport},
};

/// Blocking client for the ipgeolocation.io API.
///
/// Holds the API key and the transport; both are fixed at construction so
/// a client can be shared between threads by reference.
#[derive(Debug)]
pub struct IpGeolocationClient {
    api_key: String,
    transport: Box<dyn Transport>,
}

impl IpGeolocationClient {
    /// Client against the public service host.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        let api_key = validate_api_key(api_key.into())?;
        Ok(Self { api_key, transport: Box::new(HttpTransport::new()?) })
    }

    pub fn with_transport(
        api_key: impl Into<String>,
        transport: impl Transport + 'static,
    ) -> Result<Self, ClientError> {
        let api_key = validate_api_key(api_key.into())?;
        Ok(Self { api_key, transport: Box::new(transport) })
    }

    /// Geolocation of the calling machine's public address.
    pub fn geolocation(&self) -> Geolocation {
        self.lookup(Endpoint::Geolocation, geolocation_query(&self.api_key, None))
    }

    pub fn geolocation_with(&self, params: &GeolocationParams) -> Geolocation {
        self.lookup(Endpoint::Geolocation, geolocation_query(&self.api_key, Some(params)))
    }

    /// Timezone of the calling machine's public address.
    pub fn timezone(&self) -> Timezone {
        self.lookup(Endpoint::Timezone, timezone_query(&self.api_key, None))
    }

    pub fn timezone_with(&self, params: &TimezoneParams) -> Timezone {
        self.lookup(Endpoint::Timezone, timezone_query(&self.api_key, Some(params)))
    }

    /// Like [`geolocation_with`](Self::geolocation_with), but a request that
    /// got no response is returned as an error instead of a status-0 value.
    pub fn try_geolocation(
        &self,
        params: Option<&GeolocationParams>,
    ) -> Result<Geolocation, TransportError> {
        self.try_lookup(Endpoint::Geolocation, &geolocation_query(&self.api_key, params))
    }

    pub fn try_timezone(&self, params: Option<&TimezoneParams>) -> Result<Timezone, TransportError> {
        self.try_lookup(Endpoint::Timezone, &timezone_query(&self.api_key, params))
    }

    fn try_lookup<T: FromResponse>(&self, endpoint: Endpoint, query: &str) -> Result<T, TransportError> {
        let raw = self.transport.get(endpoint, query)?;
        Ok(into_result(raw))
    }

    fn lookup<T: FromResponse>(&self, endpoint: Endpoint, query: String) -> T {
        let raw = self.transport.get(endpoint, &query).unwrap_or_else(|err| {
            error!("Please check your internet connection: {err}");
            RawResponse { status: 0, body: None }
        });
        into_result(raw)
    }
}

fn into_result<T: FromResponse>(raw: RawResponse) -> T {
    T::from_map(normalize(raw.status, raw.body.as_deref()))
}

fn validate_api_key(api_key: String) -> Result<String, ClientError> {
    if api_key.trim().is_empty() {
        return Err(ClientError::EmptyApiKey);
    }
    Ok(api_key)
}

/// Construct a client from config, honoring a custom `base_url`.
pub fn client_from_config(config: &Config) -> anyhow::Result<IpGeolocationClient> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `ipgeo configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let client = match config.base_url.as_deref() {
        Some(base_url) => {
            IpGeolocationClient::with_transport(api_key, HttpTransport::with_base_url(base_url)?)?
        }
        None => IpGeolocationClient::new(api_key)?,
    };

    Ok(client)
}
