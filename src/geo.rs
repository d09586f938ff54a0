//! Location services: where "current location" coordinates come from

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::state::LocationFailure;

pub const DEFAULT_IP_LOCATE_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(thiserror::Error, Debug)]
pub enum LocateError {
    #[error("location request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("location refused: {0}")]
    Denied(String),
    #[error("no location service available")]
    Unsupported,
}

impl LocateError {
    /// The user-facing category for this error
    pub fn failure(&self) -> LocationFailure {
        match self {
            LocateError::Unsupported => LocationFailure::Unsupported,
            LocateError::Denied(_) => LocationFailure::Denied,
            LocateError::Request(_) => LocationFailure::Unavailable,
        }
    }
}

#[async_trait]
pub trait Locator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocateError>;
}

/// Approximate position from the public IP address
#[derive(Clone, Debug)]
pub struct IpLocator {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl IpLocator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LocateError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Locator for IpLocator {
    async fn locate(&self) -> Result<Coordinates, LocateError> {
        tracing::debug!(url = %self.url, "resolving location from IP");
        let data: IpApiResponse = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (data.status.as_str(), data.lat, data.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(LocateError::Denied(
                data.message.unwrap_or_else(|| data.status.clone()),
            )),
        }
    }
}

/// Coordinates given on the command line
#[derive(Clone, Copy, Debug)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocateError> {
        Ok(self.0)
    }
}

/// Location lookups disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLocator;

#[async_trait]
impl Locator for NoLocator {
    async fn locate(&self) -> Result<Coordinates, LocateError> {
        Err(LocateError::Unsupported)
    }
}
