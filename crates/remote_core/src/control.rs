//! Client side of the remote control service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{Command, TrackSnapshot},
    protocol::{CurrentTrackResponse, LyricsResponse},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::DEFAULT_REQUEST_TIMEOUT;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("invalid control service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("control service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("control service answered {status}: {body}")]
    Status { status: u16, body: String },
}

impl ControlError {
    /// Text the service sent with a failed response, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ControlError::Status { body, .. } if !body.trim().is_empty() => Some(body.trim()),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ControlService: Send + Sync {
    /// Performs `command` and returns the service's status text.
    async fn send_command(&self, command: Command) -> Result<String, ControlError>;
    /// `None` when nothing is playing.
    async fn current_track(&self) -> Result<Option<TrackSnapshot>, ControlError>;
    async fn lyrics(&self) -> Result<LyricsResponse, ControlError>;
}

pub struct HttpControlService {
    http: Client,
    base: Url,
}

impl HttpControlService {
    pub fn new(base_url: &str) -> Result<Self, ControlError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Every request, body included, fails with a `Request` error once
    /// `timeout` has elapsed.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ControlError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ControlError> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, route: &str) -> Result<Url, ControlError> {
        Ok(self.base.join(route.trim_start_matches('/'))?)
    }
}

async fn failure(response: reqwest::Response) -> ControlError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ControlError::Status { status, body }
}

#[async_trait]
impl ControlService for HttpControlService {
    async fn send_command(&self, command: Command) -> Result<String, ControlError> {
        let url = self.endpoint(command.as_str())?;
        debug!(%command, %url, "sending control command");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(response.text().await?)
    }

    async fn current_track(&self) -> Result<Option<TrackSnapshot>, ControlError> {
        let response = self.http.get(self.endpoint("current-track")?).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        let body: CurrentTrackResponse = response.json().await?;
        Ok(body.into_snapshot())
    }

    async fn lyrics(&self) -> Result<LyricsResponse, ControlError> {
        let response = self.http.get(self.endpoint("lyrics")?).send().await?;
        if !response.status().is_success() {
            return Err(failure(response).await);
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/control_tests.rs"]
mod tests;
