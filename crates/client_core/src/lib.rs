use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::FetchParameter,
    error::FetchError,
    protocol::{LadderEntry, MatchRecord, PlayerStatsEntry, TestMessage},
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub mod sources;

pub use sources::{
    ladder_view, ladder_view_config, match_history_view, match_history_view_config,
    player_stats_view, player_stats_view_config, LadderSource, MatchHistorySource,
    PlayerStatsSource,
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const LADDER_PATH: &str = "api/ladder";
const PLAYER_STATS_PATH: &str = "api/player-stats";
const MATCH_HISTORY_PATH: &str = "api/player-match-history";
const TEST_MESSAGE_PATH: &str = "api/test";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url must use http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Read-only client for the ladder backend.
///
/// Every call returns a [`FetchError`] classified at this boundary: no
/// response is `NetworkUnavailable`, a non-2xx status is `ServerError`, and a
/// body that does not decode into the expected records is
/// `MalformedResponse`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn ladder(&self) -> Result<Vec<LadderEntry>, FetchError> {
        self.get_json(LADDER_PATH).await
    }

    pub async fn player_stats(&self) -> Result<Vec<PlayerStatsEntry>, FetchError> {
        self.get_json(PLAYER_STATS_PATH).await
    }

    pub async fn match_history(
        &self,
        player: &FetchParameter,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        self.get_json(&format!("{MATCH_HISTORY_PATH}/{player}")).await
    }

    /// Backend liveness probe: `/api/test` or `/api/test/{n}`.
    pub async fn test_message(&self, test_num: Option<u32>) -> Result<TestMessage, FetchError> {
        let path = match test_num {
            Some(n) => format!("{TEST_MESSAGE_PATH}/{n}"),
            None => TEST_MESSAGE_PATH.to_string(),
        };
        self.get_json(&path).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.base_url.join(path).map_err(|err| {
            warn!(path, error = %err, "could not build request url");
            FetchError::InvalidParameter
        })?;
        info!(%url, "fetching");

        let response = self.http.get(url.clone()).send().await.map_err(|err| {
            warn!(%url, error = %err, "request failed before a response arrived");
            FetchError::NetworkUnavailable(err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "backend returned error status");
            return Err(FetchError::ServerError {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|err| {
            warn!(%url, error = %err, "failed reading response body");
            FetchError::NetworkUnavailable(err.to_string())
        })?;

        serde_json::from_slice(&body).map_err(|err| {
            warn!(%url, error = %err, "response body did not match expected shape");
            FetchError::MalformedResponse(err.to_string())
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|source| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::UnsupportedScheme(url.scheme().to_string()));
    }

    // Relative joins would otherwise replace the last path segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
