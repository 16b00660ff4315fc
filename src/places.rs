use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::trace;

use crate::address::{AddressComponent, Suggestion};
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult, FetchError};

/// Raw upstream reply. Classification of the status and body is left to the
/// suggestion fetcher and detail resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport for the two upstream calls. Implementations report only
/// connection-level failures as `Err`; any HTTP reply is an `Ok`.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<ApiResponse, FetchError>;
    async fn details(&self, candidate_id: &str) -> Result<ApiResponse, FetchError>;
}

#[derive(Clone)]
pub struct PlacesService {
    inner: Arc<dyn PlacesApi>,
}

impl PlacesService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let client = HttpPlacesClient::new(config)?;
        Ok(Self {
            inner: Arc::new(client),
        })
    }

    pub fn from_api(api: Arc<dyn PlacesApi>) -> Self {
        Self { inner: api }
    }

    pub async fn search(&self, query: &str) -> Result<ApiResponse, FetchError> {
        self.inner.search(query).await
    }

    pub async fn details(&self, candidate_id: &str) -> Result<ApiResponse, FetchError> {
        self.inner.details(candidate_id).await
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPayload {
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub predictions: Option<Vec<Suggestion>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsPayload {
    pub result: DetailsResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResult {
    pub address_components: Vec<AddressComponent>,
}

pub struct HttpPlacesClient {
    http: reqwest::Client,
    search_url: Url,
    details_url: Url,
    api_key: Option<SecretString>,
}

impl HttpPlacesClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("address-autocomplete/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            search_url: endpoint(&config.api_base_url, &config.search_path)?,
            details_url: endpoint(&config.api_base_url, &config.details_path)?,
            api_key: config.google_places_api_key.clone(),
        })
    }

    async fn get(&self, url: &Url, param: (&str, &str)) -> Result<ApiResponse, FetchError> {
        let mut request = self.http.get(url.clone()).query(&[param]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.expose_secret())]);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        trace!(url = %url, status, bytes = body.len(), "places response received");
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl PlacesApi for HttpPlacesClient {
    async fn search(&self, query: &str) -> Result<ApiResponse, FetchError> {
        self.get(&self.search_url, ("query", query)).await
    }

    async fn details(&self, candidate_id: &str) -> Result<ApiResponse, FetchError> {
        self.get(&self.details_url, ("placeId", candidate_id)).await
    }
}

fn endpoint(base: &str, path: &str) -> AppResult<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|err| AppError::Config(format!("invalid endpoint {joined}: {err}")))
}
