//! REST implementation of [`TaskApi`]
//!
//! Every request carries the API key in the `X-Goog-Api-Key` header. The key
//! is looked up per request so a login or logout takes effect without
//! rebuilding the client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::types::{
    CreateActivityRequest, ListActivitiesResponse, ListSessionsResponse, ListSourcesResponse,
    OutgoingMessage,
};
use super::{Activity, CreateSessionRequest, Page, Session, Source, TaskApi};
use crate::config::ApiConfig;
use crate::credentials::CredentialStore;
use crate::error::{Result, SyncError};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const API_VERSION: &str = "v1alpha";

/// HTTP client for the remote task service.
pub struct HttpTaskApi {
    client: Client,
    base_url: Url,
    page_size: u32,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpTaskApi {
    /// Creates a client from API configuration.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Config` if the base URL is invalid and
    /// `SyncError::Network` if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use julesync::api::HttpTaskApi;
    /// use julesync::config::ApiConfig;
    /// use julesync::credentials::MemoryCredentialStore;
    ///
    /// let api = HttpTaskApi::new(&ApiConfig::default(), Arc::new(MemoryCredentialStore::default()));
    /// assert!(api.is_ok());
    /// ```
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("julesync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized HTTP client for {}", config.base_url);

        Ok(Self {
            client,
            base_url: normalize_base_url(&config.base_url)?,
            page_size: config.page_size,
            credentials,
        })
    }

    /// Checks a candidate key by listing sources with it.
    ///
    /// Any failure, including a network error, yields `false`.
    pub async fn validate_api_key(&self, key: &str) -> bool {
        let request = match self.request(Method::GET, &["sources"]) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("API key validation failed: {:#}", e);
                return false;
            }
        };
        match self.send(request, key).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("API key validation failed: {:#}", e);
                false
            }
        }
    }

    fn api_key(&self) -> Result<String> {
        self.credentials
            .api_key()?
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SyncError::NotAuthenticated.into())
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    /// Appends `segments` below the versioned base path.
    ///
    /// Each segment is percent-encoded on its own, so an id containing `/`,
    /// `?` or `#` stays inside its segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::Config(format!("Base URL {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push(API_VERSION)
            .extend(segments);
        Ok(url)
    }

    fn paged(&self, request: RequestBuilder, page_token: Option<&str>) -> RequestBuilder {
        let request = request.query(&[("pageSize", self.page_size.to_string())]);
        match page_token {
            Some(token) => request.query(&[("pageToken", token)]),
            None => request,
        }
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(&self, request: RequestBuilder, key: &str) -> Result<String> {
        let response = request
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(SyncError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(body)
    }

    async fn execute<T: DeserializeOwned>(&self, method: Method, segments: &[&str]) -> Result<T> {
        let key = self.api_key()?;
        let body = self.send(self.request(method, segments)?, &key).await?;
        decode(&body)
    }
}

/// Guarantees a trailing slash so relative paths join below the base.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash)
        .map_err(|e| SyncError::Config(format!("Invalid base URL {}: {}", raw, e)).into())
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    Ok(serde_json::from_str(body).map_err(SyncError::Serialization)?)
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_sessions(&self, page_token: Option<&str>) -> Result<Page<Session>> {
        let key = self.api_key()?;
        let request = self.paged(
            self.request(Method::GET, &["sessions"])?,
            page_token,
        );
        let response: ListSessionsResponse = decode(&self.send(request, &key).await?)?;
        let page: Page<Session> = response.into();
        tracing::debug!(
            count = page.items.len(),
            has_more = page.has_more(),
            "Fetched sessions page"
        );
        Ok(page)
    }

    async fn list_activities(
        &self,
        session_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Activity>> {
        let key = self.api_key()?;
        let request = self.paged(
            self.request(Method::GET, &["sessions", session_id, "activities"])?,
            page_token,
        );
        let response: ListActivitiesResponse = decode(&self.send(request, &key).await?)?;
        let page: Page<Activity> = response.into();
        tracing::debug!(
            session_id,
            count = page.items.len(),
            "Fetched activities page"
        );
        Ok(page)
    }

    async fn create_activity(&self, session_id: &str, text: &str) -> Result<Activity> {
        let key = self.api_key()?;
        let body = CreateActivityRequest {
            user_message: OutgoingMessage { message: text },
        };
        let request = self
            .request(Method::POST, &["sessions", session_id, "activities"])?
            .json(&body);
        decode(&self.send(request, &key).await?)
    }

    async fn create_session(&self, request: &CreateSessionRequest) -> Result<Session> {
        let key = self.api_key()?;
        let http_request = self
            .request(Method::POST, &["sessions"])?
            .json(request);
        let session: Session = decode(&self.send(http_request, &key).await?)?;
        tracing::info!("Created session {}", session.id);
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.execute(Method::GET, &["sessions", session_id]).await
    }

    async fn cancel_session(&self, session_id: &str) -> Result<Session> {
        let action = format!("{}:cancel", session_id);
        self.execute(Method::POST, &["sessions", action.as_str()])
            .await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let key = self.api_key()?;
        let request = self.request(Method::DELETE, &["sessions", session_id])?;
        self.send(request, &key).await?;
        tracing::info!("Deleted session {}", session_id);
        Ok(())
    }

    async fn list_sources(&self) -> Result<Vec<Source>> {
        let response: ListSourcesResponse = self
            .execute(Method::GET, &["sources"])
            .await?;
        Ok(response.sources.unwrap_or_default())
    }
}
