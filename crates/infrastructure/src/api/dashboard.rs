//! Client for the backend's protected dashboard endpoint.
//!
//! Every request fetches a token through the [`AuthClient`] so that an
//! expired session is silently renewed before the call goes out.

use std::sync::Arc;
use std::time::Duration;

use keyhole_application::AuthClient;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Request timeout for backend calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors returned by [`DashboardApi`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No access token is available; the user must sign in.
    #[error("not authenticated")]
    Unauthenticated,

    /// The backend rejected the token.
    #[error("token rejected by backend")]
    Unauthorized,

    /// The token lacks the role required by the endpoint.
    #[error("insufficient role")]
    Forbidden,

    /// Any other non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Body of `GET /dashboard`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardResponse {
    /// Greeting for the signed-in user.
    pub message: String,
    /// Dashboard metadata.
    pub meta: DashboardMeta,
}

/// Metadata attached to the dashboard response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardMeta {
    /// Number of widgets to render.
    pub widgets: u32,
    /// Server time as a UNIX timestamp.
    pub time: f64,
}

/// Bearer-authenticated client for the dashboard API.
pub struct DashboardApi {
    client: Client,
    base_url: Url,
    auth: Arc<dyn AuthClient>,
}

impl DashboardApi {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: Url, auth: Arc<dyn AuthClient>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("keyhole/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url, auth))
    }

    /// Creates a client around a preconfigured reqwest client.
    #[must_use]
    pub fn with_client(client: Client, base_url: Url, auth: Arc<dyn AuthClient>) -> Self {
        Self {
            client,
            base_url,
            auth,
        }
    }

    /// URL of the dashboard endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be joined.
    pub fn endpoint(&self) -> Result<Url, ApiError> {
        Ok(self.base_url.join("dashboard")?)
    }

    /// Builds the authenticated request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] if no token is available.
    pub async fn build_request(&self) -> Result<reqwest::Request, ApiError> {
        let token = self
            .auth
            .get_access_token()
            .await
            .ok_or(ApiError::Unauthenticated)?;
        let request = self
            .client
            .get(self.endpoint()?)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .build()?;
        Ok(request)
    }

    /// Fetches the dashboard for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] without contacting the backend
    /// when no token is available, and a status error when the backend
    /// rejects the request.
    pub async fn fetch(&self) -> Result<DashboardResponse, ApiError> {
        let request = self.build_request().await?;
        debug!(url = %request.url(), "fetching dashboard");
        let response = self.client.execute(request).await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            status if !status.is_success() => Err(ApiError::Status(status.as_u16())),
            _ => Ok(response.json().await?),
        }
    }
}
