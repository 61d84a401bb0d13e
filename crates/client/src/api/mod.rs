//! HTTP client for the remote commerce API.
//!
//! The remote API is the source of truth for wishlists, addresses, and
//! orders; this client only calls it. Every request carries a bearer
//! credential obtained from a [`CredentialSource`]. Refreshing expired
//! credentials is the credential source's job: a 401 surfaces as
//! [`ApiError::Unauthorized`] and is never retried here.
//!
//! # Endpoints
//!
//! - `GET /wishlist`, `POST /wishlist/add/{id}`, `DELETE /wishlist/remove/{id}`,
//!   `DELETE /wishlist/clear`
//! - `GET /addresses`, `POST /addresses`
//! - `POST /orders`

mod addresses;
mod orders;
mod types;
mod wishlist;

pub use types::{AddressEnvelope, AddressesEnvelope, OrderConfirmation};

use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// No credential is available (user is signed out).
    #[error("not signed in")]
    MissingCredential,

    /// The credential was rejected or has expired.
    #[error("Unauthorized: credential rejected")]
    Unauthorized,

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether the error is caused by the shopper's request or session rather
    /// than by a transport or server fault.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        match self {
            Self::MissingCredential | Self::Unauthorized | Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 400 && *status < 500,
            Self::Http(_) | Self::Url(_) | Self::Parse(_) => false,
        }
    }

    /// Message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Supplies the bearer credential for API calls.
///
/// The token lifecycle (login, refresh, logout) lives outside this crate.
pub trait CredentialSource: Send + Sync {
    /// Current bearer token, or `None` when signed out.
    fn bearer_token(&self) -> Option<SecretString>;
}

/// A fixed credential, e.g. from configuration.
#[derive(Clone, Default)]
pub struct StaticToken(Option<SecretString>);

impl StaticToken {
    /// Wrap a token (or the absence of one).
    #[must_use]
    pub const fn new(token: Option<SecretString>) -> Self {
        Self(token)
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken")
            .field(&self.0.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl CredentialSource for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        self.0.clone()
    }
}

/// Error body shape returned by the API (`{"message": "..."}`).
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: Option<String>,
}

// =============================================================================
// CommerceClient
// =============================================================================

/// Client for the remote commerce API.
///
/// Cheap to clone; clones share the connection pool and credential source.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialSource>,
}

impl CommerceClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &ApiConfig,
        credentials: impl CredentialSource + 'static,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("shopfront-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CommerceClientInner {
                client,
                base_url: config.base_url.clone(),
                credentials: Arc::new(credentials),
            }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an absolute endpoint URL from a path relative to the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Attach the bearer credential and send.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let token = self
            .inner
            .credentials
            .bearer_token()
            .ok_or(ApiError::MissingCredential)?;

        Ok(request.bearer_auth(token.expose_secret()).send().await?)
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.inner.client.get(url)).await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with an optional JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
        headers: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = self.inner.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        let response = self.send(request).await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request and parse the JSON body.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.inner.client.delete(url)).await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request whose body is only an acknowledgement.
    pub(crate) async fn delete_ack(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.inner.client.delete(url)).await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse commerce API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Parse error response from the API.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return ApiError::RateLimited(retry_after);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_default();

        tracing::warn!(
            status = %status,
            body = %body.chars().take(200).collect::<String>(),
            "Commerce API returned non-success status"
        );

        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CommerceClient {
        let config = ApiConfig {
            base_url: Url::parse(base).unwrap(),
            timeout_secs: 5,
        };
        CommerceClient::new(&config, StaticToken::default()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let c = client("https://api.example.test/v1");
        assert_eq!(
            c.endpoint("/wishlist").unwrap().as_str(),
            "https://api.example.test/v1/wishlist"
        );

        let c = client("https://api.example.test/v1/");
        assert_eq!(
            c.endpoint("wishlist/add/p1").unwrap().as_str(),
            "https://api.example.test/v1/wishlist/add/p1"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        // No server is contacted: the credential check happens first
        let c = client("http://127.0.0.1:9");
        let result: Result<serde_json::Value, ApiError> = c.get("/wishlist").await;
        assert!(matches!(result, Err(ApiError::MissingCredential)));
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(ApiError::Unauthorized.is_user_facing());
        assert!(
            ApiError::Api {
                status: 404,
                message: String::new()
            }
            .is_user_facing()
        );
        assert!(
            !ApiError::Api {
                status: 502,
                message: String::new()
            }
            .is_user_facing()
        );
        assert!(!ApiError::Parse("x".to_string()).is_user_facing());
    }

    #[test]
    fn test_server_message() {
        let err = ApiError::Api {
            status: 400,
            message: "Product already in wishlist".to_string(),
        };
        assert_eq!(err.server_message(), Some("Product already in wishlist"));
        assert_eq!(ApiError::Unauthorized.server_message(), None);
    }

    #[test]
    fn test_static_token_debug_redacts() {
        let token = StaticToken::new(Some(SecretString::from("tok_live_abc")));
        let debug = format!("{token:?}");
        assert!(!debug.contains("tok_live_abc"));
        assert!(debug.contains("REDACTED"));
    }
}
