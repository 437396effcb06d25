// =============================================================================
// Atelier Client - HTTP Client
// =============================================================================
// Table of Contents:
// 1. Sync Client
// 2. Request Helpers
// =============================================================================

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

// -----------------------------------------------------------------------------
// 1. Sync Client
// -----------------------------------------------------------------------------

/// Authenticated HTTP client for the scene API.
///
/// The bearer token is an explicit constructor argument, not ambient storage;
/// swapping accounts means building a new client.
pub struct SyncClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl SyncClient {
    /// Create a new client for the given API origin and bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    // -------------------------------------------------------------------------
    // 2. Request Helpers
    // -------------------------------------------------------------------------

    /// Handle API response.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status().as_u16();

        match status {
            200..=299 => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Deserialize(e.to_string())),
            401 => Err(ApiError::Unauthorized),
            403 => Err(ApiError::Forbidden),
            404 => Err(ApiError::NotFound),
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Server { status, message })
            }
        }
    }

    /// GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(endpoint))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::handle_response(response).await
    }

    /// POST request with JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.url(endpoint))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::handle_response(response).await
    }

    /// DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .delete(self.url(endpoint))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::handle_response(response).await
    }
}
