//! Common utilities for the Ironic API client
//!
//! Provides the authenticated HTTP wrapper shared by all endpoints.

use crate::error::IronicError;
use crate::models::ErrorBody;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Microversion requested when none is configured (Rocky)
pub const DEFAULT_API_VERSION: &str = "1.46";

/// HTTP client wrapper with authentication and microversion headers
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    api_version: String,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Override the requested API microversion
    pub fn set_api_version(&mut self, api_version: String) {
        self.api_version = api_version;
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the requested API microversion
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.build_url(path);
        debug!("{} {}", method, url);

        let builder = self
            .client
            .request(method, &url)
            .header("Accept", "application/json")
            .header("X-OpenStack-Ironic-API-Version", &self.api_version);
        match &self.token {
            Some(token) => builder.header("X-Auth-Token", token),
            None => builder,
        }
    }

    /// Turn a non-success response into an `IronicError`
    async fn check(method: &Method, path: &str, response: Response) -> Result<Response, IronicError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.fault_string())
            .unwrap_or(body);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                IronicError::Authentication(format!("{method} {path}: {status} - {detail}"))
            }
            StatusCode::NOT_FOUND => IronicError::NotFound(format!("{path}: {detail}")),
            StatusCode::BAD_REQUEST => IronicError::InvalidRequest(detail),
            _ => IronicError::Api(format!("{method} {path} failed: {status} - {detail}")),
        })
    }

    /// Make a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, IronicError> {
        let response = self.request(Method::GET, path).send().await?;
        let response = Self::check(&Method::GET, path, response).await?;
        Ok(response.json().await?)
    }

    /// Make a GET request, mapping 404 to `None`
    pub async fn get_optional<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
    ) -> Result<Option<T>, IronicError> {
        match self.get(path).await {
            Ok(value) => Ok(Some(value)),
            Err(IronicError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Make a POST request
    pub async fn post<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, IronicError> {
        debug!("POST {} with body: {}", path, serde_json::to_string(body).unwrap_or_default());
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = Self::check(&Method::POST, path, response).await?;
        Ok(response.json().await?)
    }

    /// Make a PATCH request
    pub async fn patch<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, IronicError> {
        debug!("PATCH {} with body: {}", path, serde_json::to_string(body).unwrap_or_default());
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        let response = Self::check(&Method::PATCH, path, response).await?;
        Ok(response.json().await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), IronicError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check(&Method::DELETE, path, response).await?;
        Ok(())
    }
}

/// Percent-encode a single path segment or query value
pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let http = HttpClient::new(Client::new(), "http://ironic:6385/".to_string(), None);
        assert_eq!(http.base_url(), "http://ironic:6385");
        assert_eq!(http.build_url("/v1/nodes"), "http://ironic:6385/v1/nodes");
        assert_eq!(http.build_url("http://other/v1/ports"), "http://other/v1/ports");
        assert_eq!(http.api_version(), DEFAULT_API_VERSION);
    }

    #[test]
    fn test_encode_mac_address() {
        assert_eq!(encode("aa:bb:cc:dd:ee:ff"), "aa%3Abb%3Acc%3Add%3Aee%3Aff");
        assert_eq!(encode("node one"), "node%20one");
    }
}
