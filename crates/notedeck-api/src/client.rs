use std::sync::Arc;
use std::time::Duration;

use notedeck_config::api::ApiConfig;
use notedeck_types::{FileContent, Group, GroupList, GroupStructure, LoginRequest, LoginResponse};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ApiError, CredentialProvider};

/// Client for the notes API.
///
/// The bearer token comes from the [`CredentialProvider`] given at construction.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            credentials,
        }
    }

    pub fn from_config(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.credentials.token().is_some()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.credentials.token().ok_or(ApiError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorized(self.client.get(self.url(path)))?;
        let response = Self::check(request.send().await?).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn send_json<B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.authorized(self.client.request(method, self.url(path)))?;
        Self::check(request.json(body).send().await?).await?;
        Ok(())
    }

    /// Log in and keep the returned token in the credential provider
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("Login rejected with HTTP {}", response.status());
            return Err(ApiError::LoginFailed);
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        self.credentials.store(&login.token)?;
        tracing::info!("Logged in as {}", username);
        Ok(login)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.credentials.clear()
    }

    /// Whether the server still accepts the stored token; any failure counts as no
    pub async fn verify_token(&self) -> bool {
        let Ok(request) = self.authorized(self.client.post(self.url("/auth/verify"))) else {
            return false;
        };

        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Token verification failed: {}", e);
                false
            }
        }
    }

    pub async fn groups(&self) -> Result<Vec<Group>, ApiError> {
        let list: GroupList = self.get_json("/api/groups").await?;
        Ok(list.groups)
    }

    pub async fn group_structure(&self, group_name: &str) -> Result<GroupStructure, ApiError> {
        self.get_json(&format!("/api/group/{}", urlencoding::encode(group_name)))
            .await
    }

    pub async fn file(&self, group_name: &str, file_path: &str) -> Result<FileContent, ApiError> {
        self.get_json(&format!(
            "/api/file/{}/{}",
            urlencoding::encode(group_name),
            urlencoding::encode(file_path)
        ))
        .await
    }

    pub fn asset_url(&self, filename: &str) -> String {
        self.url(&format!("/api/assets/{}", urlencoding::encode(filename)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticToken;

    #[test]
    fn test_asset_url_is_encoded() {
        let client = ApiClient::new("http://example.test/", Arc::new(StaticToken::default()));
        assert_eq!(client.base_url(), "http://example.test");
        assert_eq!(
            client.asset_url("my clip.mp3"),
            "http://example.test/api/assets/my%20clip.mp3"
        );
    }

    #[tokio::test]
    async fn test_requests_without_token_fail_fast() {
        let client = ApiClient::new("http://127.0.0.1:9", Arc::new(StaticToken::default()));
        assert!(!client.has_token());
        assert!(matches!(client.groups().await, Err(ApiError::NotAuthenticated)));
        assert!(!client.verify_token().await);
    }
}
