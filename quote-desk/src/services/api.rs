//! Shared HTTP plumbing for the quote API clients.

use crate::config::BackendSettings;
use crate::error::AppError;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use service_core::observability::{TracedClientExt, TracedRequest};

/// Base URLs plus one pooled reqwest client. No retries and no custom
/// timeouts: a failure surfaces to the caller on the first attempt.
pub struct ApiClient {
    client: Client,
    origin: String,
    api_base: String,
}

impl ApiClient {
    pub fn new(settings: &BackendSettings) -> Self {
        Self {
            client: Client::new(),
            origin: settings.origin().to_string(),
            api_base: settings.api_base(),
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Absolute URL of an uploaded asset such as the company logo.
    pub fn asset_url(&self, asset_path: &str) -> String {
        if asset_path.starts_with("http://") || asset_path.starts_with("https://") {
            asset_path.to_string()
        } else if asset_path.starts_with('/') {
            format!("{}{}", self.origin, asset_path)
        } else {
            format!("{}/{}", self.origin, asset_path)
        }
    }

    fn request(&self, method: Method, path: &str) -> TracedRequest {
        self.client.traced(method, &self.api_url(path))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = send(self.request(Method::GET, path), path).await?;
        decode(response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = send(self.request(method, path).json(body), path).await?;
        decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), AppError> {
        send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, AppError> {
        let response = send(self.request(Method::POST, path).multipart(form), path).await?;
        decode(response).await
    }

    /// Raw body of an API route (`path` relative to `/api`).
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let response = send(self.request(Method::GET, path), path).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Raw body of an absolute URL, used for static assets.
    pub(crate) async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = send(self.client.traced_get(url), url).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

async fn send(request: TracedRequest, target: &str) -> Result<Response, AppError> {
    let request_id = request.request_id().to_string();
    let response = request.send().await.map_err(|e| {
        tracing::error!(request_id = %request_id, target = %target, error = %e, "HTTP request failed");
        AppError::Transport(e)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    tracing::warn!(
        request_id = %request_id,
        target = %target,
        status = %status,
        "Quote API returned an error"
    );

    if status == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(target.to_string()));
    }
    Err(AppError::Server {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
