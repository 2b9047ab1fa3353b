//! Company profile client: the settings form's backend.

use super::api::ApiClient;
use super::validation::validate_logo;
use crate::error::AppError;
use crate::models::{CompanyProfile, LogoUpload};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;
use std::sync::Arc;

pub struct CompanyClient {
    api: Arc<ApiClient>,
}

impl CompanyClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get(&self) -> Result<CompanyProfile, AppError> {
        self.api.get_json("/company").await
    }

    pub async fn update(&self, profile: &CompanyProfile) -> Result<CompanyProfile, AppError> {
        let saved = self
            .api
            .send_json(Method::PUT, "/company", profile)
            .await?;
        tracing::info!("Company profile saved");
        Ok(saved)
    }

    /// Upload a logo image (multipart field `file`). Type and size are
    /// checked locally first; nothing is sent when they fail.
    pub async fn upload_logo(&self, file_name: &str, data: Vec<u8>) -> Result<LogoUpload, AppError> {
        let mime = sniff_image_mime(&data);
        validate_logo(mime, data.len())?;
        let mime = mime.unwrap_or("application/octet-stream");

        let size = data.len();
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let upload: LogoUpload = self.api.post_multipart("/company/logo", form).await?;
        tracing::info!(
            file_name = %file_name,
            size,
            logo_path = %upload.logo_path,
            "Logo uploaded"
        );
        Ok(upload)
    }

    pub async fn upload_logo_file(&self, path: &Path) -> Result<LogoUpload, AppError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("logo")
            .to_string();
        self.upload_logo(&file_name, data).await
    }

    /// Logo bytes of `profile`, `None` when no logo is configured.
    pub async fn fetch_logo(&self, profile: &CompanyProfile) -> Result<Option<Vec<u8>>, AppError> {
        let Some(logo_path) = profile.logo_path.as_deref().filter(|p| !p.trim().is_empty())
        else {
            return Ok(None);
        };
        let bytes = self.api.fetch_url(&self.api.asset_url(logo_path)).await?;
        Ok(Some(bytes))
    }
}

/// MIME type of recognised image bytes.
pub fn sniff_image_mime(data: &[u8]) -> Option<&'static str> {
    image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type())
}
