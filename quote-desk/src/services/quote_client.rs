//! Quote repository over the external quote API.

use super::api::ApiClient;
use crate::error::AppError;
use crate::models::{ExportFormat, Quote, QuoteDraft, QuoteId};
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;

/// CRUD and export contract of the quote store.
///
/// A failed call leaves nothing half-applied on the client side; callers
/// only replace their local state with a successful result.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Quote>, AppError>;

    /// Fails with [`AppError::NotFound`] when no such quote exists.
    async fn get(&self, id: &QuoteId) -> Result<Quote, AppError>;

    /// The store assigns `id` and `quote_number`.
    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, AppError>;

    async fn update(&self, id: &QuoteId, draft: &QuoteDraft) -> Result<Quote, AppError>;

    async fn delete(&self, id: &QuoteId) -> Result<(), AppError>;

    /// Server-rendered document bytes.
    async fn export_document(&self, id: &QuoteId, format: ExportFormat)
        -> Result<Vec<u8>, AppError>;
}

pub struct QuoteClient {
    api: Arc<ApiClient>,
}

impl QuoteClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl QuoteStore for QuoteClient {
    async fn list(&self) -> Result<Vec<Quote>, AppError> {
        let quotes: Vec<Quote> = self.api.get_json("/quotes").await?;
        tracing::debug!(count = quotes.len(), "Fetched quote list");
        Ok(quotes)
    }

    async fn get(&self, id: &QuoteId) -> Result<Quote, AppError> {
        self.api
            .get_json(&format!("/quotes/{}", id))
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(format!("Quote {}", id)),
                other => other,
            })
    }

    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, AppError> {
        let quote: Quote = self.api.send_json(Method::POST, "/quotes", draft).await?;
        tracing::info!(
            quote_id = %quote.id,
            quote_number = %quote.quote_number,
            "Quote created"
        );
        Ok(quote)
    }

    async fn update(&self, id: &QuoteId, draft: &QuoteDraft) -> Result<Quote, AppError> {
        let quote: Quote = self
            .api
            .send_json(Method::PUT, &format!("/quotes/{}", id), draft)
            .await?;
        tracing::info!(quote_id = %id, "Quote updated");
        Ok(quote)
    }

    async fn delete(&self, id: &QuoteId) -> Result<(), AppError> {
        self.api.delete(&format!("/quotes/{}", id)).await?;
        tracing::info!(quote_id = %id, "Quote deleted");
        Ok(())
    }

    async fn export_document(
        &self,
        id: &QuoteId,
        format: ExportFormat,
    ) -> Result<Vec<u8>, AppError> {
        let bytes = self
            .api
            .get_bytes(&format!("/quotes/{}/export/{}", id, format.as_path()))
            .await?;
        tracing::info!(quote_id = %id, format = %format, size = bytes.len(), "Export downloaded");
        Ok(bytes)
    }
}
