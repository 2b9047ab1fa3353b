pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod render;
pub mod services;

use config::Settings;
use render::{DocumentRenderer, RenderSettings};
use services::{ApiClient, CompanyClient, Exporter, QuoteClient, QuoteStore};
use std::sync::Arc;

pub use error::AppError;

/// Clients shared by every command.
pub struct AppState {
    pub settings: Settings,
    pub quotes: Arc<dyn QuoteStore>,
    pub company: Arc<CompanyClient>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let api = Arc::new(ApiClient::new(&settings.backend));
        Self {
            quotes: Arc::new(QuoteClient::new(Arc::clone(&api))),
            company: Arc::new(CompanyClient::new(api)),
            settings,
        }
    }

    pub fn exporter(&self) -> Exporter {
        Exporter::new(
            Arc::clone(&self.quotes),
            Arc::clone(&self.company),
            DocumentRenderer::new(RenderSettings::from(&self.settings.export)),
            self.settings.export.pdf_source,
        )
    }
}
