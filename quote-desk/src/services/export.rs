//! Quote export: server downloads and locally rendered PDFs.

use super::company_client::CompanyClient;
use super::quote_client::QuoteStore;
use crate::config::PdfSource;
use crate::error::AppError;
use crate::models::{ExportFormat, QuoteId};
use crate::render::{DocumentRenderer, RenderWarning};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// `quote_{quote_number}.{pdf|xlsx}`
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    /// Known only for locally rendered PDFs.
    pub page_count: Option<usize>,
    pub warnings: Vec<RenderWarning>,
}

impl ExportedDocument {
    /// Write into `dir` through a temporary `.part` file. On failure no
    /// partial file is left behind.
    pub async fn save(&self, dir: &Path) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(&self.file_name);
        let partial = dir.join(format!("{}.part", self.file_name));

        let written = match tokio::fs::write(&partial, &self.bytes).await {
            Ok(()) => tokio::fs::rename(&partial, &target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::debug!(error = %cleanup, "No partial export to remove");
            }
            tracing::error!(path = %target.display(), error = %e, "Writing export failed");
            return Err(e.into());
        }

        tracing::info!(path = %target.display(), size = self.bytes.len(), "Export saved");
        Ok(target)
    }
}

pub struct Exporter {
    quotes: Arc<dyn QuoteStore>,
    company: Arc<CompanyClient>,
    renderer: DocumentRenderer,
    pdf_source: PdfSource,
}

impl Exporter {
    pub fn new(
        quotes: Arc<dyn QuoteStore>,
        company: Arc<CompanyClient>,
        renderer: DocumentRenderer,
        pdf_source: PdfSource,
    ) -> Self {
        Self {
            quotes,
            company,
            renderer,
            pdf_source,
        }
    }

    pub fn with_pdf_source(mut self, pdf_source: PdfSource) -> Self {
        self.pdf_source = pdf_source;
        self
    }

    pub async fn export(
        &self,
        id: &QuoteId,
        format: ExportFormat,
    ) -> Result<ExportedDocument, AppError> {
        let quote = self.quotes.get(id).await?;
        let file_name = format.file_name(&quote.quote_number);

        if format == ExportFormat::Excel || self.pdf_source == PdfSource::Server {
            let bytes = self.quotes.export_document(id, format).await?;
            return Ok(ExportedDocument {
                file_name,
                content_type: format.content_type(),
                bytes,
                page_count: None,
                warnings: Vec::new(),
            });
        }

        let profile = self.company.get().await?;
        let mut warnings = Vec::new();
        let logo = match self.company.fetch_logo(&profile).await {
            Ok(logo) => logo,
            Err(e) => {
                tracing::warn!(quote_id = %id, error = %e, "Logo download failed, rendering without it");
                warnings.push(RenderWarning::LogoUnavailable {
                    reason: e.to_string(),
                });
                None
            }
        };

        let rendered = self.renderer.render(&quote, &profile, logo.as_deref())?;
        warnings.extend(rendered.warnings);

        Ok(ExportedDocument {
            file_name,
            content_type: format.content_type(),
            bytes: rendered.bytes,
            page_count: Some(rendered.page_count),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str) -> ExportedDocument {
        ExportedDocument {
            file_name: name.to_string(),
            content_type: ExportFormat::Pdf.content_type(),
            bytes: b"%PDF-1.5".to_vec(),
            page_count: Some(1),
            warnings: Vec::new(),
        }
    }

    #[tokio::test]
    async fn saves_and_leaves_no_part_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = document("quote_7.pdf").save(dir.path()).await.unwrap();

        assert_eq!(path, dir.path().join("quote_7.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
        assert!(!dir.path().join("quote_7.pdf.part").exists());
    }

    #[tokio::test]
    async fn failed_write_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go makes the rename fail.
        std::fs::create_dir(dir.path().join("quote_8.pdf")).unwrap();
        std::fs::write(dir.path().join("quote_8.pdf").join("keep"), b"x").unwrap();

        let result = document("quote_8.pdf").save(dir.path()).await;
        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(!dir.path().join("quote_8.pdf.part").exists());
    }
}
