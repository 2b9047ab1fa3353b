//! Client-side quote document renderer.
//!
//! The pipeline is sections → blocks → pages → PDF. Text is shaped with
//! the bundled fonts, so Arabic and Latin render side by side. Logo
//! problems and characters the fonts lack are reported as warnings; the
//! document is still produced.

pub mod layout;
pub mod logo;
mod pdf;
pub mod sections;
pub mod text;

use crate::config::ExportSettings;
use crate::format::Locale;
use crate::models::{CompanyProfile, Quote};
use layout::{paginate, Frame};
use sections::{build_blocks, SectionInput, LOGO_MAX_HEIGHT, LOGO_MAX_WIDTH};
use std::fmt;
use text::{FontBook, FontError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Font(#[from] FontError),
}

/// Non-fatal problem met while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    LogoUnavailable { reason: String },
    MissingGlyphs { count: usize },
    OversizedBlock { label: &'static str },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::LogoUnavailable { reason } => {
                write!(f, "logo left out: {}", reason)
            }
            RenderWarning::MissingGlyphs { count } => write!(
                f,
                "{} character(s) have no glyph in the bundled fonts and show as empty boxes",
                count
            ),
            RenderWarning::OversizedBlock { label } => {
                write!(f, "{} is taller than a page and was cut off", label)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub margin_mm: f32,
    pub raster_scale: f32,
    pub break_after_header: bool,
    pub break_before_terms: bool,
    pub locale: Locale,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::from(&ExportSettings::default())
    }
}

impl From<&ExportSettings> for RenderSettings {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            margin_mm: settings.page.margin_mm,
            raster_scale: settings.page.raster_scale,
            break_after_header: settings.page.break_after_header,
            break_before_terms: settings.page.break_before_terms,
            locale: settings.locale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<RenderWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    settings: RenderSettings,
}

impl DocumentRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Render `quote` as an A4 PDF. `logo` holds the raw logo file, if any;
    /// an undecodable logo is skipped with a warning.
    pub fn render(
        &self,
        quote: &Quote,
        company: &CompanyProfile,
        logo: Option<&[u8]>,
    ) -> Result<RenderedPdf, RenderError> {
        let mut warnings = Vec::new();
        let fonts = FontBook::load()?;

        let logo = logo.and_then(|data| {
            match logo::prepare_logo(data, LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT, self.settings.raster_scale) {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!(error = %e, "Logo could not be decoded");
                    warnings.push(RenderWarning::LogoUnavailable {
                        reason: e.to_string(),
                    });
                    None
                }
            }
        });

        let frame = Frame::a4(self.settings.margin_mm);
        let blocks = build_blocks(&SectionInput {
            fonts: &fonts,
            quote,
            company,
            logo: logo.as_ref(),
            locale: self.settings.locale,
            width: frame.width,
            break_after_header: self.settings.break_after_header,
            break_before_terms: self.settings.break_before_terms,
        });
        let pages = paginate(blocks, &frame, &mut warnings);

        let output = pdf::write_pdf(&pages, &frame, logo.as_ref(), &fonts)?;
        if output.missing_glyphs > 0 {
            tracing::warn!(
                count = output.missing_glyphs,
                "Characters without a glyph in the bundled fonts"
            );
            warnings.push(RenderWarning::MissingGlyphs {
                count: output.missing_glyphs,
            });
        }

        tracing::info!(
            quote_number = %quote.quote_number,
            pages = pages.len(),
            size = output.bytes.len(),
            "Quote PDF rendered"
        );
        Ok(RenderedPdf {
            bytes: output.bytes,
            page_count: pages.len(),
            warnings,
        })
    }
}
