use crate::format::Locale;
use serde::Deserialize;
use service_core::config::{load_configuration, ConfigSource};
use service_core::observability::LogFormat;
use service_core::CoreError;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub backend: BackendSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Origin of the quote API, e.g. `https://quotes.example.com`.
    /// API routes live under `{url}/api`, uploaded assets are served
    /// relative to the origin itself.
    pub url: String,
}

impl BackendSettings {
    pub fn origin(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn api_base(&self) -> String {
        format!("{}/api", self.origin())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// OTLP/gRPC collector; span export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which side renders PDF exports.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PdfSource {
    /// Rendered by this client from the quote and company profile.
    #[default]
    Local,
    /// Downloaded from `GET /quotes/{id}/export/pdf`.
    Server,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub pdf_source: PdfSource,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub page: PageSettings,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            pdf_source: PdfSource::default(),
            locale: Locale::default(),
            page: PageSettings::default(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageSettings {
    #[serde(default = "default_margin_mm")]
    pub margin_mm: f32,
    /// Logo pixels per display point.
    #[serde(default = "default_raster_scale")]
    pub raster_scale: f32,
    #[serde(default)]
    pub break_after_header: bool,
    #[serde(default)]
    pub break_before_terms: bool,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            margin_mm: default_margin_mm(),
            raster_scale: default_raster_scale(),
            break_after_header: false,
            break_before_terms: false,
        }
    }
}

fn default_margin_mm() -> f32 {
    16.0
}

fn default_raster_scale() -> f32 {
    2.0
}

pub fn get_configuration(file: Option<PathBuf>) -> Result<Settings, CoreError> {
    let source = match file {
        Some(path) => ConfigSource::File(path),
        None => ConfigSource::crate_default("quote-desk"),
    };
    load_configuration(&source)
}
