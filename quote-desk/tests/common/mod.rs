#![allow(dead_code)]

use async_trait::async_trait;
use quote_desk::config::{BackendSettings, ExportSettings, LoggingSettings, PdfSource, Settings};
use quote_desk::models::{ExportFormat, Quote, QuoteDraft, QuoteId};
use quote_desk::services::QuoteStore;
use quote_desk::{AppError, AppState};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use wiremock::MockServer;

pub const TEST_QUOTE_ID: &str = "5b0c1a52-7f7e-4c8e-9d2a-0c3c1f0e9a11";

/// Quote API stand-in plus an [`AppState`] wired to it.
pub struct TestApp {
    pub server: MockServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let server = MockServer::start().await;
        let state = AppState::new(settings_for(&server.uri()));
        Self { server, state }
    }

    pub fn with_pdf_source(mut self, pdf_source: PdfSource) -> Self {
        self.state.settings.export.pdf_source = pdf_source;
        self
    }
}

pub fn settings_for(url: &str) -> Settings {
    Settings {
        backend: BackendSettings {
            url: url.to_string(),
        },
        logging: LoggingSettings::default(),
        export: ExportSettings::default(),
    }
}

/// Quote as the API returns it.
pub fn quote_json(id: &str, number: &str) -> Value {
    json!({
        "id": id,
        "quote_number": number,
        "customer": {"name": "Red Sea Events", "city": "Jeddah", "country": "KSA"},
        "project_description": "Tension awning for the main entrance",
        "location": "Obhur",
        "items": [
            {"description": "Awning", "quantity": 2, "unit": "piece", "unit_price": 100, "total_price": 200},
            {"description": "Installation", "quantity": 1, "unit": "job", "unit_price": 50, "total_price": 50}
        ],
        "subtotal": 250.0,
        "tax_amount": 37.5,
        "total_amount": 287.5,
        "notes": "Valid for 30 days",
        "created_date": "2026-10-01T08:30:00Z",
        "updated_date": "2026-10-01T08:30:00Z"
    })
}

pub fn quote(id: &str, number: &str) -> Quote {
    serde_json::from_value(quote_json(id, number)).expect("fixture quote decodes")
}

/// Company profile as the API returns it, Arabic and English names filled.
pub fn company_json(logo_path: Option<&str>) -> Value {
    json!({
        "name_ar": "شركة الظلال للمقاولات",
        "name_en": "Shade Structures Co.",
        "description_ar": "مظلات وخيام",
        "description_en": "Tension awnings and canopies",
        "tax_number": "311104439400003",
        "street": "Hail Street",
        "neighborhood": "حي البغدادية",
        "country": "Saudi Arabia",
        "city": "Jeddah",
        "commercial_registration": "4030255240",
        "building": "8376",
        "postal_code": "22231",
        "additional_number": "3842",
        "email": "info@example.com",
        "phone1": "+966 50 000 0000",
        "phone2": "",
        "phone3": "",
        "logo_path": logo_path
    })
}

/// PNG bytes of a small opaque image.
pub fn png_logo() -> Vec<u8> {
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([20, 90, 160, 255])));
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

/// Store kept in memory, counting calls that reach it.
#[derive(Default)]
pub struct InMemoryQuoteStore {
    quotes: Mutex<BTreeMap<String, Quote>>,
    next_number: AtomicUsize,
    pub calls: AtomicUsize,
}

impl InMemoryQuoteStore {
    pub fn with_quotes(quotes: Vec<Quote>) -> Self {
        let store = Self::default();
        store.next_number.store(quotes.len(), Ordering::SeqCst);
        {
            let mut map = store.quotes.lock().unwrap();
            for quote in quotes {
                map.insert(quote.id.to_string(), quote);
            }
        }
        store
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn materialise(id: QuoteId, number: String, draft: &QuoteDraft) -> Quote {
        let now = chrono::Utc::now();
        Quote {
            id,
            quote_number: number,
            customer: draft.customer.clone(),
            project_description: draft.project_description.clone(),
            location: draft.location.clone(),
            items: draft.items.clone(),
            subtotal: draft.subtotal,
            tax_amount: draft.tax_amount,
            total_amount: draft.total_amount,
            notes: draft.notes.clone(),
            created_date: now,
            updated_date: now,
        }
    }
}

#[async_trait]
impl QuoteStore for InMemoryQuoteStore {
    async fn list(&self) -> Result<Vec<Quote>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.quotes.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: &QuoteId) -> Result<Quote, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.quotes
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Quote {}", id)))
    }

    async fn create(&self, draft: &QuoteDraft) -> Result<Quote, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let number = self.next_number.fetch_add(1, Ordering::SeqCst) + 1;
        let id = QuoteId::new(format!("mem-{}", number));
        let quote = Self::materialise(id, number.to_string(), draft);
        self.quotes
            .lock()
            .unwrap()
            .insert(quote.id.to_string(), quote.clone());
        Ok(quote)
    }

    async fn update(&self, id: &QuoteId, draft: &QuoteDraft) -> Result<Quote, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut quotes = self.quotes.lock().unwrap();
        let existing = quotes
            .get(id.as_str())
            .ok_or_else(|| AppError::NotFound(format!("Quote {}", id)))?;
        let quote = Self::materialise(id.clone(), existing.quote_number.clone(), draft);
        quotes.insert(id.to_string(), quote.clone());
        Ok(quote)
    }

    async fn delete(&self, id: &QuoteId) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.quotes
            .lock()
            .unwrap()
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Quote {}", id)))
    }

    async fn export_document(
        &self,
        id: &QuoteId,
        format: ExportFormat,
    ) -> Result<Vec<u8>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}:{}", format, id).into_bytes())
    }
}
