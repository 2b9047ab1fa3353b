pub mod api;
pub mod company_client;
pub mod editor;
pub mod export;
pub mod quote_client;
pub mod session;
pub mod totals;
pub mod validation;

pub use api::ApiClient;
pub use company_client::CompanyClient;
pub use editor::{DraftEdit, EditorMode, QuoteEditor};
pub use export::{ExportedDocument, Exporter};
pub use quote_client::{QuoteClient, QuoteStore};
pub use session::{Navigation, Session, ViewTicket};
