//! service-core: shared infrastructure for the quote-desk workspace.
pub mod config;
pub mod error;
pub mod observability;

pub use error::CoreError;
