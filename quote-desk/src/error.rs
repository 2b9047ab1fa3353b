use crate::render::RenderError;
use crate::services::totals::EditError;
use crate::services::validation::ValidationErrors;
use service_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// The request never got an HTTP answer (DNS, refused, reset, timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer from the quote API.
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// 2xx answer whose body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Bad input: {0}")]
    BadInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Text for the transient notification shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => format!("Please fix the following: {}", errors),
            AppError::Transport(_) => {
                "Could not reach the quote server. Check the connection and try again.".to_string()
            }
            AppError::Server { .. } | AppError::InvalidResponse(_) => {
                "The quote server could not complete the request.".to_string()
            }
            AppError::NotFound(what) => format!("{} was not found.", what),
            AppError::Render(err) => format!("Export failed: {}", err),
            AppError::Edit(err) => format!("Edit rejected: {}", err),
            AppError::BadInput(msg) => msg.clone(),
            AppError::Config(err) => format!("Configuration problem: {}", err),
            AppError::Io(err) => format!("File error: {}", err),
        }
    }
}
