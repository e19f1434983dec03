//! # Storefront Error Type
//!
//! Failures that reach the console loop. Domain precondition violations never
//! show up here: the state model ignores them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  CatalogSource ── ApiError ──┐                                          │
//! │                              ├──► AppError ──► error! log + console    │
//! │  stdin / stdout ── io ───────┤                  message, state kept     │
//! │                              │                                          │
//! │  command parsing ── Command ─┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use larek_api::ApiError;
use larek_core::CoreError;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Input line that is not a storefront command.
    #[error("Unknown command: {0}")]
    Command(String),
}

impl AppError {
    /// True when the user may simply try the same action again.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Api(err) => err.is_transient(),
            _ => false,
        }
    }
}
