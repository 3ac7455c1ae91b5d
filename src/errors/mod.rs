// Application error types and the result alias shared by services and handlers.
use thiserror::Error;

pub mod response;
pub mod store;

pub use store::{StoreError, StoreResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    // Bad user input. Handlers usually render these inline on the originating form.
    #[error("{0}")]
    Validation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Template error: {0}")]
    Template(std::io::Error),

    // Stored amounts sum past what a Decimal can hold
    #[error("Ledger totals out of range")]
    Overflow,

    #[error("Task error: {0}")]
    Task(String),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
