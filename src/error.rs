use thiserror::Error;

/// Everything a user action can fail with. The shell reports these inline;
/// none of them stop the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid amount '{input}': enter digits only, e.g. 1000000 or 1.000.000")]
    InvalidAmount { input: String },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("tax category '{name}' already exists")]
    DuplicateCategory { name: String },

    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("total exceeds the largest supported amount")]
    AmountOverflow,

    #[error("wrong username or password")]
    AuthFailed,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn empty(field: &'static str) -> Self {
        AppError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        }
    }
}
