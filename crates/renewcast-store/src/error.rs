use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("amount conversion error: {0}")]
    Amount(String),

    #[error("store not available: {0}")]
    Unavailable(String),
}
