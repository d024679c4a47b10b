use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not encode supplements: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("bad stored date '{0}'")]
    BadDate(String),
}
