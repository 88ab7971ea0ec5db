use thiserror::Error;

/// fatal conditions surfaced to the caller.
/// no error condition ever produces a silently wrong count.
#[derive(Error, Debug)]
pub enum Error {
    /// malformed input table: no partial structure is surfaced
    #[error("construction: {0}")]
    Construction(String),
    /// fatal to the single query, the tree and cache stay valid
    #[error("query: {0}")]
    Query(String),
    /// counter limits exceeded before any build begins
    #[error("saturation: {0}")]
    Saturation(String),
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("report encoding: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "database")]
    #[error("store: {0}")]
    Store(#[from] tokio_postgres::Error),
}
