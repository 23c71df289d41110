use thiserror::Error;

/// Error type used by operations in this crate.
///
/// `InvalidArgument` covers parameter contract violations (bad `k`, bad
/// `epsilon`, dimension mismatch) and is always raised before any numeric
/// work begins. `InvalidData` covers malformed input rows.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
