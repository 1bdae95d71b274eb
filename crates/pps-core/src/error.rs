//! Error types for the PPS tagging toolkit

use thiserror::Error;

/// PPS toolkit error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A requested efficiency object has no backing data
    #[error("no efficiency data for {0}")]
    LookupMiss(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_names_the_key() {
        let err = Error::LookupMiss("raddam sector=45 era=2017B angle=120".into());
        assert!(err.to_string().contains("sector=45"));
    }
}
