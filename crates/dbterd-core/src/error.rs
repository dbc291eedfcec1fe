//! Error taxonomy for the conversion pipeline
//!
//! Every variant aborts the run. Nothing in the pipeline retries or recovers.

/// Errors raised while loading artifacts or emitting DBML
#[derive(Debug, thiserror::Error)]
pub enum DbterdError {
    /// An input path does not exist or cannot be read
    #[error("Failed to read {path}: {reason}")]
    NotFound { path: String, reason: String },

    /// An input document is not valid JSON/YAML or has the wrong shape
    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: String, reason: String },

    /// A required key is absent on an otherwise parsed record
    #[error("Missing key '{key}' in {context}")]
    KeyMissing { key: String, context: String },

    /// A relationship `to` expression has no quoted table name
    #[error("Malformed relationship target: {target:?} contains no quoted table name")]
    MalformedRelationshipTarget { target: String },

    /// Writing the output failed
    #[error("IO error: {0}")]
    Io(String),
}

impl DbterdError {
    /// Shorthand for [`DbterdError::KeyMissing`]
    pub fn key_missing(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::KeyMissing {
            key: key.into(),
            context: context.into(),
        }
    }
}

impl From<std::io::Error> for DbterdError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DbterdError>;
