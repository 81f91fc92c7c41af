use crosscheck_types::{KeyReference, ParametersId, RecordError};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer errors.
///
/// Write and read failures are propagated without retry: a silent retry
/// could mask the nondeterminism the compatibility protocol exists to
/// detect.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store write failed: {0}")]
    Write(String),

    #[error("store read failed: {0}")]
    Read(String),

    #[error("unknown parameters id {id} in {algorithm}/{scope}")]
    UnknownParametersId {
        algorithm: String,
        scope: String,
        id: ParametersId,
    },

    #[error("unknown key reference {reference} for algorithm {algorithm}")]
    UnknownKeyReference {
        algorithm: String,
        reference: KeyReference,
    },

    #[error("stored record type mismatch: expected '{expected}', found '{found}'")]
    TypeMismatch { expected: String, found: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<RecordError> for StoreError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Serialization(msg) => StoreError::Serialization(msg),
            RecordError::TagMismatch { expected, found } => {
                StoreError::TypeMismatch { expected, found }
            }
        }
    }
}
