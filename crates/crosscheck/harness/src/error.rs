use crosscheck_provider::ProviderError;
use crosscheck_store::StoreError;
use crosscheck_types::KeyReference;
use thiserror::Error;

/// Result type for compatibility test bodies and steps.
pub type CompatResult<T> = Result<T, CompatError>;

/// Harness-level errors.
///
/// Every variant surfaces to the step's caller as the step's failure
/// result; nothing is swallowed or retried, because the compatibility
/// guarantee depends on every discrepancy being visible.
#[derive(Debug, Error)]
pub enum CompatError {
    /// Reproduced output differs from the originally generated value.
    #[error("content mismatch: {context}")]
    ContentMismatch { context: String },

    /// A stored record references a key this scope never registered.
    /// Indicates store corruption or cross-algorithm leakage.
    #[error("unknown key reference {reference}")]
    UnknownKeyReference { reference: KeyReference },

    /// Not a single stored key reference could be reconstructed from any
    /// of its encodings.
    #[error("key reconstruction failed for all {references} stored references")]
    KeyReconstruction { references: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl CompatError {
    pub fn content_mismatch(context: impl Into<String>) -> Self {
        CompatError::ContentMismatch {
            context: context.into(),
        }
    }
}
