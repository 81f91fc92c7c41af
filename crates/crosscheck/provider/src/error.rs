use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by provider implementations.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to generate key: {0}")]
    KeyGeneration(String),

    #[error("Failed to import key: {0}")]
    KeyImport(String),

    #[error("Failed to export key: {0}")]
    KeyExport(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Signature verification failed: {0}")]
    Verification(String),

    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),
}
