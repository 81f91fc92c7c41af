use crate::ProviderResult;
use async_trait::async_trait;
use crosscheck_types::{KeyEncoding, TestParameters};

/// A cryptographic algorithm implementation that owns key material.
///
/// One implementation of this trait represents one (algorithm, provider)
/// pair. The algorithm name forms the persistent keyspace shared by every
/// provider of the same algorithm; the provider name only labels reports.
#[async_trait]
pub trait KeyAlgorithm: Send + Sync {
    /// Live key handle. Never serialized directly; keys cross process
    /// boundaries only through [`KeyEncoding`]s.
    type Key: Send + Sync + 'static;

    /// Parameters a key is generated under (e.g. a key size).
    type KeyParams: TestParameters + Clone + Send + Sync + 'static;

    /// Stable algorithm name, e.g. `"AES-GCM"`. Shared across providers.
    fn algorithm(&self) -> &str;

    /// Implementation name, e.g. `"software"`. Reporting only.
    fn provider(&self) -> &str;

    /// Key parameter variants to cover. Stress mode must return a superset
    /// of the non-stress variants.
    fn key_params(&self, stress: bool) -> Vec<Self::KeyParams>;

    async fn generate_key(&self, params: &Self::KeyParams) -> ProviderResult<Self::Key>;

    /// Every supported encoding of the key, canonical form first.
    async fn export_key(&self, key: &Self::Key) -> ProviderResult<Vec<KeyEncoding>>;

    async fn import_key(&self, encoding: &KeyEncoding) -> ProviderResult<Self::Key>;
}

/// Authenticated encryption with associated data.
#[async_trait]
pub trait AeadAlgorithm: KeyAlgorithm {
    /// Encrypts under the given tag size. Implementations reject sizes they
    /// do not support with [`ProviderError::UnsupportedParameter`].
    ///
    /// [`ProviderError::UnsupportedParameter`]: crate::ProviderError::UnsupportedParameter
    async fn encrypt(
        &self,
        key: &Self::Key,
        tag_size_bits: u32,
        plaintext: &[u8],
        associated_data: Option<&[u8]>,
    ) -> ProviderResult<Vec<u8>>;

    async fn decrypt(
        &self,
        key: &Self::Key,
        tag_size_bits: u32,
        ciphertext: &[u8],
        associated_data: Option<&[u8]>,
    ) -> ProviderResult<Vec<u8>>;
}

/// Digital signatures.
#[async_trait]
pub trait SignatureAlgorithm: KeyAlgorithm {
    async fn sign(&self, key: &Self::Key, message: &[u8]) -> ProviderResult<Vec<u8>>;

    async fn verify(
        &self,
        key: &Self::Key,
        message: &[u8],
        signature: &[u8],
    ) -> ProviderResult<()>;
}
