//! Ed25519 over `ed25519-dalek`.

use crate::jwk;
use async_trait::async_trait;
use crosscheck_provider::{KeyAlgorithm, ProviderError, ProviderResult, SignatureAlgorithm};
use crosscheck_types::{EmptyParameters, KeyEncoding, KeyFormat};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use rand::rngs::OsRng;

/// Ed25519 key pair handle.
pub struct Ed25519Key {
    signing: SigningKey,
}

/// Software Ed25519 implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareEd25519;

impl SoftwareEd25519 {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyAlgorithm for SoftwareEd25519 {
    type Key = Ed25519Key;
    type KeyParams = EmptyParameters;

    fn algorithm(&self) -> &str {
        "Ed25519"
    }

    fn provider(&self) -> &str {
        "software"
    }

    fn key_params(&self, _stress: bool) -> Vec<EmptyParameters> {
        vec![EmptyParameters]
    }

    async fn generate_key(&self, _params: &EmptyParameters) -> ProviderResult<Ed25519Key> {
        Ok(Ed25519Key {
            signing: SigningKey::generate(&mut OsRng),
        })
    }

    async fn export_key(&self, key: &Ed25519Key) -> ProviderResult<Vec<KeyEncoding>> {
        let seed = key.signing.to_bytes();
        let public = key.signing.verifying_key().to_bytes();
        let document = jwk::okp_jwk(&seed, &public).map_err(ProviderError::KeyExport)?;
        Ok(vec![
            KeyEncoding::new(KeyFormat::Raw, seed.to_vec()),
            KeyEncoding::new(KeyFormat::Jwk, document),
        ])
    }

    async fn import_key(&self, encoding: &KeyEncoding) -> ProviderResult<Ed25519Key> {
        let seed = match encoding.format {
            KeyFormat::Raw => encoding.bytes.clone(),
            KeyFormat::Jwk => {
                jwk::parse_okp_jwk(&encoding.bytes).map_err(ProviderError::KeyImport)?
            }
            KeyFormat::Der => {
                return Err(ProviderError::KeyImport(
                    "DER-encoded Ed25519 keys are not supported".to_string(),
                ))
            }
        };
        let seed: [u8; 32] = seed
            .as_slice()
            .try_into()
            .map_err(|_| ProviderError::KeyImport("invalid Ed25519 seed length".to_string()))?;
        Ok(Ed25519Key {
            signing: SigningKey::from_bytes(&seed),
        })
    }
}

#[async_trait]
impl SignatureAlgorithm for SoftwareEd25519 {
    async fn sign(&self, key: &Ed25519Key, message: &[u8]) -> ProviderResult<Vec<u8>> {
        Ok(key.signing.sign(message).to_bytes().to_vec())
    }

    async fn verify(
        &self,
        key: &Ed25519Key,
        message: &[u8],
        signature: &[u8],
    ) -> ProviderResult<()> {
        let signature: [u8; 64] = signature
            .try_into()
            .map_err(|_| ProviderError::Verification("invalid signature length".to_string()))?;
        key.signing
            .verifying_key()
            .verify(message, &Signature::from_bytes(&signature))
            .map_err(|e| ProviderError::Verification(e.to_string()))
    }
}
