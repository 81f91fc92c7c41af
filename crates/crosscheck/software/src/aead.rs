//! AES-GCM over the RustCrypto `aes-gcm` crate.
//!
//! Ciphertexts are self-contained: a fresh 12-byte nonce is drawn per
//! encryption and prepended, so a vector stored today decrypts in any
//! later process without side state.

use crate::jwk;
use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::aes::{Aes128, Aes192, Aes256};
use aes_gcm::{AesGcm, KeyInit};
use async_trait::async_trait;
use crosscheck_provider::{AeadAlgorithm, KeyAlgorithm, ProviderError, ProviderResult};
use crosscheck_types::{KeyEncoding, KeyFormat, TestParameters};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

const NONCE_SIZE: usize = 12;

type Aes128GcmTag96 = AesGcm<Aes128, U12, U12>;
type Aes128GcmTag128 = AesGcm<Aes128, U12, U16>;
type Aes192GcmTag96 = AesGcm<Aes192, U12, U12>;
type Aes192GcmTag128 = AesGcm<Aes192, U12, U16>;
type Aes256GcmTag96 = AesGcm<Aes256, U12, U12>;
type Aes256GcmTag128 = AesGcm<Aes256, U12, U16>;

/// Parameters an AES key is generated under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AesKeyParams {
    pub key_size_bits: u32,
}

impl TestParameters for AesKeyParams {
    const TAG: &'static str = "aes.key-parameters";
}

/// AES key material. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AesGcmKey {
    bytes: Vec<u8>,
}

/// Software AES-GCM implementation.
///
/// Supports 128/192/256-bit keys and 96/128-bit tags.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareAesGcm;

impl SoftwareAesGcm {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KeyAlgorithm for SoftwareAesGcm {
    type Key = AesGcmKey;
    type KeyParams = AesKeyParams;

    fn algorithm(&self) -> &str {
        "AES-GCM"
    }

    fn provider(&self) -> &str {
        "software"
    }

    fn key_params(&self, stress: bool) -> Vec<AesKeyParams> {
        let sizes: &[u32] = if stress {
            &[128, 192, 256]
        } else {
            &[128, 256]
        };
        sizes
            .iter()
            .map(|&key_size_bits| AesKeyParams { key_size_bits })
            .collect()
    }

    async fn generate_key(&self, params: &AesKeyParams) -> ProviderResult<AesGcmKey> {
        let len = match params.key_size_bits {
            128 => 16,
            192 => 24,
            256 => 32,
            bits => {
                return Err(ProviderError::UnsupportedParameter(format!(
                    "AES key size {bits} bits"
                )))
            }
        };
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Ok(AesGcmKey { bytes })
    }

    async fn export_key(&self, key: &AesGcmKey) -> ProviderResult<Vec<KeyEncoding>> {
        let document =
            jwk::oct_jwk(&key.bytes).map_err(ProviderError::KeyExport)?;
        Ok(vec![
            KeyEncoding::new(KeyFormat::Raw, key.bytes.clone()),
            KeyEncoding::new(KeyFormat::Jwk, document),
        ])
    }

    async fn import_key(&self, encoding: &KeyEncoding) -> ProviderResult<AesGcmKey> {
        let bytes = match encoding.format {
            KeyFormat::Raw => encoding.bytes.clone(),
            KeyFormat::Jwk => {
                jwk::parse_oct_jwk(&encoding.bytes).map_err(ProviderError::KeyImport)?
            }
            KeyFormat::Der => {
                return Err(ProviderError::KeyImport(
                    "DER-encoded AES keys are not supported".to_string(),
                ))
            }
        };
        if !matches!(bytes.len(), 16 | 24 | 32) {
            return Err(ProviderError::KeyImport(format!(
                "invalid AES key length {}",
                bytes.len()
            )));
        }
        Ok(AesGcmKey { bytes })
    }
}

#[async_trait]
impl AeadAlgorithm for SoftwareAesGcm {
    async fn encrypt(
        &self,
        key: &AesGcmKey,
        tag_size_bits: u32,
        plaintext: &[u8],
        associated_data: Option<&[u8]>,
    ) -> ProviderResult<Vec<u8>> {
        match (key.bytes.len(), tag_size_bits) {
            (16, 96) => seal::<Aes128GcmTag96>(&key.bytes, plaintext, associated_data),
            (16, 128) => seal::<Aes128GcmTag128>(&key.bytes, plaintext, associated_data),
            (24, 96) => seal::<Aes192GcmTag96>(&key.bytes, plaintext, associated_data),
            (24, 128) => seal::<Aes192GcmTag128>(&key.bytes, plaintext, associated_data),
            (32, 96) => seal::<Aes256GcmTag96>(&key.bytes, plaintext, associated_data),
            (32, 128) => seal::<Aes256GcmTag128>(&key.bytes, plaintext, associated_data),
            (_, bits) => Err(ProviderError::UnsupportedParameter(format!(
                "tag size {bits} bits"
            ))),
        }
    }

    async fn decrypt(
        &self,
        key: &AesGcmKey,
        tag_size_bits: u32,
        ciphertext: &[u8],
        associated_data: Option<&[u8]>,
    ) -> ProviderResult<Vec<u8>> {
        match (key.bytes.len(), tag_size_bits) {
            (16, 96) => open::<Aes128GcmTag96>(&key.bytes, ciphertext, associated_data),
            (16, 128) => open::<Aes128GcmTag128>(&key.bytes, ciphertext, associated_data),
            (24, 96) => open::<Aes192GcmTag96>(&key.bytes, ciphertext, associated_data),
            (24, 128) => open::<Aes192GcmTag128>(&key.bytes, ciphertext, associated_data),
            (32, 96) => open::<Aes256GcmTag96>(&key.bytes, ciphertext, associated_data),
            (32, 128) => open::<Aes256GcmTag128>(&key.bytes, ciphertext, associated_data),
            (_, bits) => Err(ProviderError::UnsupportedParameter(format!(
                "tag size {bits} bits"
            ))),
        }
    }
}

fn seal<C: KeyInit + Aead>(
    key: &[u8],
    plaintext: &[u8],
    associated_data: Option<&[u8]>,
) -> ProviderResult<Vec<u8>> {
    let cipher =
        C::new_from_slice(key).map_err(|e| ProviderError::Encryption(e.to_string()))?;
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    let sealed = cipher
        .encrypt(
            GenericArray::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: associated_data.unwrap_or_default(),
            },
        )
        .map_err(|_| ProviderError::Encryption("AEAD sealing failed".to_string()))?;
    let mut out = nonce.to_vec();
    out.extend_from_slice(&sealed);
    Ok(out)
}

fn open<C: KeyInit + Aead>(
    key: &[u8],
    ciphertext: &[u8],
    associated_data: Option<&[u8]>,
) -> ProviderResult<Vec<u8>> {
    if ciphertext.len() < NONCE_SIZE {
        return Err(ProviderError::Decryption(
            "ciphertext shorter than the nonce".to_string(),
        ));
    }
    let (nonce, body) = ciphertext.split_at(NONCE_SIZE);
    let cipher =
        C::new_from_slice(key).map_err(|e| ProviderError::Decryption(e.to_string()))?;
    cipher
        .decrypt(
            GenericArray::from_slice(nonce),
            Payload {
                msg: body,
                aad: associated_data.unwrap_or_default(),
            },
        )
        .map_err(|_| ProviderError::Decryption("AEAD opening failed".to_string()))
}
