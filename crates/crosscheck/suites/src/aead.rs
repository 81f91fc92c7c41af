//! AEAD compatibility suite.

use async_trait::async_trait;
use crosscheck_harness::{
    CompatError, CompatResult, CompatibilityScope, CompatibilitySuite, GeneratedKey,
};
use crosscheck_provider::AeadAlgorithm;
use crosscheck_types::{KeyReference, TestData, TestParameters};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

const DEFAULT_MAX_PLAINTEXT_SIZE: usize = 10000;
const DEFAULT_MAX_ASSOCIATED_DATA_SIZE: usize = 10000;

/// One stored cipher parameter combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParameters {
    pub tag_size_bits: u32,
}

impl TestParameters for CipherParameters {
    const TAG: &'static str = "aead.cipher-parameters";
}

/// One stored AEAD test vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedCipherData {
    pub key_reference: KeyReference,
    #[serde(with = "crosscheck_types::b64::optional")]
    pub associated_data: Option<Vec<u8>>,
    #[serde(with = "crosscheck_types::b64::standard")]
    pub plaintext: Vec<u8>,
    #[serde(with = "crosscheck_types::b64::standard")]
    pub ciphertext: Vec<u8>,
}

impl TestData for AuthenticatedCipherData {
    const TAG: &'static str = "aead.authenticated-cipher-data";
}

/// Compatibility suite for any AEAD algorithm.
///
/// Generation covers every configured tag size for every generated key,
/// mixing runs with and without associated data and drawing payload sizes
/// from the scope's seeded randomness. Validation decrypts every stored
/// ciphertext with every reconstructed key variant and additionally checks
/// a fresh encrypt-decrypt round trip of the stored plaintext.
pub struct AeadCompatibility<A> {
    tag_sizes: Vec<u32>,
    max_plaintext_size: usize,
    max_associated_data_size: usize,
    _algorithm: PhantomData<fn() -> A>,
}

impl<A> AeadCompatibility<A> {
    pub fn new() -> Self {
        Self {
            tag_sizes: vec![96, 128],
            max_plaintext_size: DEFAULT_MAX_PLAINTEXT_SIZE,
            max_associated_data_size: DEFAULT_MAX_ASSOCIATED_DATA_SIZE,
            _algorithm: PhantomData,
        }
    }

    pub fn with_tag_sizes(mut self, tag_sizes: Vec<u32>) -> Self {
        self.tag_sizes = tag_sizes;
        self
    }

    pub fn with_max_plaintext_size(mut self, size: usize) -> Self {
        self.max_plaintext_size = size;
        self
    }

    pub fn with_max_associated_data_size(mut self, size: usize) -> Self {
        self.max_associated_data_size = size;
        self
    }

    fn iterations(stress: bool) -> (usize, usize) {
        if stress {
            (10, 10)
        } else {
            (5, 5)
        }
    }
}

impl<A> Default for AeadCompatibility<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: AeadAlgorithm> CompatibilitySuite for AeadCompatibility<A> {
    type Algorithm = A;

    async fn generate(&self, scope: &CompatibilityScope<A>, stress: bool) -> CompatResult<()> {
        let (ad_iterations, cipher_iterations) = Self::iterations(stress);
        let ciphers = scope.ciphers();

        let mut parameter_sets = Vec::with_capacity(self.tag_sizes.len());
        for &tag_size_bits in &self.tag_sizes {
            let id = ciphers
                .save_parameters(&CipherParameters { tag_size_bits })
                .await?;
            parameter_sets.push((id, tag_size_bits));
        }

        for GeneratedKey { reference, key } in scope.generate_keys(stress).await? {
            for &(parameters_id, tag_size_bits) in &parameter_sets {
                tracing::debug!(%reference, tag_size_bits, "generating cipher vectors");
                for ad_index in 0..ad_iterations {
                    // The first iteration always covers the no-AD case.
                    let associated_data = if ad_index == 0 {
                        None
                    } else {
                        let size = scope.random_size(self.max_associated_data_size);
                        Some(scope.random_bytes(size))
                    };
                    for _ in 0..cipher_iterations {
                        let plaintext =
                            scope.random_bytes(scope.random_size(self.max_plaintext_size));
                        let ciphertext = scope
                            .algorithm()
                            .encrypt(&key, tag_size_bits, &plaintext, associated_data.as_deref())
                            .await?;
                        let decrypted = scope
                            .algorithm()
                            .decrypt(&key, tag_size_bits, &ciphertext, associated_data.as_deref())
                            .await?;
                        if decrypted != plaintext {
                            return Err(CompatError::content_mismatch(format!(
                                "initial decrypt under {reference} with a {tag_size_bits}-bit tag"
                            )));
                        }
                        ciphers
                            .save_data(
                                parameters_id,
                                &AuthenticatedCipherData {
                                    key_reference: reference,
                                    associated_data: associated_data.clone(),
                                    plaintext,
                                    ciphertext,
                                },
                            )
                            .await?;
                    }
                }
            }
        }
        Ok(())
    }

    async fn validate(&self, scope: &CompatibilityScope<A>) -> CompatResult<()> {
        let keys = scope.validate_keys().await?;
        let ciphers = scope.ciphers();

        for (parameters_id, parameters) in ciphers.parameters::<CipherParameters>().await? {
            let tag_size_bits = parameters.tag_size_bits;
            for record in ciphers
                .data::<AuthenticatedCipherData>(parameters_id)
                .await?
            {
                let Some(variants) = keys.keys_for(record.key_reference)? else {
                    continue;
                };
                for key in variants {
                    let decrypted = scope
                        .algorithm()
                        .decrypt(
                            key,
                            tag_size_bits,
                            &record.ciphertext,
                            record.associated_data.as_deref(),
                        )
                        .await?;
                    if decrypted != record.plaintext {
                        return Err(CompatError::content_mismatch(format!(
                            "decrypt of stored ciphertext ({parameters_id}, {})",
                            record.key_reference
                        )));
                    }

                    let resealed = scope
                        .algorithm()
                        .encrypt(
                            key,
                            tag_size_bits,
                            &record.plaintext,
                            record.associated_data.as_deref(),
                        )
                        .await?;
                    let reopened = scope
                        .algorithm()
                        .decrypt(
                            key,
                            tag_size_bits,
                            &resealed,
                            record.associated_data.as_deref(),
                        )
                        .await?;
                    if reopened != record.plaintext {
                        return Err(CompatError::content_mismatch(format!(
                            "fresh encrypt-decrypt ({parameters_id}, {})",
                            record.key_reference
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
