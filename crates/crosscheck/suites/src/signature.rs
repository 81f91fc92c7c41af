//! Signature compatibility suite.

use async_trait::async_trait;
use crosscheck_harness::{
    CompatResult, CompatibilityScope, CompatibilitySuite, GeneratedKey,
};
use crosscheck_provider::SignatureAlgorithm;
use crosscheck_types::{EmptyParameters, KeyReference, TestData};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

const DEFAULT_MAX_MESSAGE_SIZE: usize = 10000;

/// One stored signature test vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignatureData {
    pub key_reference: KeyReference,
    #[serde(with = "crosscheck_types::b64::standard")]
    pub message: Vec<u8>,
    #[serde(with = "crosscheck_types::b64::standard")]
    pub signature: Vec<u8>,
}

impl TestData for SignatureData {
    const TAG: &'static str = "signature.data";
}

/// Compatibility suite for any signature algorithm.
///
/// Validation verifies every stored signature with every reconstructed key
/// variant, then signs the stored message afresh and verifies the new
/// signature too, so both directions of the operation are covered.
pub struct SignatureCompatibility<A> {
    max_message_size: usize,
    _algorithm: PhantomData<fn() -> A>,
}

impl<A> SignatureCompatibility<A> {
    pub fn new() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            _algorithm: PhantomData,
        }
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    fn iterations(stress: bool) -> usize {
        if stress {
            10
        } else {
            5
        }
    }
}

impl<A> Default for SignatureCompatibility<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: SignatureAlgorithm> CompatibilitySuite for SignatureCompatibility<A> {
    type Algorithm = A;

    async fn generate(&self, scope: &CompatibilityScope<A>, stress: bool) -> CompatResult<()> {
        let iterations = Self::iterations(stress);
        let signatures = scope.signatures();
        let parameters_id = signatures.save_parameters(&EmptyParameters).await?;

        for GeneratedKey { reference, key } in scope.generate_keys(stress).await? {
            for _ in 0..iterations {
                let message = scope.random_bytes(scope.random_size(self.max_message_size));
                let signature = scope.algorithm().sign(&key, &message).await?;
                scope.algorithm().verify(&key, &message, &signature).await?;
                signatures
                    .save_data(
                        parameters_id,
                        &SignatureData {
                            key_reference: reference,
                            message,
                            signature,
                        },
                    )
                    .await?;
            }
        }
        Ok(())
    }

    async fn validate(&self, scope: &CompatibilityScope<A>) -> CompatResult<()> {
        let keys = scope.validate_keys().await?;
        let signatures = scope.signatures();

        for (parameters_id, EmptyParameters) in
            signatures.parameters::<EmptyParameters>().await?
        {
            for record in signatures.data::<SignatureData>(parameters_id).await? {
                let Some(variants) = keys.keys_for(record.key_reference)? else {
                    continue;
                };
                for key in variants {
                    scope
                        .algorithm()
                        .verify(key, &record.message, &record.signature)
                        .await?;

                    let fresh = scope.algorithm().sign(key, &record.message).await?;
                    scope
                        .algorithm()
                        .verify(key, &record.message, &fresh)
                        .await?;
                }
            }
        }
        Ok(())
    }
}
