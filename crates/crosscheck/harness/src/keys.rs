//! Key registry: generation-time persistence of key material and
//! validation-time reconstruction.

use crate::scope::CompatibilityScope;
use crate::{CompatError, CompatResult};
use crosscheck_provider::KeyAlgorithm;
use crosscheck_types::KeyReference;
use std::collections::{HashMap, HashSet};

const KEYS_PER_PARAMS: usize = 2;
const STRESS_KEYS_PER_PARAMS: usize = 5;

/// One freshly generated key and the reference its encodings were stored
/// under.
pub struct GeneratedKey<K> {
    pub reference: KeyReference,
    pub key: K,
}

/// Keys reconstructed during validation, grouped per reference.
///
/// A reference whose encodings all failed to decode is recorded, not
/// fatal: lookups for it yield `Ok(None)` so the caller can skip its
/// records while every other reference still gets verified.
pub struct KeyPool<K> {
    reconstructed: HashMap<KeyReference, Vec<K>>,
    failed: HashSet<KeyReference>,
}

impl<K> KeyPool<K> {
    /// Every reconstructed variant of the referenced key.
    ///
    /// A reference this scope never registered is fatal — it means the
    /// store handed back a record from a foreign keyspace.
    pub fn keys_for(&self, reference: KeyReference) -> CompatResult<Option<&[K]>> {
        if let Some(keys) = self.reconstructed.get(&reference) {
            Ok(Some(keys))
        } else if self.failed.contains(&reference) {
            Ok(None)
        } else {
            Err(CompatError::UnknownKeyReference { reference })
        }
    }

    pub fn reconstructed_references(&self) -> usize {
        self.reconstructed.len()
    }

    pub fn failed_references(&self) -> usize {
        self.failed.len()
    }
}

impl<A: KeyAlgorithm> CompatibilityScope<A> {
    /// Generates keys for every key-parameter variant, persisting each key's
    /// descriptor under a fresh reference and every exported encoding under
    /// that reference. Returns the live keys so the test body runs once per
    /// key.
    ///
    /// Stress mode generates more keys per variant and may cover more
    /// variants; the identifier scheme is unchanged.
    pub async fn generate_keys(&self, stress: bool) -> CompatResult<Vec<GeneratedKey<A::Key>>> {
        let per_params = if stress {
            STRESS_KEYS_PER_PARAMS
        } else {
            KEYS_PER_PARAMS
        };
        let store = self.key_store();
        let mut generated = Vec::new();
        for params in self.algorithm().key_params(stress) {
            for _ in 0..per_params {
                let key = self.algorithm().generate_key(&params).await?;
                let reference = store.save_key(&params).await?;
                let encodings = self.algorithm().export_key(&key).await?;
                for encoding in &encodings {
                    store.save_encoding(reference, encoding).await?;
                }
                tracing::debug!(%reference, encodings = encodings.len(), "generated key");
                generated.push(GeneratedKey { reference, key });
            }
        }
        Ok(generated)
    }

    /// Reconstructs every stored key from every stored encoding.
    ///
    /// An encoding that fails to decode is skipped when a sibling encoding
    /// of the same reference succeeds. Only the degenerate outcome — keys
    /// were registered and not one reconstructs — fails the validation run.
    pub async fn validate_keys(&self) -> CompatResult<KeyPool<A::Key>> {
        let store = self.key_store();
        let registered = store.keys::<A::KeyParams>().await?;
        let total = registered.len();

        let mut reconstructed = HashMap::new();
        let mut failed = HashSet::new();
        for (reference, _params) in registered {
            let mut variants = Vec::new();
            for encoding in store.encodings(reference).await? {
                match self.algorithm().import_key(&encoding).await {
                    Ok(key) => variants.push(key),
                    Err(err) => tracing::warn!(
                        %reference,
                        format = %encoding.format,
                        error = %err,
                        "stored key encoding did not reconstruct"
                    ),
                }
            }
            if variants.is_empty() {
                failed.insert(reference);
            } else {
                reconstructed.insert(reference, variants);
            }
        }

        if total > 0 && reconstructed.is_empty() {
            return Err(CompatError::KeyReconstruction {
                references: failed.len(),
            });
        }
        tracing::debug!(
            reconstructed = reconstructed.len(),
            failed = failed.len(),
            "validated stored keys"
        );
        Ok(KeyPool {
            reconstructed,
            failed,
        })
    }
}
