//! Ephemeral in-process backend.
//!
//! Holds everything in one locked map and exists for exactly one
//! generate-then-validate invocation; dropping the backend discards all
//! state. Unlike the persistent backend it validates parent identifiers
//! locally, since there is no remote side to do it.

use crate::traits::CompatibilityBackend;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use crosscheck_types::{KeyReference, OperationScope, ParametersId, SerializedRecord};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store backend.
#[derive(Default)]
pub struct MemoryBackend {
    // One lock over the whole state: id assignment and record insert must
    // be observed atomically together.
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    parameters: HashMap<(String, OperationScope), Vec<SerializedRecord>>,
    data: HashMap<(String, OperationScope, ParametersId), Vec<SerializedRecord>>,
    keys: HashMap<String, Vec<SerializedRecord>>,
    key_encodings: HashMap<(String, KeyReference), Vec<SerializedRecord>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompatibilityBackend for MemoryBackend {
    async fn put_parameters(
        &self,
        algorithm: &str,
        scope: OperationScope,
        record: SerializedRecord,
    ) -> StoreResult<ParametersId> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Write("memory state lock poisoned".to_string()))?;
        let records = state
            .parameters
            .entry((algorithm.to_string(), scope))
            .or_default();
        records.push(record);
        Ok(ParametersId::new(records.len() as u64))
    }

    async fn get_all_parameters(
        &self,
        algorithm: &str,
        scope: OperationScope,
    ) -> StoreResult<Vec<(ParametersId, SerializedRecord)>> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Read("memory state lock poisoned".to_string()))?;
        Ok(state
            .parameters
            .get(&(algorithm.to_string(), scope))
            .map(|records| {
                records
                    .iter()
                    .enumerate()
                    .map(|(index, record)| {
                        (ParametersId::new(index as u64 + 1), record.clone())
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put_data(
        &self,
        algorithm: &str,
        scope: OperationScope,
        parameters_id: ParametersId,
        record: SerializedRecord,
    ) -> StoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Write("memory state lock poisoned".to_string()))?;
        let assigned = state
            .parameters
            .get(&(algorithm.to_string(), scope))
            .map(|records| records.len() as u64)
            .unwrap_or(0);
        if parameters_id.raw() == 0 || parameters_id.raw() > assigned {
            return Err(StoreError::UnknownParametersId {
                algorithm: algorithm.to_string(),
                scope: scope.to_string(),
                id: parameters_id,
            });
        }
        state
            .data
            .entry((algorithm.to_string(), scope, parameters_id))
            .or_default()
            .push(record);
        Ok(())
    }

    async fn get_all_data(
        &self,
        algorithm: &str,
        scope: OperationScope,
        parameters_id: ParametersId,
    ) -> StoreResult<Vec<SerializedRecord>> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Read("memory state lock poisoned".to_string()))?;
        let assigned = state
            .parameters
            .get(&(algorithm.to_string(), scope))
            .map(|records| records.len() as u64)
            .unwrap_or(0);
        if parameters_id.raw() == 0 || parameters_id.raw() > assigned {
            return Err(StoreError::UnknownParametersId {
                algorithm: algorithm.to_string(),
                scope: scope.to_string(),
                id: parameters_id,
            });
        }
        Ok(state
            .data
            .get(&(algorithm.to_string(), scope, parameters_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn put_key(
        &self,
        algorithm: &str,
        descriptor: SerializedRecord,
    ) -> StoreResult<KeyReference> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Write("memory state lock poisoned".to_string()))?;
        let keys = state.keys.entry(algorithm.to_string()).or_default();
        keys.push(descriptor);
        Ok(KeyReference::new(keys.len() as u64))
    }

    async fn get_all_keys(
        &self,
        algorithm: &str,
    ) -> StoreResult<Vec<(KeyReference, SerializedRecord)>> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Read("memory state lock poisoned".to_string()))?;
        Ok(state
            .keys
            .get(algorithm)
            .map(|descriptors| {
                descriptors
                    .iter()
                    .enumerate()
                    .map(|(index, descriptor)| {
                        (KeyReference::new(index as u64 + 1), descriptor.clone())
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn put_key_encoding(
        &self,
        algorithm: &str,
        reference: KeyReference,
        record: SerializedRecord,
    ) -> StoreResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Write("memory state lock poisoned".to_string()))?;
        let registered = state
            .keys
            .get(algorithm)
            .map(|keys| keys.len() as u64)
            .unwrap_or(0);
        if reference.raw() == 0 || reference.raw() > registered {
            return Err(StoreError::UnknownKeyReference {
                algorithm: algorithm.to_string(),
                reference,
            });
        }
        state
            .key_encodings
            .entry((algorithm.to_string(), reference))
            .or_default()
            .push(record);
        Ok(())
    }

    async fn get_all_key_encodings(
        &self,
        algorithm: &str,
        reference: KeyReference,
    ) -> StoreResult<Vec<SerializedRecord>> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Read("memory state lock poisoned".to_string()))?;
        let registered = state
            .keys
            .get(algorithm)
            .map(|keys| keys.len() as u64)
            .unwrap_or(0);
        if reference.raw() == 0 || reference.raw() > registered {
            return Err(StoreError::UnknownKeyReference {
                algorithm: algorithm.to_string(),
                reference,
            });
        }
        Ok(state
            .key_encodings
            .get(&(algorithm.to_string(), reference))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u32) -> SerializedRecord {
        SerializedRecord::encode("test.record", &n).unwrap()
    }

    #[tokio::test]
    async fn parameter_ids_are_monotonic_per_scope() {
        let backend = MemoryBackend::new();
        let first = backend
            .put_parameters("AES-GCM", OperationScope::Ciphers, record(1))
            .await
            .unwrap();
        let second = backend
            .put_parameters("AES-GCM", OperationScope::Ciphers, record(2))
            .await
            .unwrap();
        assert!(second > first);

        // An unrelated scope numbers independently from one.
        let other = backend
            .put_parameters("AES-GCM", OperationScope::Signatures, record(3))
            .await
            .unwrap();
        assert_eq!(other, first);
    }

    #[tokio::test]
    async fn algorithms_do_not_share_keyspaces() {
        let backend = MemoryBackend::new();
        let id = backend
            .put_parameters("AES-GCM", OperationScope::Ciphers, record(1))
            .await
            .unwrap();

        let err = backend
            .put_data("ChaCha20-Poly1305", OperationScope::Ciphers, id, record(2))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownParametersId { .. }));
    }

    #[tokio::test]
    async fn data_rejects_unassigned_parameters_id() {
        let backend = MemoryBackend::new();
        let err = backend
            .put_data(
                "AES-GCM",
                OperationScope::Ciphers,
                ParametersId::new(1),
                record(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownParametersId { .. }));
    }

    #[tokio::test]
    async fn data_preserves_insertion_order() {
        let backend = MemoryBackend::new();
        let id = backend
            .put_parameters("AES-GCM", OperationScope::Ciphers, record(0))
            .await
            .unwrap();
        for n in 1..=5 {
            backend
                .put_data("AES-GCM", OperationScope::Ciphers, id, record(n))
                .await
                .unwrap();
        }

        let stored = backend
            .get_all_data("AES-GCM", OperationScope::Ciphers, id)
            .await
            .unwrap();
        let values: Vec<u32> = stored
            .iter()
            .map(|r| r.decode("test.record").unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn key_encodings_group_under_one_reference() {
        let backend = MemoryBackend::new();
        let reference = backend.put_key("Ed25519", record(0)).await.unwrap();
        backend
            .put_key_encoding("Ed25519", reference, record(1))
            .await
            .unwrap();
        backend
            .put_key_encoding("Ed25519", reference, record(2))
            .await
            .unwrap();

        let encodings = backend
            .get_all_key_encodings("Ed25519", reference)
            .await
            .unwrap();
        assert_eq!(encodings.len(), 2);
    }

    #[tokio::test]
    async fn key_encoding_rejects_unregistered_reference() {
        let backend = MemoryBackend::new();
        let err = backend
            .put_key_encoding("Ed25519", KeyReference::new(9), record(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownKeyReference { .. }));
    }
}
