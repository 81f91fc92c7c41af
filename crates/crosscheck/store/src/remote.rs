//! Persistent backend routed through an abstract transport.
//!
//! The transport owns delivery mechanics and identifier allocation; the
//! backend owns envelope framing. Generation and validation runs using the
//! same transport endpoint see one shared, append-only keyspace per
//! algorithm name, which is exactly what cross-run compatibility needs.

use crate::traits::CompatibilityBackend;
use crate::StoreResult;
use async_trait::async_trait;
use crosscheck_types::{KeyReference, OperationScope, ParametersId, SerializedRecord};
use std::sync::Arc;

/// Bytes-level transport of the persistent store.
///
/// Implementations must assign ids atomically: concurrent writers to the
/// same (algorithm, scope) keyspace must never receive the same id. That
/// guarantee belongs here, on the remote side, not in the harness core.
#[async_trait]
pub trait StoreTransport: Send + Sync {
    async fn put_parameters(
        &self,
        algorithm: &str,
        scope: &str,
        record: Vec<u8>,
    ) -> StoreResult<u64>;

    async fn get_all_parameters(
        &self,
        algorithm: &str,
        scope: &str,
    ) -> StoreResult<Vec<(u64, Vec<u8>)>>;

    async fn put_data(
        &self,
        algorithm: &str,
        scope: &str,
        parameters_id: u64,
        record: Vec<u8>,
    ) -> StoreResult<()>;

    async fn get_all_data(
        &self,
        algorithm: &str,
        scope: &str,
        parameters_id: u64,
    ) -> StoreResult<Vec<Vec<u8>>>;

    async fn put_key(&self, algorithm: &str, descriptor: Vec<u8>) -> StoreResult<u64>;

    async fn get_all_keys(&self, algorithm: &str) -> StoreResult<Vec<(u64, Vec<u8>)>>;

    async fn put_key_encoding(
        &self,
        algorithm: &str,
        reference: u64,
        record: Vec<u8>,
    ) -> StoreResult<()>;

    async fn get_all_key_encodings(
        &self,
        algorithm: &str,
        reference: u64,
    ) -> StoreResult<Vec<Vec<u8>>>;
}

/// Persistent store backend.
///
/// Trusts the remote side for id assignment and parent validation; a data
/// record written under an id this process never saw is legitimate, because
/// the id may have been assigned by an unrelated generate run.
pub struct RemoteBackend {
    transport: Arc<dyn StoreTransport>,
}

impl RemoteBackend {
    pub fn new(transport: Arc<dyn StoreTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CompatibilityBackend for RemoteBackend {
    async fn put_parameters(
        &self,
        algorithm: &str,
        scope: OperationScope,
        record: SerializedRecord,
    ) -> StoreResult<ParametersId> {
        let raw = self
            .transport
            .put_parameters(algorithm, scope.as_str(), record.to_bytes()?)
            .await?;
        tracing::debug!(algorithm, %scope, id = raw, "stored parameters");
        Ok(ParametersId::new(raw))
    }

    async fn get_all_parameters(
        &self,
        algorithm: &str,
        scope: OperationScope,
    ) -> StoreResult<Vec<(ParametersId, SerializedRecord)>> {
        let rows = self
            .transport
            .get_all_parameters(algorithm, scope.as_str())
            .await?;
        rows.into_iter()
            .map(|(raw, bytes)| {
                Ok((
                    ParametersId::new(raw),
                    SerializedRecord::from_bytes(&bytes)?,
                ))
            })
            .collect()
    }

    async fn put_data(
        &self,
        algorithm: &str,
        scope: OperationScope,
        parameters_id: ParametersId,
        record: SerializedRecord,
    ) -> StoreResult<()> {
        self.transport
            .put_data(
                algorithm,
                scope.as_str(),
                parameters_id.raw(),
                record.to_bytes()?,
            )
            .await
    }

    async fn get_all_data(
        &self,
        algorithm: &str,
        scope: OperationScope,
        parameters_id: ParametersId,
    ) -> StoreResult<Vec<SerializedRecord>> {
        let rows = self
            .transport
            .get_all_data(algorithm, scope.as_str(), parameters_id.raw())
            .await?;
        rows.iter()
            .map(|bytes| Ok(SerializedRecord::from_bytes(bytes)?))
            .collect()
    }

    async fn put_key(
        &self,
        algorithm: &str,
        descriptor: SerializedRecord,
    ) -> StoreResult<KeyReference> {
        let raw = self
            .transport
            .put_key(algorithm, descriptor.to_bytes()?)
            .await?;
        tracing::debug!(algorithm, reference = raw, "registered key");
        Ok(KeyReference::new(raw))
    }

    async fn get_all_keys(
        &self,
        algorithm: &str,
    ) -> StoreResult<Vec<(KeyReference, SerializedRecord)>> {
        let rows = self.transport.get_all_keys(algorithm).await?;
        rows.into_iter()
            .map(|(raw, bytes)| {
                Ok((KeyReference::new(raw), SerializedRecord::from_bytes(&bytes)?))
            })
            .collect()
    }

    async fn put_key_encoding(
        &self,
        algorithm: &str,
        reference: KeyReference,
        record: SerializedRecord,
    ) -> StoreResult<()> {
        self.transport
            .put_key_encoding(algorithm, reference.raw(), record.to_bytes()?)
            .await
    }

    async fn get_all_key_encodings(
        &self,
        algorithm: &str,
        reference: KeyReference,
    ) -> StoreResult<Vec<SerializedRecord>> {
        let rows = self
            .transport
            .get_all_key_encodings(algorithm, reference.raw())
            .await?;
        rows.iter()
            .map(|bytes| Ok(SerializedRecord::from_bytes(bytes)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Deterministic in-process transport used for tests.
    #[derive(Default)]
    struct LoopbackTransport {
        state: Mutex<LoopbackState>,
        fail_writes: bool,
    }

    #[derive(Default)]
    struct LoopbackState {
        parameters: HashMap<(String, String), Vec<Vec<u8>>>,
        data: HashMap<(String, String, u64), Vec<Vec<u8>>>,
        keys: HashMap<String, Vec<Vec<u8>>>,
        encodings: HashMap<(String, u64), Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl StoreTransport for LoopbackTransport {
        async fn put_parameters(
            &self,
            algorithm: &str,
            scope: &str,
            record: Vec<u8>,
        ) -> StoreResult<u64> {
            if self.fail_writes {
                return Err(StoreError::Write("loopback write refused".to_string()));
            }
            let mut state = self.state.lock().unwrap();
            let rows = state
                .parameters
                .entry((algorithm.to_string(), scope.to_string()))
                .or_default();
            rows.push(record);
            Ok(rows.len() as u64)
        }

        async fn get_all_parameters(
            &self,
            algorithm: &str,
            scope: &str,
        ) -> StoreResult<Vec<(u64, Vec<u8>)>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .parameters
                .get(&(algorithm.to_string(), scope.to_string()))
                .map(|rows| {
                    rows.iter()
                        .enumerate()
                        .map(|(i, r)| (i as u64 + 1, r.clone()))
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn put_data(
            &self,
            algorithm: &str,
            scope: &str,
            parameters_id: u64,
            record: Vec<u8>,
        ) -> StoreResult<()> {
            let mut state = self.state.lock().unwrap();
            state
                .data
                .entry((algorithm.to_string(), scope.to_string(), parameters_id))
                .or_default()
                .push(record);
            Ok(())
        }

        async fn get_all_data(
            &self,
            algorithm: &str,
            scope: &str,
            parameters_id: u64,
        ) -> StoreResult<Vec<Vec<u8>>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .data
                .get(&(algorithm.to_string(), scope.to_string(), parameters_id))
                .cloned()
                .unwrap_or_default())
        }

        async fn put_key(&self, algorithm: &str, descriptor: Vec<u8>) -> StoreResult<u64> {
            let mut state = self.state.lock().unwrap();
            let rows = state.keys.entry(algorithm.to_string()).or_default();
            rows.push(descriptor);
            Ok(rows.len() as u64)
        }

        async fn get_all_keys(&self, algorithm: &str) -> StoreResult<Vec<(u64, Vec<u8>)>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .keys
                .get(algorithm)
                .map(|rows| {
                    rows.iter()
                        .enumerate()
                        .map(|(i, r)| (i as u64 + 1, r.clone()))
                        .collect()
                })
                .unwrap_or_default())
        }

        async fn put_key_encoding(
            &self,
            algorithm: &str,
            reference: u64,
            record: Vec<u8>,
        ) -> StoreResult<()> {
            let mut state = self.state.lock().unwrap();
            state
                .encodings
                .entry((algorithm.to_string(), reference))
                .or_default()
                .push(record);
            Ok(())
        }

        async fn get_all_key_encodings(
            &self,
            algorithm: &str,
            reference: u64,
        ) -> StoreResult<Vec<Vec<u8>>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .encodings
                .get(&(algorithm.to_string(), reference))
                .cloned()
                .unwrap_or_default())
        }
    }

    fn record(n: u32) -> SerializedRecord {
        SerializedRecord::encode("test.record", &n).unwrap()
    }

    #[tokio::test]
    async fn round_trips_envelopes_through_the_wire_form() {
        let backend = RemoteBackend::new(Arc::new(LoopbackTransport::default()));
        let id = backend
            .put_parameters("AES-GCM", OperationScope::Ciphers, record(42))
            .await
            .unwrap();
        backend
            .put_data("AES-GCM", OperationScope::Ciphers, id, record(7))
            .await
            .unwrap();

        let params = backend
            .get_all_parameters("AES-GCM", OperationScope::Ciphers)
            .await
            .unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].0, id);
        assert_eq!(params[0].1.decode::<u32>("test.record").unwrap(), 42);

        let data = backend
            .get_all_data("AES-GCM", OperationScope::Ciphers, id)
            .await
            .unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].decode::<u32>("test.record").unwrap(), 7);
    }

    #[tokio::test]
    async fn delegates_id_assignment_to_the_transport() {
        let backend = RemoteBackend::new(Arc::new(LoopbackTransport::default()));
        let first = backend
            .put_key("Ed25519", record(0))
            .await
            .unwrap();
        let second = backend
            .put_key("Ed25519", record(0))
            .await
            .unwrap();
        assert_eq!(first, KeyReference::new(1));
        assert_eq!(second, KeyReference::new(2));
    }

    #[tokio::test]
    async fn write_failures_propagate_without_retry() {
        let transport = LoopbackTransport {
            fail_writes: true,
            ..Default::default()
        };
        let backend = RemoteBackend::new(Arc::new(transport));
        let err = backend
            .put_parameters("AES-GCM", OperationScope::Ciphers, record(1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
    }
}
