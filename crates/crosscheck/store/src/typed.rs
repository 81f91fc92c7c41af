//! Typed layer over the untyped backend contract.
//!
//! Handles are cheap, per-(algorithm, scope) views holding an `Arc` to the
//! backend. Encoding writes the record's type tag next to the body; every
//! read checks the stored tag against the requested type.

use crate::traits::CompatibilityBackend;
use crate::StoreResult;
use crosscheck_types::{
    KeyEncoding, KeyReference, OperationScope, ParametersId, SerializedRecord, TestData,
    TestParameters,
};
use std::sync::Arc;

/// Typed parameter/data store for one (algorithm, operation scope).
#[derive(Clone)]
pub struct OperationStore {
    backend: Arc<dyn CompatibilityBackend>,
    algorithm: String,
    scope: OperationScope,
}

impl OperationStore {
    pub fn new(
        backend: Arc<dyn CompatibilityBackend>,
        algorithm: impl Into<String>,
        scope: OperationScope,
    ) -> Self {
        Self {
            backend,
            algorithm: algorithm.into(),
            scope,
        }
    }

    pub fn scope(&self) -> OperationScope {
        self.scope
    }

    /// Persists one parameter combination and returns its assigned id.
    pub async fn save_parameters<P: TestParameters>(
        &self,
        parameters: &P,
    ) -> StoreResult<ParametersId> {
        let record = SerializedRecord::encode(P::TAG, parameters)?;
        let id = self
            .backend
            .put_parameters(&self.algorithm, self.scope, record)
            .await?;
        tracing::debug!(
            algorithm = %self.algorithm,
            scope = %self.scope,
            %id,
            tag = P::TAG,
            "saved parameters"
        );
        Ok(id)
    }

    /// Every stored parameter record of type `P`, in assignment order.
    pub async fn parameters<P: TestParameters>(
        &self,
    ) -> StoreResult<Vec<(ParametersId, P)>> {
        let rows = self
            .backend
            .get_all_parameters(&self.algorithm, self.scope)
            .await?;
        rows.into_iter()
            .map(|(id, record)| Ok((id, record.decode(P::TAG)?)))
            .collect()
    }

    /// Appends one data record under an existing parameters id.
    pub async fn save_data<D: TestData>(
        &self,
        parameters_id: ParametersId,
        data: &D,
    ) -> StoreResult<()> {
        let record = SerializedRecord::encode(D::TAG, data)?;
        self.backend
            .put_data(&self.algorithm, self.scope, parameters_id, record)
            .await
    }

    /// Every data record under the id, in insertion order.
    pub async fn data<D: TestData>(&self, parameters_id: ParametersId) -> StoreResult<Vec<D>> {
        let rows = self
            .backend
            .get_all_data(&self.algorithm, self.scope, parameters_id)
            .await?;
        rows.into_iter().map(|record| Ok(record.decode(D::TAG)?)).collect()
    }
}

/// Typed key material store for one algorithm.
#[derive(Clone)]
pub struct KeyStore {
    backend: Arc<dyn CompatibilityBackend>,
    algorithm: String,
}

impl KeyStore {
    pub fn new(backend: Arc<dyn CompatibilityBackend>, algorithm: impl Into<String>) -> Self {
        Self {
            backend,
            algorithm: algorithm.into(),
        }
    }

    /// Registers a key generated under the given parameters and returns the
    /// fresh reference its encodings will be grouped under.
    pub async fn save_key<P: TestParameters>(&self, params: &P) -> StoreResult<KeyReference> {
        let descriptor = SerializedRecord::encode(P::TAG, params)?;
        let reference = self.backend.put_key(&self.algorithm, descriptor).await?;
        tracing::debug!(
            algorithm = %self.algorithm,
            %reference,
            "registered key"
        );
        Ok(reference)
    }

    /// Every registered key with its generation parameters, in assignment
    /// order.
    pub async fn keys<P: TestParameters>(&self) -> StoreResult<Vec<(KeyReference, P)>> {
        let rows = self.backend.get_all_keys(&self.algorithm).await?;
        rows.into_iter()
            .map(|(reference, descriptor)| Ok((reference, descriptor.decode(P::TAG)?)))
            .collect()
    }

    pub async fn save_encoding(
        &self,
        reference: KeyReference,
        encoding: &KeyEncoding,
    ) -> StoreResult<()> {
        let record = SerializedRecord::encode(KeyEncoding::TAG, encoding)?;
        self.backend
            .put_key_encoding(&self.algorithm, reference, record)
            .await
    }

    pub async fn encodings(&self, reference: KeyReference) -> StoreResult<Vec<KeyEncoding>> {
        let rows = self
            .backend
            .get_all_key_encodings(&self.algorithm, reference)
            .await?;
        rows.into_iter()
            .map(|record| Ok(record.decode(KeyEncoding::TAG)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::StoreError;
    use crosscheck_types::KeyFormat;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct CipherParameters {
        tag_size_bits: u32,
    }

    impl TestParameters for CipherParameters {
        const TAG: &'static str = "test.cipher-parameters";
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct DigestParameters {
        size: u32,
    }

    impl TestParameters for DigestParameters {
        const TAG: &'static str = "test.digest-parameters";
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct CipherData {
        plaintext: Vec<u8>,
        ciphertext: Vec<u8>,
    }

    impl TestData for CipherData {
        const TAG: &'static str = "test.cipher-data";
    }

    fn ciphers() -> OperationStore {
        OperationStore::new(
            Arc::new(MemoryBackend::new()),
            "AES-GCM",
            OperationScope::Ciphers,
        )
    }

    #[tokio::test]
    async fn parameters_round_trip_in_assignment_order() {
        let store = ciphers();
        let first = store
            .save_parameters(&CipherParameters { tag_size_bits: 96 })
            .await
            .unwrap();
        let second = store
            .save_parameters(&CipherParameters { tag_size_bits: 128 })
            .await
            .unwrap();

        let stored = store.parameters::<CipherParameters>().await.unwrap();
        assert_eq!(
            stored,
            vec![
                (first, CipherParameters { tag_size_bits: 96 }),
                (second, CipherParameters { tag_size_bits: 128 }),
            ]
        );
    }

    #[tokio::test]
    async fn reading_a_foreign_type_is_a_type_mismatch() {
        let store = ciphers();
        store
            .save_parameters(&CipherParameters { tag_size_bits: 96 })
            .await
            .unwrap();

        let err = store.parameters::<DigestParameters>().await.unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn data_records_attach_to_their_parameters() {
        let store = ciphers();
        let id = store
            .save_parameters(&CipherParameters { tag_size_bits: 128 })
            .await
            .unwrap();
        let data = CipherData {
            plaintext: vec![1, 2, 3],
            ciphertext: vec![4, 5, 6],
        };
        store.save_data(id, &data).await.unwrap();

        let stored = store.data::<CipherData>(id).await.unwrap();
        assert_eq!(stored, vec![data]);
    }

    #[tokio::test]
    async fn key_store_groups_encodings_per_reference() {
        let backend: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());
        let keys = KeyStore::new(backend, "AES-GCM");

        let reference = keys
            .save_key(&CipherParameters { tag_size_bits: 128 })
            .await
            .unwrap();
        keys.save_encoding(reference, &KeyEncoding::new(KeyFormat::Raw, vec![1; 16]))
            .await
            .unwrap();
        keys.save_encoding(reference, &KeyEncoding::new(KeyFormat::Jwk, vec![2; 40]))
            .await
            .unwrap();

        let encodings = keys.encodings(reference).await.unwrap();
        assert_eq!(encodings.len(), 2);
        assert_eq!(encodings[0].format, KeyFormat::Raw);
        assert_eq!(encodings[1].format, KeyFormat::Jwk);

        let registered = keys.keys::<CipherParameters>().await.unwrap();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].0, reference);
    }
}
