use crate::StoreResult;
use async_trait::async_trait;
use crosscheck_types::{KeyReference, OperationScope, ParametersId, SerializedRecord};

/// Untyped store contract shared by the ephemeral and persistent backends.
///
/// All operations are append-only. Identifier assignment is the backend's
/// responsibility and must be atomic: two concurrent writers to the same
/// (algorithm, scope) keyspace must never observe the same id.
///
/// Read operations return records in assignment order (parameters, keys)
/// or insertion order (data, encodings).
#[async_trait]
pub trait CompatibilityBackend: Send + Sync {
    /// Persists one parameter record and returns its freshly assigned id.
    async fn put_parameters(
        &self,
        algorithm: &str,
        scope: OperationScope,
        record: SerializedRecord,
    ) -> StoreResult<ParametersId>;

    /// Every parameter record ever stored in this keyspace.
    async fn get_all_parameters(
        &self,
        algorithm: &str,
        scope: OperationScope,
    ) -> StoreResult<Vec<(ParametersId, SerializedRecord)>>;

    /// Appends one data record under an existing parameters id.
    async fn put_data(
        &self,
        algorithm: &str,
        scope: OperationScope,
        parameters_id: ParametersId,
        record: SerializedRecord,
    ) -> StoreResult<()>;

    /// Every data record stored under the given parameters id.
    async fn get_all_data(
        &self,
        algorithm: &str,
        scope: OperationScope,
        parameters_id: ParametersId,
    ) -> StoreResult<Vec<SerializedRecord>>;

    /// Registers a key descriptor and returns its fresh reference.
    async fn put_key(
        &self,
        algorithm: &str,
        descriptor: SerializedRecord,
    ) -> StoreResult<KeyReference>;

    /// Every key descriptor registered for this algorithm.
    async fn get_all_keys(
        &self,
        algorithm: &str,
    ) -> StoreResult<Vec<(KeyReference, SerializedRecord)>>;

    /// Appends one encoding of the key behind an existing reference.
    async fn put_key_encoding(
        &self,
        algorithm: &str,
        reference: KeyReference,
        record: SerializedRecord,
    ) -> StoreResult<()>;

    /// Every stored encoding of the key behind the given reference.
    async fn get_all_key_encodings(
        &self,
        algorithm: &str,
        reference: KeyReference,
    ) -> StoreResult<Vec<SerializedRecord>>;
}
