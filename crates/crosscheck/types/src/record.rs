use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A typed, serializable parameter combination chosen during generation.
///
/// The tag must stay stable across releases and independently built
/// binaries: it is written next to the serialized body and checked on read.
pub trait TestParameters: Serialize + DeserializeOwned + Send + Sync {
    const TAG: &'static str;
}

/// An algorithm-specific data payload persisted under a [`ParametersId`].
///
/// [`ParametersId`]: crate::ParametersId
pub trait TestData: Serialize + DeserializeOwned + Send + Sync {
    const TAG: &'static str;
}

/// Parameter record for algorithms with no variable parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyParameters;

impl TestParameters for EmptyParameters {
    const TAG: &'static str = "core.empty-parameters";
}

/// Envelope persisted by every backend: an explicit type tag alongside the
/// serialized body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedRecord {
    pub tag: String,
    pub body: serde_json::Value,
}

impl SerializedRecord {
    pub fn encode<T: Serialize>(tag: &str, value: &T) -> Result<Self, RecordError> {
        let body = serde_json::to_value(value)
            .map_err(|e| RecordError::Serialization(e.to_string()))?;
        Ok(Self {
            tag: tag.to_owned(),
            body,
        })
    }

    /// Decodes the body, failing if the stored tag differs from the one the
    /// caller expects.
    pub fn decode<T: DeserializeOwned>(&self, expected_tag: &str) -> Result<T, RecordError> {
        if self.tag != expected_tag {
            return Err(RecordError::TagMismatch {
                expected: expected_tag.to_owned(),
                found: self.tag.clone(),
            });
        }
        serde_json::from_value(self.body.clone())
            .map_err(|e| RecordError::Serialization(e.to_string()))
    }

    /// Wire form used by transports.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        serde_json::to_vec(self).map_err(|e| RecordError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        serde_json::from_slice(bytes).map_err(|e| RecordError::Serialization(e.to_string()))
    }
}

/// Envelope encode/decode errors.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("type tag mismatch: expected '{expected}', found '{found}'")]
    TagMismatch { expected: String, found: String },
}
