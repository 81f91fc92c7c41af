//! Base64 serde adapters for byte fields in stored records.
//!
//! Records persist as JSON envelopes; raw byte fields go through these
//! adapters so stored vectors stay printable and diffable.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn decode(data: &str) -> Result<Vec<u8>, String> {
    STANDARD
        .decode(data)
        .map_err(|e| format!("base64 decode failed: {e}"))
}

/// `#[serde(with = "crosscheck_types::b64::standard")]` for `Vec<u8>`.
pub mod standard {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode(&text).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "crosscheck_types::b64::optional")]` for `Option<Vec<u8>>`.
pub mod optional {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&super::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|text| super::decode(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(with = "super::standard")]
        payload: Vec<u8>,
        #[serde(with = "super::optional")]
        header: Option<Vec<u8>>,
    }

    #[test]
    fn byte_fields_round_trip_as_base64_strings() {
        let record = Record {
            payload: vec![0, 1, 254, 255],
            header: Some(vec![9; 5]),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("AAH+/w=="));
        assert_eq!(serde_json::from_str::<Record>(&json).unwrap(), record);
    }

    #[test]
    fn absent_optional_fields_stay_null() {
        let record = Record {
            payload: Vec::new(),
            header: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(serde_json::from_str::<Record>(&json).unwrap(), record);
    }
}
