use crate::record::TestData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding format of exported key material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyFormat {
    /// Canonical raw bytes of the key.
    Raw,
    /// JSON Web Key document.
    Jwk,
    /// DER-encoded structure.
    Der,
}

impl KeyFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            KeyFormat::Raw => "RAW",
            KeyFormat::Jwk => "JWK",
            KeyFormat::Der => "DER",
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One byte-encoding of a logical key.
///
/// All encodings of the same logical key are grouped under one
/// [`KeyReference`], so validation can exercise every representation.
///
/// [`KeyReference`]: crate::KeyReference
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEncoding {
    pub format: KeyFormat,
    #[serde(with = "crate::b64::standard")]
    pub bytes: Vec<u8>,
}

impl KeyEncoding {
    pub fn new(format: KeyFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }
}

impl TestData for KeyEncoding {
    const TAG: &'static str = "core.key-encoding";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_round_trips_through_json() {
        let encoding = KeyEncoding::new(KeyFormat::Raw, vec![0, 1, 2, 250, 251, 252, 253]);
        let json = serde_json::to_string(&encoding).unwrap();
        let back: KeyEncoding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, encoding);
    }

    #[test]
    fn encoding_handles_non_aligned_lengths() {
        for len in 0..10usize {
            let encoding = KeyEncoding::new(KeyFormat::Jwk, (0..len as u8).collect());
            let json = serde_json::to_string(&encoding).unwrap();
            let back: KeyEncoding = serde_json::from_str(&json).unwrap();
            assert_eq!(back, encoding, "length {len}");
        }
    }
}
