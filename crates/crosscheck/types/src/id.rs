use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier grouping all data generated under one parameter combination.
///
/// Assigned by the backing store, monotonically increasing within one
/// (algorithm, operation scope) keyspace. Never reused or mutated after
/// assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParametersId(u64);

impl ParametersId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParametersId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Identifier correlating stored key material with the data records that
/// used it.
///
/// Assigned by the backing store in the per-algorithm key keyspace. Opaque
/// and independent of any particular key encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyReference(u64);

impl KeyReference {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for KeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_transparently() {
        let id = ParametersId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: ParametersId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ids_order_by_raw_value() {
        assert!(ParametersId::new(1) < ParametersId::new(2));
        assert!(KeyReference::new(10) > KeyReference::new(9));
    }
}
