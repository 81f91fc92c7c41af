use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace within an algorithm under which parameters and data are
/// independently numbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationScope {
    Ciphers,
    Signatures,
    KeyAgreements,
}

impl OperationScope {
    /// Stable name used as the keyspace segment in every backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            OperationScope::Ciphers => "ciphers",
            OperationScope::Signatures => "signatures",
            OperationScope::KeyAgreements => "key-agreements",
        }
    }
}

impl fmt::Display for OperationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
