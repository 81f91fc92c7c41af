//! Crosscheck shared types.
//!
//! Leaf crate holding the vocabulary every other crosscheck crate speaks:
//! - store-assigned identifiers (`ParametersId`, `KeyReference`)
//! - operation scopes namespacing records within an algorithm
//! - the tagged record envelope persisted by every backend
//! - key encoding formats and the grouped key material they carry

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod b64;
mod id;
mod key;
mod record;
mod scope;

pub use id::{KeyReference, ParametersId};
pub use key::{KeyEncoding, KeyFormat};
pub use record::{EmptyParameters, RecordError, SerializedRecord, TestData, TestParameters};
pub use scope::OperationScope;
