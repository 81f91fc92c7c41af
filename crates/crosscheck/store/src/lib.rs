//! Crosscheck parameter and test-vector store.
//!
//! One contract, two backends:
//! - [`MemoryBackend`] — ephemeral, in-process; valid for exactly one
//!   generate-then-validate run.
//! - [`RemoteBackend`] — persistent, routed through a [`StoreTransport`];
//!   survives process exit so generation and validation can happen in
//!   unrelated runs, providers, or years.
//!
//! Design stance:
//! - Generation is append-only; validation never mutates the store.
//! - Identifiers are assigned by the backend, monotonically per
//!   (algorithm, operation scope) keyspace, and are never reused.
//! - Every record travels as a tagged envelope; the typed layer
//!   ([`OperationStore`], [`KeyStore`]) checks tags on read.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
#[cfg(feature = "remote-http")]
pub mod http;
pub mod memory;
mod remote;
mod traits;
mod typed;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryBackend;
pub use remote::{RemoteBackend, StoreTransport};
pub use traits::CompatibilityBackend;
pub use typed::{KeyStore, OperationStore};

#[cfg(feature = "remote-http")]
pub use http::HttpTransport;
