//! Crosscheck provider traits.
//!
//! The harness never implements cryptography. It drives implementations of
//! the traits in this crate, which formalize what a backend (platform API,
//! native library, pure-Rust implementation) must expose for compatibility
//! testing: key generation, import and export across encodings, and the
//! per-operation-kind primitives (AEAD, signatures).
//!
//! Operations that may cross into native code or another process are async;
//! the harness awaits each one before advancing.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
mod traits;

pub use error::{ProviderError, ProviderResult};
pub use traits::{AeadAlgorithm, KeyAlgorithm, SignatureAlgorithm};
