//! Pure-Rust software provider.
//!
//! Reference implementation of the crosscheck provider traits, backed by
//! the RustCrypto `aes-gcm` and `ed25519-dalek` crates. Exists so the
//! harness can be exercised end to end without a platform provider; it is
//! also a legitimate compatibility peer for any other provider of the same
//! algorithms.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod aead;
mod eddsa;
mod jwk;

pub use aead::{AesGcmKey, AesKeyParams, SoftwareAesGcm};
pub use eddsa::{Ed25519Key, SoftwareEd25519};
