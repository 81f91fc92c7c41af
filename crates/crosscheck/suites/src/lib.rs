//! Reusable algorithm compatibility suites.
//!
//! A suite is the algorithm-specific body the harness orchestrates: it
//! decides which parameter combinations to cover, produces test vectors
//! during generation, and re-verifies every stored vector during
//! validation. Suites are generic over the provider traits, so the same
//! body tests every implementation of an algorithm.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod aead;
mod signature;

pub use aead::{AeadCompatibility, AuthenticatedCipherData, CipherParameters};
pub use signature::{SignatureCompatibility, SignatureData};
