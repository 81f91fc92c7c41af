//! Crosscheck compatibility test orchestration.
//!
//! The protocol has two phases. A generate phase runs an algorithm-specific
//! test body that chooses parameter combinations, generates keys, produces
//! test vectors, and appends everything to a store. A validate phase —
//! possibly in a different process, on a different provider, years later —
//! reads every record back and re-verifies it.
//!
//! This crate binds the pieces together:
//! - [`CompatibilityScope`] — what a test body sees: typed stores, the key
//!   registry, seeded randomness.
//! - [`CompatibilitySuite`] — the capability a test body implements:
//!   `generate(scope, stress)` and `validate(scope)`.
//! - [`CompatibilityRunner`] — the four canonical steps: generate,
//!   generate-stress, validate (persistent backend), and loop (ephemeral
//!   backend, generate immediately followed by validate).

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
mod keys;
mod report;
mod runner;
mod scope;
mod suite;

pub use error::{CompatError, CompatResult};
pub use keys::{GeneratedKey, KeyPool};
pub use report::{StepKind, StepReport, StepStatus};
pub use runner::{CompatibilityRunner, RunnerConfig};
pub use scope::{CompatibilityScope, Phase};
pub use suite::CompatibilitySuite;
