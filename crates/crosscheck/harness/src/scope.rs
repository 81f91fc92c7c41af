use crosscheck_provider::KeyAlgorithm;
use crosscheck_store::{CompatibilityBackend, KeyStore, OperationStore};
use crosscheck_types::OperationScope;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Phase a compatibility step runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Generate,
    Validate,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Generate => "GENERATE",
            Phase::Validate => "VALIDATE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an algorithm-specific test body sees during one step.
///
/// Constructed fresh per step invocation; owns no state beyond the bound
/// references and is discarded after the step completes.
pub struct CompatibilityScope<A: KeyAlgorithm> {
    phase: Phase,
    algorithm: Arc<A>,
    backend: Arc<dyn CompatibilityBackend>,
    rng: Mutex<StdRng>,
}

impl<A: KeyAlgorithm> CompatibilityScope<A> {
    pub(crate) fn new(
        phase: Phase,
        algorithm: Arc<A>,
        backend: Arc<dyn CompatibilityBackend>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            phase,
            algorithm,
            backend,
            rng: Mutex::new(rng),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Typed store for an operation scope of this algorithm.
    pub fn store(&self, scope: OperationScope) -> OperationStore {
        OperationStore::new(
            self.backend.clone(),
            self.algorithm.algorithm(),
            scope,
        )
    }

    pub fn ciphers(&self) -> OperationStore {
        self.store(OperationScope::Ciphers)
    }

    pub fn signatures(&self) -> OperationStore {
        self.store(OperationScope::Signatures)
    }

    pub(crate) fn key_store(&self) -> KeyStore {
        KeyStore::new(self.backend.clone(), self.algorithm.algorithm())
    }

    /// Uniformly random size below `max`.
    pub fn random_size(&self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        self.rng().gen_range(0..max)
    }

    pub fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        self.rng().fill_bytes(&mut bytes);
        bytes
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        // The generator state stays valid even after a test body panicked.
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }
}
