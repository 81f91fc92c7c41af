use crate::scope::CompatibilityScope;
use crate::CompatResult;
use async_trait::async_trait;
use crosscheck_provider::KeyAlgorithm;

/// The capability an algorithm-specific compatibility test implements.
///
/// Invoked by composition from the runner; a suite carries its own
/// configuration (iteration counts, size bounds) and nothing else. The
/// same suite instance must be reusable across steps — all run state
/// lives in the scope and the store behind it.
#[async_trait]
pub trait CompatibilitySuite: Send + Sync {
    type Algorithm: KeyAlgorithm;

    /// Produces parameters, keys, and test vectors, appending everything
    /// to the scope's store. `stress` scales iteration and parameter
    /// counts without changing semantics.
    async fn generate(
        &self,
        scope: &CompatibilityScope<Self::Algorithm>,
        stress: bool,
    ) -> CompatResult<()>;

    /// Reads back everything ever generated for this algorithm and
    /// re-verifies it under the current provider.
    async fn validate(&self, scope: &CompatibilityScope<Self::Algorithm>) -> CompatResult<()>;
}
