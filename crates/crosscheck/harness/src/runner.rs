//! The step orchestrator.

use crate::report::{StepKind, StepReport};
use crate::scope::{CompatibilityScope, Phase};
use crate::suite::CompatibilitySuite;
use crate::CompatResult;
use chrono::Utc;
use crosscheck_provider::KeyAlgorithm;
use crosscheck_store::{CompatibilityBackend, MemoryBackend};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Configuration for a compatibility run.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Seed for the scope's size/payload randomness. `None` draws from
    /// entropy; a fixed seed reproduces a generate run's choices.
    pub seed: Option<u64>,
}

/// Runs the four canonical compatibility steps for one suite bound to one
/// algorithm implementation and one persistent backend.
///
/// Steps are independent and order-independent; `validate_step` is
/// expressly not guaranteed to run in the same process as the
/// `generate_step` that produced its data — that is the property under
/// test.
pub struct CompatibilityRunner<S: CompatibilitySuite> {
    suite: S,
    algorithm: Arc<S::Algorithm>,
    persistent: Arc<dyn CompatibilityBackend>,
    config: RunnerConfig,
}

impl<S: CompatibilitySuite> CompatibilityRunner<S> {
    pub fn new(
        suite: S,
        algorithm: Arc<S::Algorithm>,
        persistent: Arc<dyn CompatibilityBackend>,
    ) -> Self {
        Self::with_config(suite, algorithm, persistent, RunnerConfig::default())
    }

    pub fn with_config(
        suite: S,
        algorithm: Arc<S::Algorithm>,
        persistent: Arc<dyn CompatibilityBackend>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            suite,
            algorithm,
            persistent,
            config,
        }
    }

    /// Generate against the persistent backend.
    pub async fn generate_step(&self) -> StepReport {
        self.run(StepKind::Generate).await
    }

    /// Generate with scaled-up iteration and parameter counts.
    pub async fn generate_stress_step(&self) -> StepReport {
        self.run(StepKind::GenerateStress).await
    }

    /// Validate everything ever generated for this algorithm against the
    /// persistent backend.
    pub async fn validate_step(&self) -> StepReport {
        self.run(StepKind::Validate).await
    }

    /// Generate immediately followed by validate against one fresh
    /// ephemeral backend, proving self-consistency before attempting
    /// cross-run compatibility.
    pub async fn loop_step(&self) -> StepReport {
        self.run(StepKind::Loop).await
    }

    async fn run(&self, step: StepKind) -> StepReport {
        let algorithm = self.algorithm.algorithm().to_string();
        let provider = self.algorithm.provider().to_string();
        let started_at = Utc::now();
        let start = Instant::now();
        tracing::info!(%step, algorithm, provider, "running compatibility step");

        let result = match step {
            StepKind::Generate => self.generate_on(self.persistent.clone(), false).await,
            StepKind::GenerateStress => self.generate_on(self.persistent.clone(), true).await,
            StepKind::Validate => self.validate_on(self.persistent.clone()).await,
            StepKind::Loop => {
                let ephemeral: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());
                match self.generate_on(ephemeral.clone(), false).await {
                    Ok(()) => self.validate_on(ephemeral).await,
                    Err(err) => Err(err),
                }
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(%step, algorithm, "compatibility step passed");
                StepReport::passed(step, algorithm, provider, start.elapsed(), started_at)
            }
            Err(err) => {
                tracing::error!(%step, algorithm, error = %err, "compatibility step failed");
                StepReport::failed(
                    step,
                    algorithm,
                    provider,
                    err.to_string(),
                    start.elapsed(),
                    started_at,
                )
            }
        }
    }

    async fn generate_on(
        &self,
        backend: Arc<dyn CompatibilityBackend>,
        stress: bool,
    ) -> CompatResult<()> {
        let scope = CompatibilityScope::new(
            Phase::Generate,
            self.algorithm.clone(),
            backend,
            self.config.seed,
        );
        let span = tracing::info_span!(
            "compat",
            phase = %Phase::Generate,
            algorithm = %self.algorithm.algorithm(),
            provider = %self.algorithm.provider(),
        );
        self.suite.generate(&scope, stress).instrument(span).await
    }

    async fn validate_on(&self, backend: Arc<dyn CompatibilityBackend>) -> CompatResult<()> {
        let scope = CompatibilityScope::new(
            Phase::Validate,
            self.algorithm.clone(),
            backend,
            self.config.seed,
        );
        let span = tracing::info_span!(
            "compat",
            phase = %Phase::Validate,
            algorithm = %self.algorithm.algorithm(),
            provider = %self.algorithm.provider(),
        );
        self.suite.validate(&scope).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompatError, GeneratedKey};
    use async_trait::async_trait;
    use crosscheck_provider::{KeyAlgorithm, ProviderError, ProviderResult};
    use crosscheck_types::{EmptyParameters, KeyEncoding, KeyFormat, KeyReference, TestData};
    use serde::{Deserialize, Serialize};

    /// Toy algorithm whose "key" is its raw bytes; the alternate encoding
    /// stores them reversed.
    struct MirrorAlgorithm {
        refuse: Vec<KeyFormat>,
    }

    impl MirrorAlgorithm {
        fn new() -> Self {
            Self { refuse: Vec::new() }
        }

        fn refusing(formats: &[KeyFormat]) -> Self {
            Self {
                refuse: formats.to_vec(),
            }
        }
    }

    #[async_trait]
    impl KeyAlgorithm for MirrorAlgorithm {
        type Key = Vec<u8>;
        type KeyParams = EmptyParameters;

        fn algorithm(&self) -> &str {
            "MIRROR"
        }

        fn provider(&self) -> &str {
            "test"
        }

        fn key_params(&self, _stress: bool) -> Vec<EmptyParameters> {
            vec![EmptyParameters]
        }

        async fn generate_key(&self, _params: &EmptyParameters) -> ProviderResult<Vec<u8>> {
            Ok(rand::random::<[u8; 16]>().to_vec())
        }

        async fn export_key(&self, key: &Vec<u8>) -> ProviderResult<Vec<KeyEncoding>> {
            let mut reversed = key.clone();
            reversed.reverse();
            Ok(vec![
                KeyEncoding::new(KeyFormat::Raw, key.clone()),
                KeyEncoding::new(KeyFormat::Der, reversed),
            ])
        }

        async fn import_key(&self, encoding: &KeyEncoding) -> ProviderResult<Vec<u8>> {
            if self.refuse.contains(&encoding.format) {
                return Err(ProviderError::KeyImport(format!(
                    "format {} refused",
                    encoding.format
                )));
            }
            match encoding.format {
                KeyFormat::Raw => Ok(encoding.bytes.clone()),
                KeyFormat::Der => {
                    let mut bytes = encoding.bytes.clone();
                    bytes.reverse();
                    Ok(bytes)
                }
                KeyFormat::Jwk => Err(ProviderError::KeyImport("no JWK form".to_string())),
            }
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct MirrorData {
        key_reference: KeyReference,
        payload: Vec<u8>,
    }

    impl TestData for MirrorData {
        const TAG: &'static str = "test.mirror-data";
    }

    /// Stores each key's bytes as the payload; validation checks that every
    /// reconstructed variant reproduces them.
    struct MirrorSuite;

    #[async_trait]
    impl CompatibilitySuite for MirrorSuite {
        type Algorithm = MirrorAlgorithm;

        async fn generate(
            &self,
            scope: &CompatibilityScope<MirrorAlgorithm>,
            stress: bool,
        ) -> CompatResult<()> {
            let ciphers = scope.ciphers();
            let id = ciphers.save_parameters(&EmptyParameters).await?;
            for GeneratedKey { reference, key } in scope.generate_keys(stress).await? {
                ciphers
                    .save_data(
                        id,
                        &MirrorData {
                            key_reference: reference,
                            payload: key,
                        },
                    )
                    .await?;
            }
            Ok(())
        }

        async fn validate(&self, scope: &CompatibilityScope<MirrorAlgorithm>) -> CompatResult<()> {
            let keys = scope.validate_keys().await?;
            let ciphers = scope.ciphers();
            for (id, EmptyParameters) in ciphers.parameters::<EmptyParameters>().await? {
                for record in ciphers.data::<MirrorData>(id).await? {
                    let Some(variants) = keys.keys_for(record.key_reference)? else {
                        continue;
                    };
                    for key in variants {
                        if *key != record.payload {
                            return Err(CompatError::content_mismatch(format!(
                                "stored key bytes for {}",
                                record.key_reference
                            )));
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn runner_with(
        algorithm: MirrorAlgorithm,
        persistent: Arc<dyn CompatibilityBackend>,
    ) -> CompatibilityRunner<MirrorSuite> {
        CompatibilityRunner::with_config(
            MirrorSuite,
            Arc::new(algorithm),
            persistent,
            RunnerConfig { seed: Some(7) },
        )
    }

    #[tokio::test]
    async fn loop_step_round_trips_on_an_ephemeral_backend() {
        let persistent: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());
        let runner = runner_with(MirrorAlgorithm::new(), persistent.clone());

        runner.loop_step().await.assert_passed();

        // The loop step must not have touched the persistent backend.
        let keys = persistent.get_all_keys("MIRROR").await.unwrap();
        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn loop_steps_are_isolated_from_each_other() {
        let persistent: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());
        let first = CompatibilityRunner::with_config(
            MirrorSuite,
            Arc::new(MirrorAlgorithm::new()),
            persistent.clone(),
            RunnerConfig { seed: Some(1) },
        );
        let second = CompatibilityRunner::with_config(
            MirrorSuite,
            Arc::new(MirrorAlgorithm::new()),
            persistent,
            RunnerConfig { seed: Some(2) },
        );

        first.loop_step().await.assert_passed();
        second.loop_step().await.assert_passed();
    }

    #[tokio::test]
    async fn generate_and_validate_correlate_across_runners() {
        let shared: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());

        let generator = runner_with(MirrorAlgorithm::new(), shared.clone());
        generator.generate_step().await.assert_passed();

        // A different runner instance plays the role of a later, unrelated
        // validation run against the same store.
        let validator = runner_with(MirrorAlgorithm::new(), shared);
        validator.validate_step().await.assert_passed();
    }

    #[tokio::test]
    async fn stress_generation_covers_more_keys() {
        let shared: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());
        let runner = runner_with(MirrorAlgorithm::new(), shared.clone());

        runner.generate_step().await.assert_passed();
        let after_normal = shared.get_all_keys("MIRROR").await.unwrap().len();

        runner.generate_stress_step().await.assert_passed();
        let after_stress = shared.get_all_keys("MIRROR").await.unwrap().len();

        assert!(after_stress - after_normal > after_normal);
    }

    #[tokio::test]
    async fn one_refused_encoding_still_validates() {
        let shared: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());
        runner_with(MirrorAlgorithm::new(), shared.clone())
            .generate_step()
            .await
            .assert_passed();

        let validator = runner_with(MirrorAlgorithm::refusing(&[KeyFormat::Der]), shared);
        validator.validate_step().await.assert_passed();
    }

    #[tokio::test]
    async fn all_encodings_refused_fails_validation() {
        let shared: Arc<dyn CompatibilityBackend> = Arc::new(MemoryBackend::new());
        runner_with(MirrorAlgorithm::new(), shared.clone())
            .generate_step()
            .await
            .assert_passed();

        let validator = runner_with(
            MirrorAlgorithm::refusing(&[KeyFormat::Raw, KeyFormat::Der]),
            shared,
        );
        let report = validator.validate_step().await;
        assert!(!report.is_passed());
        assert!(report
            .error
            .as_deref()
            .unwrap()
            .contains("key reconstruction failed"));
    }

    #[tokio::test]
    async fn validating_an_empty_store_passes() {
        let runner = runner_with(
            MirrorAlgorithm::new(),
            Arc::new(MemoryBackend::new()),
        );
        runner.validate_step().await.assert_passed();
    }
}
