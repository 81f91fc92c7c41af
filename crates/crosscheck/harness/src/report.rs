//! Step outcome reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Step outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Passed,
    Failed,
}

/// The four canonical steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Generate,
    GenerateStress,
    Validate,
    Loop,
}

impl StepKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StepKind::Generate => "generate",
            StepKind::GenerateStress => "generate-stress",
            StepKind::Validate => "validate",
            StepKind::Loop => "loop",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one orchestrated step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub step: StepKind,
    pub algorithm: String,
    pub provider: String,
    pub status: StepStatus,
    pub error: Option<String>,
    pub duration: Duration,
    pub started_at: DateTime<Utc>,
}

impl StepReport {
    pub(crate) fn passed(
        step: StepKind,
        algorithm: impl Into<String>,
        provider: impl Into<String>,
        duration: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step,
            algorithm: algorithm.into(),
            provider: provider.into(),
            status: StepStatus::Passed,
            error: None,
            duration,
            started_at,
        }
    }

    pub(crate) fn failed(
        step: StepKind,
        algorithm: impl Into<String>,
        provider: impl Into<String>,
        error: String,
        duration: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step,
            algorithm: algorithm.into(),
            provider: provider.into(),
            status: StepStatus::Failed,
            error: Some(error),
            duration,
            started_at,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == StepStatus::Passed
    }

    /// Panics with the step's error when the step failed. Test helper.
    pub fn assert_passed(&self) {
        if !self.is_passed() {
            panic!(
                "{} step for {} ({}) failed: {}",
                self.step,
                self.algorithm,
                self.provider,
                self.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
