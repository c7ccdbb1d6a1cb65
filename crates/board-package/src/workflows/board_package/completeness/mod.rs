mod policy;
pub(crate) mod rules;

pub use policy::CompletenessPolicy;
pub use rules::{RequiredSection, SectionStatus};

use super::domain::{Application, ApplicationId, TransactionType};
use super::overrides::SectionOverride;
use rules::{assess_section, completion_percentage};
use serde::{Deserialize, Serialize};

/// Raised when an application cannot be evaluated at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unrecognized transaction type `{0}`")]
    UnrecognizedTransactionType(String),
    #[error("application {0} has no sections")]
    NoSections(ApplicationId),
}

/// Stateless evaluator deciding completion and submit eligibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessEvaluator {
    policy: CompletenessPolicy,
}

impl CompletenessEvaluator {
    pub fn new(policy: CompletenessPolicy) -> Self {
        Self { policy }
    }

    pub fn evaluate(
        &self,
        application: &Application,
        overrides: &[SectionOverride],
    ) -> Result<CompletenessReport, ConfigurationError> {
        if let TransactionType::Unrecognized(raw) = &application.transaction_type {
            return Err(ConfigurationError::UnrecognizedTransactionType(raw.clone()));
        }
        if application.sections.is_empty() {
            return Err(ConfigurationError::NoSections(application.id.clone()));
        }

        let per_section: Vec<SectionCompleteness> =
            RequiredSection::for_transaction(&application.transaction_type)
                .into_iter()
                .map(|required| assess_section(application, overrides, required))
                .collect();

        let total_count = per_section.len();
        let completed_count = per_section
            .iter()
            .filter(|section| section.satisfied)
            .count();
        let can_submit = per_section
            .iter()
            .all(|section| section.status.allows_submission(self.policy));

        Ok(CompletenessReport {
            application_id: application.id.clone(),
            transaction_type: application.transaction_type.clone(),
            completed_count,
            total_count,
            completion_percentage: completion_percentage(completed_count, total_count),
            can_submit,
            policy: self.policy,
            per_section,
        })
    }
}

/// Per-section line of a completeness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCompleteness {
    pub key: String,
    pub label: String,
    pub satisfied: bool,
    pub overridden: bool,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub application_id: ApplicationId,
    pub transaction_type: TransactionType,
    pub completed_count: usize,
    pub total_count: usize,
    pub completion_percentage: u8,
    pub can_submit: bool,
    pub policy: CompletenessPolicy,
    pub per_section: Vec<SectionCompleteness>,
}

impl CompletenessReport {
    /// Keys of the required sections that keep the package from being submitted.
    pub fn blocking_sections(&self) -> Vec<String> {
        self.per_section
            .iter()
            .filter(|section| !section.status.allows_submission(self.policy))
            .map(|section| section.key.clone())
            .collect()
    }
}
