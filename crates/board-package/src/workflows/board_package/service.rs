use std::sync::Arc;

use tracing::{info, warn};

use super::audit::AuditLogEntry;
use super::completeness::{
    CompletenessEvaluator, CompletenessPolicy, CompletenessReport, ConfigurationError,
    RequiredSection,
};
use super::domain::{Application, ApplicationId, ApplicationStatus};
use super::overrides::{OverrideError, OverrideLedger, SectionOverride, ValidationError};
use super::repository::{ApplicationRepository, OverrideRepository, RepositoryError};

/// Service composing the application store, the override ledger, and the evaluator.
pub struct BoardPackageService<A, O> {
    applications: Arc<A>,
    ledger: OverrideLedger<O>,
    evaluator: CompletenessEvaluator,
}

impl<A, O> BoardPackageService<A, O>
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    pub fn new(applications: Arc<A>, overrides: Arc<O>, policy: CompletenessPolicy) -> Self {
        Self {
            applications,
            ledger: OverrideLedger::new(overrides),
            evaluator: CompletenessEvaluator::new(policy),
        }
    }

    /// Store a new application, deriving its completion percentage on the way in.
    pub fn register(
        &self,
        mut application: Application,
    ) -> Result<Application, BoardPackageServiceError> {
        let report = self.evaluator.evaluate(&application, &[])?;
        application.completion_percentage = report.completion_percentage;

        let stored = self.applications.insert(application)?;
        info!(
            application_id = %stored.id,
            transaction_type = %stored.transaction_type,
            completion = stored.completion_percentage,
            "board package registered"
        );
        Ok(stored)
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, BoardPackageServiceError> {
        let application = self
            .applications
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    pub fn completeness(
        &self,
        application_id: &ApplicationId,
    ) -> Result<CompletenessReport, BoardPackageServiceError> {
        let application = self.get(application_id)?;
        let overrides = self.ledger.list_overrides(application_id)?;
        let report = self.evaluator.evaluate(&application, &overrides)?;
        Ok(report)
    }

    /// Record a manual override for a section of an existing application.
    pub fn record_override(
        &self,
        application_id: &ApplicationId,
        section_key: &str,
        overridden_by: &str,
        reason: &str,
    ) -> Result<SectionOverride, BoardPackageServiceError> {
        let mut application = self.get(application_id)?;
        let section_label = application
            .section(section_key)
            .map(|section| section.label.clone())
            .or_else(|| RequiredSection::from_key(section_key).map(|s| s.label().to_string()))
            .unwrap_or_else(|| section_key.to_string());

        let entry = self.ledger.record_override(
            application_id,
            section_key,
            &section_label,
            overridden_by,
            reason,
        )?;

        let overrides = self.ledger.list_overrides(application_id)?;
        let report = self.evaluator.evaluate(&application, &overrides)?;
        if report.completion_percentage != application.completion_percentage {
            application.completion_percentage = report.completion_percentage;
            self.applications.update(application)?;
            info!(
                %application_id,
                completion = report.completion_percentage,
                "completion refreshed after override"
            );
        }
        Ok(entry)
    }

    pub fn overrides(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<SectionOverride>, BoardPackageServiceError> {
        Ok(self.ledger.list_overrides(application_id)?)
    }

    pub fn audit_log(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<AuditLogEntry>, BoardPackageServiceError> {
        Ok(self.ledger.audit_log(application_id)?)
    }

    pub fn pipeline(
        &self,
        status: ApplicationStatus,
    ) -> Result<Vec<Application>, BoardPackageServiceError> {
        Ok(self.applications.pipeline(status)?)
    }

    /// Submit the package to the board once every required section is satisfied.
    pub fn submit(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, BoardPackageServiceError> {
        let mut application = self.get(application_id)?;
        if !application.status.accepts_submission() {
            return Err(BoardPackageServiceError::InvalidTransition {
                status: application.status,
            });
        }

        let overrides = self.ledger.list_overrides(application_id)?;
        let report = self.evaluator.evaluate(&application, &overrides)?;
        if !report.can_submit {
            let blocking = report.blocking_sections();
            warn!(
                %application_id,
                completion = report.completion_percentage,
                blocking = ?blocking,
                "submission blocked by incomplete sections"
            );
            return Err(BoardPackageServiceError::SubmissionBlocked {
                blocking,
                completion_percentage: report.completion_percentage,
            });
        }

        application.status = ApplicationStatus::Submitted;
        application.completion_percentage = report.completion_percentage;
        self.applications.update(application.clone())?;

        info!(%application_id, "board package submitted");
        Ok(application)
    }
}

/// Error raised by the board-package service.
#[derive(Debug, thiserror::Error)]
pub enum BoardPackageServiceError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("submission blocked at {completion_percentage}%: incomplete sections {blocking:?}")]
    SubmissionBlocked {
        blocking: Vec<String>,
        completion_percentage: u8,
    },
    #[error("cannot submit an application in status {}", .status.label())]
    InvalidTransition { status: ApplicationStatus },
}

impl From<OverrideError> for BoardPackageServiceError {
    fn from(value: OverrideError) -> Self {
        match value {
            OverrideError::Validation(err) => Self::Validation(err),
            OverrideError::Repository(err) => Self::Repository(err),
        }
    }
}
