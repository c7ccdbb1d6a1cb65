use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::audit::{AuditAction, AuditLogEntry, SectionAuditStatus};
use super::domain::ApplicationId;
use super::repository::{OverrideRepository, RepositoryError};

/// Manual completeness override recorded by a broker or transaction agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOverride {
    pub application_id: ApplicationId,
    pub section_key: String,
    pub section_label: String,
    pub overridden_by: String,
    pub overridden_at: DateTime<Utc>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("an override reason is required")]
    EmptyReason,
}

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Most recent override for `section_key` on the given application, if any.
///
/// Later entries win ties on `overridden_at`, matching append order.
pub fn active_override<'a>(
    overrides: &'a [SectionOverride],
    application_id: &ApplicationId,
    section_key: &str,
) -> Option<&'a SectionOverride> {
    overrides
        .iter()
        .filter(|entry| &entry.application_id == application_id && entry.section_key == section_key)
        .fold(None, |latest: Option<&SectionOverride>, entry| match latest {
            Some(current) if current.overridden_at > entry.overridden_at => Some(current),
            _ => Some(entry),
        })
}

/// Append-only ledger of section overrides and their audit trail.
pub struct OverrideLedger<R> {
    repository: Arc<R>,
}

impl<R> OverrideLedger<R>
where
    R: OverrideRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and append an override together with its audit entry.
    pub fn record_override(
        &self,
        application_id: &ApplicationId,
        section_key: &str,
        section_label: &str,
        overridden_by: &str,
        reason: &str,
    ) -> Result<SectionOverride, OverrideError> {
        let reason = reason.trim();
        if reason.is_empty() {
            warn!(%application_id, section = section_key, "override rejected without a reason");
            return Err(ValidationError::EmptyReason.into());
        }

        let overridden_at = Utc::now();
        let entry = SectionOverride {
            application_id: application_id.clone(),
            section_key: section_key.to_string(),
            section_label: section_label.to_string(),
            overridden_by: overridden_by.to_string(),
            overridden_at,
            reason: reason.to_string(),
        };
        let audit = AuditLogEntry {
            action: AuditAction::ManualOverride,
            section: section_key.to_string(),
            application_id: application_id.clone(),
            performed_by: overridden_by.to_string(),
            timestamp: overridden_at,
            reason: reason.to_string(),
            previous_status: SectionAuditStatus::Incomplete,
            new_status: SectionAuditStatus::CompleteOverride,
        };

        self.repository.append(entry.clone(), audit)?;
        info!(
            %application_id,
            section = section_key,
            overridden_by,
            "manual section override recorded"
        );
        Ok(entry)
    }

    pub fn get_active_override(
        &self,
        application_id: &ApplicationId,
        section_key: &str,
    ) -> Result<Option<SectionOverride>, RepositoryError> {
        let overrides = self.repository.overrides(application_id)?;
        Ok(active_override(&overrides, application_id, section_key).cloned())
    }

    /// Full override history ordered by `overridden_at` ascending.
    pub fn list_overrides(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<SectionOverride>, RepositoryError> {
        let mut overrides = self.repository.overrides(application_id)?;
        overrides.sort_by_key(|entry| entry.overridden_at);
        Ok(overrides)
    }

    pub fn audit_log(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        let mut entries = self.repository.audit_log(application_id)?;
        entries.sort_by_key(|entry| entry.timestamp);
        Ok(entries)
    }
}
