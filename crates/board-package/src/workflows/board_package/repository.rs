use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use super::audit::AuditLogEntry;
use super::domain::{Application, ApplicationId, ApplicationStatus, TransactionType};
use super::overrides::SectionOverride;

/// Storage abstraction for the application aggregate written by the intake forms.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn pipeline(&self, status: ApplicationStatus) -> Result<Vec<Application>, RepositoryError>;
}

/// Append-only storage for overrides and the compliance audit log.
///
/// `append` must persist both records or neither.
pub trait OverrideRepository: Send + Sync {
    fn append(&self, entry: SectionOverride, audit: AuditLogEntry) -> Result<(), RepositoryError>;
    fn overrides(&self, id: &ApplicationId) -> Result<Vec<SectionOverride>, RepositoryError>;
    fn audit_log(&self, id: &ApplicationId) -> Result<Vec<AuditLogEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&application.id) {
            Some(existing) => {
                *existing = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn pipeline(&self, status: ApplicationStatus) -> Result<Vec<Application>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut matching: Vec<Application> = guard
            .values()
            .filter(|application| application.status == status)
            .cloned()
            .collect();
        matching.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(matching)
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    overrides: BTreeMap<ApplicationId, Vec<SectionOverride>>,
    audit_log: BTreeMap<ApplicationId, Vec<AuditLogEntry>>,
}

/// Both lists share one lock so an append is never half-visible.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOverrideRepository {
    state: Arc<Mutex<LedgerState>>,
}

impl OverrideRepository for InMemoryOverrideRepository {
    fn append(&self, entry: SectionOverride, audit: AuditLogEntry) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.state)?;
        guard
            .overrides
            .entry(entry.application_id.clone())
            .or_default()
            .push(entry);
        guard
            .audit_log
            .entry(audit.application_id.clone())
            .or_default()
            .push(audit);
        Ok(())
    }

    fn overrides(&self, id: &ApplicationId) -> Result<Vec<SectionOverride>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard.overrides.get(id).cloned().unwrap_or_default())
    }

    fn audit_log(&self, id: &ApplicationId) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        let guard = lock(&self.state)?;
        Ok(guard.audit_log.get(id).cloned().unwrap_or_default())
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub transaction_type: TransactionType,
    pub status: &'static str,
    pub completion_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_applicant: Option<String>,
}

impl From<&Application> for ApplicationStatusView {
    fn from(application: &Application) -> Self {
        Self {
            application_id: application.id.clone(),
            transaction_type: application.transaction_type.clone(),
            status: application.status.label(),
            completion_percentage: application.completion_percentage,
            primary_applicant: application.primary_applicant().map(|person| person.full_name()),
        }
    }
}
