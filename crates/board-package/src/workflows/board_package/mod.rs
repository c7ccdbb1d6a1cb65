//! Board-package completeness: section gating, manual overrides, and the audit trail.
//!
//! The evaluator is a pure function of the application aggregate and its override history;
//! storage sits behind the repository traits so the same rules back the applicant review
//! page, the broker submit flow, and the QA checklist.

pub mod audit;
pub mod completeness;
pub mod domain;
pub mod overrides;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use audit::{write_audit_csv, AuditAction, AuditLogEntry, SectionAuditStatus};
pub use completeness::{
    CompletenessEvaluator, CompletenessPolicy, CompletenessReport, ConfigurationError,
    RequiredSection, SectionCompleteness, SectionStatus,
};
pub use domain::{
    AddressRecord, Application, ApplicationId, ApplicationSection, ApplicationStatus,
    Disclosure, DocumentCategory, DocumentRecord, DocumentStatus, EmploymentRecord,
    FinancialCategory, FinancialEntry, FinancialTotals, Participant, ParticipantRole, Person,
    PersonRole, RealEstateProperty, TransactionType,
};
pub use overrides::{
    active_override, OverrideError, OverrideLedger, SectionOverride, ValidationError,
};
pub use repository::{
    ApplicationRepository, ApplicationStatusView, InMemoryApplicationRepository,
    InMemoryOverrideRepository, OverrideRepository, RepositoryError,
};
pub use router::board_package_router;
pub use service::{BoardPackageService, BoardPackageServiceError};
