use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::board_package::audit::AuditLogEntry;
use crate::workflows::board_package::domain::{
    Application, ApplicationId, ApplicationSection, ApplicationStatus, Disclosure,
    DocumentCategory, DocumentRecord, DocumentStatus, FinancialCategory, FinancialEntry, Person,
    PersonRole, TransactionType,
};
use crate::workflows::board_package::overrides::SectionOverride;
use crate::workflows::board_package::repository::{
    ApplicationRepository, InMemoryApplicationRepository, InMemoryOverrideRepository,
    OverrideRepository, RepositoryError,
};
use crate::workflows::board_package::{
    board_package_router, BoardPackageService, CompletenessPolicy,
};

pub(super) fn section(key: &str, label: &str, is_complete: bool) -> ApplicationSection {
    ApplicationSection {
        key: key.to_string(),
        label: label.to_string(),
        is_complete,
    }
}

pub(super) fn application(id: &str, transaction_type: TransactionType) -> Application {
    let mut sections = vec![
        section("profile", "Profile", true),
        section("income", "Employment & Income", true),
        section("financials", "Financials", true),
        section("documents", "Documents", true),
        section("parties", "Deal Parties", false),
        section("cover-letter", "Cover Letter", false),
    ];
    if transaction_type.requires_disclosures() {
        sections.push(section("disclosures", "Disclosures", true));
        sections.push(section("lease-terms", "Lease Terms", false));
    } else {
        sections.push(section("real-estate", "Real Estate Owned", false));
    }

    Application {
        id: ApplicationId(id.to_string()),
        transaction_type,
        sections,
        people: vec![Person {
            role: PersonRole::Applicant,
            first_name: "Dana".to_string(),
            last_name: "Whitfield".to_string(),
            email: Some("dana@example.com".to_string()),
            phone: None,
            ssn: Some("123-45-6789".to_string()),
            ssn_last4: None,
            address_history: Vec::new(),
        }],
        employment_records: Vec::new(),
        financial_entries: vec![
            FinancialEntry {
                category: FinancialCategory::Asset,
                description: "Brokerage account".to_string(),
                amount: 420_000,
            },
            FinancialEntry {
                category: FinancialCategory::MonthlyIncome,
                description: "Salary".to_string(),
                amount: 18_500,
            },
        ],
        real_estate_properties: Vec::new(),
        documents: vec![DocumentRecord {
            name: "Passport".to_string(),
            category: DocumentCategory::GovernmentId,
            status: DocumentStatus::Verified,
        }],
        disclosures: vec![Disclosure {
            kind: "lead-paint".to_string(),
            acknowledged: true,
        }],
        participants: Vec::new(),
        status: ApplicationStatus::InProgress,
        completion_percentage: 0,
    }
}

pub(super) fn coop_purchase(id: &str) -> Application {
    application(id, TransactionType::CoopPurchase)
}

pub(super) fn condo_lease(id: &str) -> Application {
    application(id, TransactionType::CondoLease)
}

pub(super) fn with_incomplete(mut application: Application, key: &str) -> Application {
    for section in application.sections.iter_mut() {
        if section.key == key {
            section.is_complete = false;
        }
    }
    application
}

pub(super) fn timestamp(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn override_entry(
    application_id: &str,
    section_key: &str,
    reason: &str,
    at: DateTime<Utc>,
) -> SectionOverride {
    SectionOverride {
        application_id: ApplicationId(application_id.to_string()),
        section_key: section_key.to_string(),
        section_label: section_key.to_string(),
        overridden_by: "broker@harborline.example".to_string(),
        overridden_at: at,
        reason: reason.to_string(),
    }
}

pub(super) type MemoryService =
    BoardPackageService<InMemoryApplicationRepository, InMemoryOverrideRepository>;

pub(super) fn build_service_with_policy(
    policy: CompletenessPolicy,
) -> (
    MemoryService,
    Arc<InMemoryApplicationRepository>,
    Arc<InMemoryOverrideRepository>,
) {
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let overrides = Arc::new(InMemoryOverrideRepository::default());
    let service = BoardPackageService::new(applications.clone(), overrides.clone(), policy);
    (service, applications, overrides)
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<InMemoryApplicationRepository>,
    Arc<InMemoryOverrideRepository>,
) {
    build_service_with_policy(CompletenessPolicy::default())
}

pub(super) struct UnavailableOverrides;

impl OverrideRepository for UnavailableOverrides {
    fn append(
        &self,
        _entry: SectionOverride,
        _audit: AuditLogEntry,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn overrides(&self, _id: &ApplicationId) -> Result<Vec<SectionOverride>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn audit_log(&self, _id: &ApplicationId) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}

pub(super) struct UnavailableApplications;

impl ApplicationRepository for UnavailableApplications {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pipeline(&self, _status: ApplicationStatus) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    board_package_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
