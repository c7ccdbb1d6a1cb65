use board_package::error::AppError;
use board_package::workflows::board_package::{
    Application, ApplicationId, ApplicationSection, ApplicationStatus, Disclosure,
    DocumentCategory, DocumentRecord, DocumentStatus, FinancialCategory, FinancialEntry,
    Participant, ParticipantRole, Person, PersonRole, TransactionType,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn section(key: &str, label: &str, is_complete: bool) -> ApplicationSection {
    ApplicationSection {
        key: key.to_string(),
        label: label.to_string(),
        is_complete,
    }
}

fn applicant(first_name: &str, last_name: &str, ssn_last4: &str) -> Person {
    Person {
        role: PersonRole::Applicant,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: Some(format!(
            "{}.{}@example.com",
            first_name.to_ascii_lowercase(),
            last_name.to_ascii_lowercase()
        )),
        phone: None,
        ssn: None,
        ssn_last4: Some(ssn_last4.to_string()),
        address_history: Vec::new(),
    }
}

fn listing_broker() -> Participant {
    Participant {
        role: ParticipantRole::ListingBroker,
        name: "Harborline Realty".to_string(),
        email: Some("listings@harborline.example".to_string()),
    }
}

/// Co-op purchase still waiting on its document checklist.
pub(crate) fn sample_coop_purchase() -> Application {
    Application {
        id: ApplicationId("bp-1001".to_string()),
        transaction_type: TransactionType::CoopPurchase,
        sections: vec![
            section("profile", "Profile", true),
            section("parties", "Deal Parties", true),
            section("income", "Employment & Income", true),
            section("financials", "Financials", true),
            section("real-estate", "Real Estate Owned", true),
            section("documents", "Documents", false),
            section("cover-letter", "Cover Letter", false),
            section("review", "Review & Submit", false),
        ],
        people: vec![applicant("Avery", "Lindqvist", "4821")],
        employment_records: Vec::new(),
        financial_entries: vec![
            FinancialEntry {
                category: FinancialCategory::Asset,
                description: "Retirement account".to_string(),
                amount: 640_000,
            },
            FinancialEntry {
                category: FinancialCategory::Liability,
                description: "Student loan".to_string(),
                amount: 22_000,
            },
            FinancialEntry {
                category: FinancialCategory::MonthlyIncome,
                description: "Salary".to_string(),
                amount: 21_000,
            },
        ],
        real_estate_properties: Vec::new(),
        documents: vec![
            DocumentRecord {
                name: "Driver license".to_string(),
                category: DocumentCategory::GovernmentId,
                status: DocumentStatus::Verified,
            },
            DocumentRecord {
                name: "2024 tax return".to_string(),
                category: DocumentCategory::TaxReturn,
                status: DocumentStatus::Pending,
            },
        ],
        disclosures: Vec::new(),
        participants: vec![listing_broker()],
        status: ApplicationStatus::InProgress,
        completion_percentage: 0,
    }
}

/// Condo lease whose disclosures have not been acknowledged yet.
pub(crate) fn sample_condo_lease() -> Application {
    Application {
        id: ApplicationId("bp-2002".to_string()),
        transaction_type: TransactionType::CondoLease,
        sections: vec![
            section("profile", "Profile", true),
            section("income", "Employment & Income", true),
            section("financials", "Financials", false),
            section("documents", "Documents", true),
            section("lease-terms", "Lease Terms", true),
            section("building-policies", "Building Policies", true),
            section("disclosures", "Disclosures", false),
        ],
        people: vec![applicant("Rui", "Okafor", "1177")],
        employment_records: Vec::new(),
        financial_entries: Vec::new(),
        real_estate_properties: Vec::new(),
        documents: Vec::new(),
        disclosures: vec![Disclosure {
            kind: "window-guard".to_string(),
            acknowledged: false,
        }],
        participants: vec![listing_broker()],
        status: ApplicationStatus::InProgress,
        completion_percentage: 0,
    }
}

pub(crate) fn sample_applications() -> Vec<Application> {
    vec![sample_coop_purchase(), sample_condo_lease()]
}
