use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for board-package applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of deal the board package supports.
///
/// Values written by external collaborators are kept verbatim when they do not match a known
/// transaction so the evaluator can reject them explicitly instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    CoopPurchase,
    CondoPurchase,
    CoopSublet,
    CondoLease,
    Unrecognized(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::CoopPurchase => "COOP_PURCHASE",
            TransactionType::CondoPurchase => "CONDO_PURCHASE",
            TransactionType::CoopSublet => "COOP_SUBLET",
            TransactionType::CondoLease => "CONDO_LEASE",
            TransactionType::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, TransactionType::Unrecognized(_))
    }

    /// Lease and sublet packages carry building disclosures the applicant must acknowledge.
    pub fn requires_disclosures(&self) -> bool {
        matches!(
            self,
            TransactionType::CoopSublet | TransactionType::CondoLease
        )
    }
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        match value.trim() {
            "COOP_PURCHASE" => TransactionType::CoopPurchase,
            "CONDO_PURCHASE" => TransactionType::CondoPurchase,
            "COOP_SUBLET" => TransactionType::CoopSublet,
            "CONDO_LEASE" => TransactionType::CondoLease,
            _ => TransactionType::Unrecognized(value),
        }
    }
}

impl From<&str> for TransactionType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Unrecognized(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical step of the application that is independently complete or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSection {
    pub key: String,
    pub label: String,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonRole {
    Applicant,
    CoApplicant,
    Guarantor,
    Occupant,
}

/// Prior or current residence captured for the address history section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Individual named on the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub role: PersonRole,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(default)]
    pub ssn_last4: Option<String>,
    #[serde(default)]
    pub address_history: Vec<AddressRecord>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Only the last four digits ever leave the record.
    pub fn masked_ssn(&self) -> Option<String> {
        let last4 = match (&self.ssn_last4, &self.ssn) {
            (Some(last4), _) => last4.clone(),
            (None, Some(full)) => {
                let digits: Vec<char> = full.chars().filter(char::is_ascii_digit).collect();
                if digits.len() < 4 {
                    return None;
                }
                digits[digits.len() - 4..].iter().collect()
            }
            (None, None) => return None,
        };
        Some(format!("***-**-{last4}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    pub employer: String,
    pub title: String,
    pub annual_income: u64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialCategory {
    Asset,
    Liability,
    MonthlyIncome,
    MonthlyExpense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialEntry {
    pub category: FinancialCategory,
    pub description: String,
    pub amount: u64,
}

/// Other real estate the applicant owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealEstateProperty {
    pub address: String,
    pub market_value: u64,
    pub mortgage_balance: u64,
    pub monthly_carrying_cost: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    GovernmentId,
    BankStatement,
    TaxReturn,
    PayStub,
    EmploymentLetter,
    ReferenceLetter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Verified,
    Rejected,
}

/// Metadata for an uploaded document; the file itself lives in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    pub category: DocumentCategory,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    pub kind: String,
    pub acknowledged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    ListingBroker,
    BuyerBroker,
    TransactionAgent,
    ManagingAgent,
    Attorney,
}

/// Deal party attached to the package (brokers, agents, counsel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub role: ParticipantRole,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Lifecycle of a board package from the applicant draft to the board decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    InProgress,
    Submitted,
    InReview,
    Rfi,
    Approved,
    Conditional,
    Denied,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::InReview => "in_review",
            ApplicationStatus::Rfi => "rfi",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Conditional => "conditional",
            ApplicationStatus::Denied => "denied",
        }
    }

    /// Drafts and packages returned with an RFI are the only ones a broker can (re)submit.
    pub const fn accepts_submission(self) -> bool {
        matches!(self, ApplicationStatus::InProgress | ApplicationStatus::Rfi)
    }
}

/// Board-package aggregate as persisted by the intake forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub transaction_type: TransactionType,
    pub sections: Vec<ApplicationSection>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub employment_records: Vec<EmploymentRecord>,
    #[serde(default)]
    pub financial_entries: Vec<FinancialEntry>,
    #[serde(default)]
    pub real_estate_properties: Vec<RealEstateProperty>,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default)]
    pub disclosures: Vec<Disclosure>,
    #[serde(default)]
    pub participants: Vec<Participant>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub completion_percentage: u8,
}

impl Application {
    pub fn section(&self, key: &str) -> Option<&ApplicationSection> {
        self.sections.iter().find(|section| section.key == key)
    }

    pub fn primary_applicant(&self) -> Option<&Person> {
        self.people
            .iter()
            .find(|person| person.role == PersonRole::Applicant)
    }

    pub fn financial_totals(&self) -> FinancialTotals {
        self.financial_entries
            .iter()
            .fold(FinancialTotals::default(), |mut totals, entry| {
                let bucket = match entry.category {
                    FinancialCategory::Asset => &mut totals.assets,
                    FinancialCategory::Liability => &mut totals.liabilities,
                    FinancialCategory::MonthlyIncome => &mut totals.monthly_income,
                    FinancialCategory::MonthlyExpense => &mut totals.monthly_expenses,
                };
                *bucket = bucket.saturating_add(entry.amount);
                totals
            })
    }
}

/// Sums of the financial statement grouped by category, saturating at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FinancialTotals {
    pub assets: u64,
    pub liabilities: u64,
    pub monthly_income: u64,
    pub monthly_expenses: u64,
}

impl FinancialTotals {
    pub fn net_worth(&self) -> i128 {
        self.assets as i128 - self.liabilities as i128
    }
}
