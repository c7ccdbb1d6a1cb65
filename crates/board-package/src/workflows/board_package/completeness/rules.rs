use serde::{Deserialize, Serialize};

use super::super::domain::{Application, TransactionType};
use super::super::overrides::{active_override, SectionOverride};
use super::policy::CompletenessPolicy;
use super::SectionCompleteness;

/// Sections that gate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredSection {
    Profile,
    Income,
    Financials,
    Documents,
    Disclosures,
}

impl RequiredSection {
    pub const BASE: [Self; 4] = [
        Self::Profile,
        Self::Income,
        Self::Financials,
        Self::Documents,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Income => "income",
            Self::Financials => "financials",
            Self::Documents => "documents",
            Self::Disclosures => "disclosures",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Income => "Employment & Income",
            Self::Financials => "Financials",
            Self::Documents => "Documents",
            Self::Disclosures => "Disclosures",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "profile" => Some(Self::Profile),
            "income" => Some(Self::Income),
            "financials" => Some(Self::Financials),
            "documents" => Some(Self::Documents),
            "disclosures" => Some(Self::Disclosures),
            _ => None,
        }
    }

    /// Required set in canonical order; disclosures only gate leases and sublets.
    pub fn for_transaction(transaction_type: &TransactionType) -> Vec<Self> {
        let mut sections = Self::BASE.to_vec();
        if transaction_type.requires_disclosures() {
            sections.push(Self::Disclosures);
        }
        sections
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Complete,
    Overridden,
    Warning,
    Incomplete,
    Missing,
}

impl SectionStatus {
    pub const fn is_satisfied(self) -> bool {
        matches!(self, SectionStatus::Complete | SectionStatus::Overridden)
    }

    pub const fn allows_submission(self, policy: CompletenessPolicy) -> bool {
        match self {
            SectionStatus::Complete | SectionStatus::Overridden => true,
            SectionStatus::Warning => policy.allow_warning_sections,
            SectionStatus::Incomplete | SectionStatus::Missing => false,
        }
    }
}

pub(crate) fn assess_section(
    application: &Application,
    overrides: &[SectionOverride],
    required: RequiredSection,
) -> SectionCompleteness {
    let key = required.key();
    let entry = application.section(key);
    // Overrides only attach to sections the application actually carries.
    let overridden =
        entry.is_some() && active_override(overrides, &application.id, key).is_some();

    let status = match entry {
        None => SectionStatus::Missing,
        Some(section) if section.is_complete => SectionStatus::Complete,
        Some(_) if overridden => SectionStatus::Overridden,
        Some(_)
            if required == RequiredSection::Financials
                && application.financial_entries.is_empty() =>
        {
            SectionStatus::Warning
        }
        Some(_) => SectionStatus::Incomplete,
    };

    SectionCompleteness {
        key: key.to_string(),
        label: entry
            .map(|section| section.label.clone())
            .unwrap_or_else(|| required.label().to_string()),
        satisfied: status.is_satisfied(),
        overridden,
        status,
    }
}

/// Half-up rounding of `100 * completed / total` without floating point.
pub(crate) fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}
