use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::ApplicationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ManualOverride,
}

/// Section state recorded on either side of an audited change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionAuditStatus {
    Incomplete,
    CompleteOverride,
}

/// Compliance trail entry, written alongside every manual override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub action: AuditAction,
    pub section: String,
    pub application_id: ApplicationId,
    pub performed_by: String,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
    pub previous_status: SectionAuditStatus,
    pub new_status: SectionAuditStatus,
}

/// Export audit entries as CSV for compliance review.
pub fn write_audit_csv<W: Write>(entries: &[AuditLogEntry], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in entries {
        csv_writer.serialize(entry)?;
    }
    csv_writer.flush()?;
    Ok(())
}
