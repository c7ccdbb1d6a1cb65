use std::sync::Arc;

use super::common::*;
use crate::workflows::board_package::audit::{
    write_audit_csv, AuditAction, AuditLogEntry, SectionAuditStatus,
};
use crate::workflows::board_package::domain::ApplicationId;
use crate::workflows::board_package::overrides::{
    active_override, OverrideError, OverrideLedger, ValidationError,
};
use crate::workflows::board_package::repository::{
    InMemoryOverrideRepository, OverrideRepository, RepositoryError,
};

fn ledger() -> (
    OverrideLedger<InMemoryOverrideRepository>,
    Arc<InMemoryOverrideRepository>,
) {
    let repository = Arc::new(InMemoryOverrideRepository::default());
    (OverrideLedger::new(repository.clone()), repository)
}

fn app_id(raw: &str) -> ApplicationId {
    ApplicationId(raw.to_string())
}

#[test]
fn record_override_appends_entry_and_audit_trail() {
    let (ledger, _) = ledger();
    let id = app_id("app-c");

    let entry = ledger
        .record_override(
            &id,
            "documents",
            "Documents",
            "agent@harborline.example",
            "Verified via email",
        )
        .expect("override recorded");

    assert_eq!(entry.section_key, "documents");
    assert_eq!(entry.section_label, "Documents");
    assert_eq!(entry.reason, "Verified via email");

    let listed = ledger.list_overrides(&id).expect("list succeeds");
    assert_eq!(listed, vec![entry.clone()]);

    let audit = ledger.audit_log(&id).expect("audit succeeds");
    assert_eq!(
        audit,
        vec![AuditLogEntry {
            action: AuditAction::ManualOverride,
            section: "documents".to_string(),
            application_id: id.clone(),
            performed_by: "agent@harborline.example".to_string(),
            timestamp: entry.overridden_at,
            reason: "Verified via email".to_string(),
            previous_status: SectionAuditStatus::Incomplete,
            new_status: SectionAuditStatus::CompleteOverride,
        }]
    );
}

#[test]
fn empty_reason_is_rejected_without_writing() {
    let (ledger, repository) = ledger();
    let id = app_id("app-e");

    for reason in ["", "   ", "\t\n"] {
        let before = ledger.list_overrides(&id).expect("list succeeds").len();
        match ledger.record_override(&id, "documents", "Documents", "agent", reason) {
            Err(OverrideError::Validation(ValidationError::EmptyReason)) => {}
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(ledger.list_overrides(&id).expect("list succeeds").len(), before);
    }

    assert!(ledger
        .get_active_override(&id, "documents")
        .expect("lookup succeeds")
        .is_none());
    assert!(repository.audit_log(&id).expect("audit succeeds").is_empty());
}

#[test]
fn reason_is_stored_trimmed() {
    let (ledger, _) = ledger();
    let entry = ledger
        .record_override(
            &app_id("app-trim"),
            "income",
            "Employment & Income",
            "broker",
            "  Offer letter reviewed \n",
        )
        .expect("override recorded");

    assert_eq!(entry.reason, "Offer letter reviewed");
}

#[test]
fn active_override_persists_across_other_sections() {
    let (ledger, _) = ledger();
    let id = app_id("app-mono");

    ledger
        .record_override(&id, "documents", "Documents", "broker", "Bank letter substitutes")
        .expect("override recorded");
    for key in ["income", "financials", "profile"] {
        ledger
            .record_override(&id, key, key, "broker", "Reviewed in person")
            .expect("override recorded");
        let active = ledger
            .get_active_override(&id, "documents")
            .expect("lookup succeeds")
            .expect("documents override still active");
        assert_eq!(active.reason, "Bank letter substitutes");
    }
}

#[test]
fn latest_override_for_a_section_is_active() {
    let (ledger, _) = ledger();
    let id = app_id("app-latest");

    ledger
        .record_override(&id, "documents", "Documents", "broker", "First pass")
        .expect("override recorded");
    ledger
        .record_override(&id, "documents", "Documents", "agent", "Second look")
        .expect("override recorded");

    let active = ledger
        .get_active_override(&id, "documents")
        .expect("lookup succeeds")
        .expect("override present");
    assert_eq!(active.reason, "Second look");
    assert_eq!(ledger.list_overrides(&id).expect("list succeeds").len(), 2);
    assert_eq!(ledger.audit_log(&id).expect("audit succeeds").len(), 2);
}

#[test]
fn list_overrides_is_ordered_by_timestamp() {
    let (ledger, repository) = ledger();
    let id = app_id("app-order");
    let late = override_entry("app-order", "income", "late", timestamp(30));
    let early = override_entry("app-order", "documents", "early", timestamp(10));

    for entry in [late.clone(), early.clone()] {
        let audit = AuditLogEntry {
            action: AuditAction::ManualOverride,
            section: entry.section_key.clone(),
            application_id: entry.application_id.clone(),
            performed_by: entry.overridden_by.clone(),
            timestamp: entry.overridden_at,
            reason: entry.reason.clone(),
            previous_status: SectionAuditStatus::Incomplete,
            new_status: SectionAuditStatus::CompleteOverride,
        };
        repository.append(entry, audit).expect("append succeeds");
    }

    let listed = ledger.list_overrides(&id).expect("list succeeds");
    assert_eq!(listed, vec![early, late]);
    let audit = ledger.audit_log(&id).expect("audit succeeds");
    assert_eq!(audit[0].reason, "early");
}

#[test]
fn active_override_prefers_latest_timestamp_then_append_order() {
    let overrides = vec![
        override_entry("app-1", "documents", "newest", timestamp(40)),
        override_entry("app-1", "documents", "older", timestamp(20)),
        override_entry("app-1", "documents", "same minute, appended later", timestamp(40)),
        override_entry("app-2", "documents", "other application", timestamp(50)),
    ];

    let active = active_override(&overrides, &app_id("app-1"), "documents").expect("found");
    assert_eq!(active.reason, "same minute, appended later");
    assert!(active_override(&overrides, &app_id("app-1"), "income").is_none());
}

#[test]
fn repository_failures_surface_as_errors() {
    let ledger = OverrideLedger::new(Arc::new(UnavailableOverrides));
    let id = app_id("app-down");

    match ledger.record_override(&id, "documents", "Documents", "broker", "Verified") {
        Err(OverrideError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
    assert!(matches!(
        ledger.get_active_override(&id, "documents"),
        Err(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn audit_log_exports_as_csv() {
    let (ledger, _) = ledger();
    let id = app_id("app-csv");
    ledger
        .record_override(&id, "documents", "Documents", "agent", "Verified via email")
        .expect("override recorded");
    let entries = ledger.audit_log(&id).expect("audit succeeds");

    let mut buffer = Vec::new();
    write_audit_csv(&entries, &mut buffer).expect("csv written");
    let rendered = String::from_utf8(buffer).expect("utf8");
    let mut lines = rendered.lines();

    assert_eq!(
        lines.next(),
        Some(
            "action,section,application_id,performed_by,timestamp,reason,previous_status,new_status"
        )
    );
    let row = lines.next().expect("data row");
    assert!(row.starts_with("MANUAL_OVERRIDE,documents,app-csv,agent,"));
    assert!(row.ends_with(",Verified via email,incomplete,complete_override"));
    assert!(lines.next().is_none());
}
