use crate::infra::{read_json_file, sample_condo_lease, sample_coop_purchase};
use board_package::error::AppError;
use board_package::workflows::board_package::{
    write_audit_csv, Application, BoardPackageService, BoardPackageServiceError,
    CompletenessEvaluator, CompletenessPolicy, CompletenessReport, InMemoryApplicationRepository,
    InMemoryOverrideRepository, SectionOverride, SectionStatus,
};
use chrono::SecondsFormat;
use clap::Args;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to an application aggregate exported as JSON
    #[arg(long)]
    pub(crate) application: PathBuf,
    /// Optional JSON array of recorded section overrides
    #[arg(long)]
    pub(crate) overrides: Option<PathBuf>,
    /// Treat warning sections (financials without entries) as submit-eligible
    #[arg(long)]
    pub(crate) allow_warning_sections: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the demo audit log to this CSV file
    #[arg(long)]
    pub(crate) audit_csv: Option<PathBuf>,
    /// Treat warning sections (financials without entries) as submit-eligible
    #[arg(long)]
    pub(crate) allow_warning_sections: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let application: Application = read_json_file(&args.application)?;
    let overrides: Vec<SectionOverride> = match &args.overrides {
        Some(path) => read_json_file(path)?,
        None => Vec::new(),
    };

    let evaluator = CompletenessEvaluator::new(CompletenessPolicy {
        allow_warning_sections: args.allow_warning_sections,
    });
    let report = evaluator.evaluate(&application, &overrides)?;
    render_report(&application, &report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = CompletenessPolicy {
        allow_warning_sections: args.allow_warning_sections,
    };
    let service = BoardPackageService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryOverrideRepository::default()),
        policy,
    );

    println!("Board package completeness demo");

    let purchase = service.register(sample_coop_purchase())?;
    let lease = service.register(sample_condo_lease())?;

    for application in [&purchase, &lease] {
        let report = service.completeness(&application.id)?;
        render_report(application, &report);
    }

    println!("\nAttempting to submit {} as-is", purchase.id);
    match service.submit(&purchase.id) {
        Err(BoardPackageServiceError::SubmissionBlocked {
            blocking,
            completion_percentage,
        }) => println!(
            "- blocked at {}%: waiting on {}",
            completion_percentage,
            blocking.join(", ")
        ),
        Err(other) => return Err(other.into()),
        Ok(_) => println!("- submitted"),
    }

    println!("\nRecording a documents override without a reason");
    match service.record_override(&purchase.id, "documents", "broker@harborline.example", " ") {
        Err(BoardPackageServiceError::Validation(err)) => println!("- rejected: {err}"),
        Err(other) => return Err(other.into()),
        Ok(_) => println!("- unexpectedly accepted"),
    }

    let entry = service.record_override(
        &purchase.id,
        "documents",
        "broker@harborline.example",
        "Tax return verified by phone with the preparer",
    )?;
    println!(
        "- override recorded for {} by {} at {}",
        entry.section_label,
        entry.overridden_by,
        entry.overridden_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    let submitted = service.submit(&purchase.id)?;
    println!(
        "- {} is now {} at {}%",
        submitted.id,
        submitted.status.label(),
        submitted.completion_percentage
    );

    let audit = service.audit_log(&purchase.id)?;
    println!("\nAudit log for {}", purchase.id);
    for entry in &audit {
        println!(
            "- {:?} {} by {} ({:?} -> {:?}): {}",
            entry.action,
            entry.section,
            entry.performed_by,
            entry.previous_status,
            entry.new_status,
            entry.reason
        );
    }

    if let Some(path) = args.audit_csv {
        let file = File::create(&path)?;
        write_audit_csv(&audit, file)?;
        println!("Audit log written to {}", path.display());
    }

    Ok(())
}

fn status_marker(status: SectionStatus) -> &'static str {
    match status {
        SectionStatus::Complete => "[x]",
        SectionStatus::Overridden => "[o]",
        SectionStatus::Warning => "[!]",
        SectionStatus::Incomplete => "[ ]",
        SectionStatus::Missing => "[-]",
    }
}

pub(crate) fn render_report(application: &Application, report: &CompletenessReport) {
    println!(
        "\n{} ({}) - {}/{} sections, {}% complete",
        report.application_id,
        report.transaction_type,
        report.completed_count,
        report.total_count,
        report.completion_percentage
    );
    if let Some(person) = application.primary_applicant() {
        let ssn = person.masked_ssn().unwrap_or_else(|| "not provided".to_string());
        println!("Applicant: {} (SSN {})", person.full_name(), ssn);
    }
    let totals = application.financial_totals();
    println!(
        "Financials: net worth {} | monthly income {} | monthly expenses {}",
        totals.net_worth(),
        totals.monthly_income,
        totals.monthly_expenses
    );
    for section in &report.per_section {
        println!(
            "  {} {} ({})",
            status_marker(section.status),
            section.label,
            section.key
        );
    }
    if report.can_submit {
        println!("Ready to submit");
    } else {
        println!("Blocked by: {}", report.blocking_sections().join(", "));
    }
}
