use std::path::Path;

use tracing::debug;

use flowgate_attribution::{check_output, CheckOutcome};
use flowgate_checker::run_checker_with;
use flowgate_types::{LintRecord, Report, Severity};

use crate::context::RunContext;

/// Result of checking one file: the attributed outcome plus its
/// renderer-facing projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub outcome: CheckOutcome,
    pub records: Vec<LintRecord>,
}

/// Invoke the checker for `target`, scope its output to the file, and fold
/// the verdict into the run context.
pub fn check_file(ctx: &mut RunContext, target: &Path) -> FileCheck {
    let output = run_checker_with(
        &ctx.checker_bin(),
        target,
        &ctx.checker_options(),
        &mut ctx.servers,
    );

    let target_str = target.to_string_lossy();
    let outcome = check_output(
        &output.raw,
        &target_str,
        !output.success,
        ctx.options.collapse,
    );

    if !outcome.passed() {
        ctx.passed = false;
    }
    debug!(target = %target.display(), passed = outcome.passed(), "checked file");

    let records = outcome.report().map(lint_records).unwrap_or_default();
    FileCheck { outcome, records }
}

/// Project every fragment of a filtered report into lint records. A
/// nonzero `code` marks a warning; everything else is an error.
pub fn lint_records(report: &Report) -> Vec<LintRecord> {
    report
        .errors
        .iter()
        .flat_map(|diag| diag.messages.iter())
        .map(|frag| LintRecord {
            file: frag.path.clone(),
            line: frag.line,
            character: frag.start,
            severity: if frag.code != 0 {
                Severity::Warning
            } else {
                Severity::Error
            },
            reason: frag.descr.clone(),
        })
        .collect()
}
