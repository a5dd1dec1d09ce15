use flowgate_types::{LintRecord, Report, Severity};

/// Render lint records as a stylish-flavoured console report: records
/// grouped under their file, one `line:character  severity  reason` row
/// each, with a problem-count trailer.
pub fn render_text(records: &[LintRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let mut current_file: Option<&str> = None;
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for record in records {
        if current_file != Some(record.file.as_str()) {
            if current_file.is_some() {
                out.push('\n');
            }
            let heading = if record.file.is_empty() {
                "(checker)"
            } else {
                record.file.as_str()
            };
            out.push_str(heading);
            out.push('\n');
            current_file = Some(&record.file);
        }

        match record.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
        }

        let mut lines = record.reason.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!(
            "  {}:{}  {}  {}\n",
            record.line,
            record.character,
            record.severity.as_str(),
            first
        ));
        for continuation in lines {
            out.push_str(&format!("      {continuation}\n"));
        }
    }

    let total = errors + warnings;
    out.push_str(&format!(
        "\n\u{2716} {} problem{} ({} error{}, {} warning{})\n",
        total,
        plural(total),
        errors,
        plural(errors),
        warnings,
        plural(warnings)
    ));

    out
}

/// Render the filtered report as pretty-printed JSON.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn success_message() -> String {
    "\u{2714} flowgate has found 0 errors".to_string()
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
