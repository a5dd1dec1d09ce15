use flowgate_types::{Diagnostic, Fragment, Report};

/// Classification of one checker invocation's raw output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The buffer was valid JSON in the report shape.
    Parsed(Report),
    /// The buffer was not valid JSON (or not report-shaped).
    Malformed(String),
    /// The invocation itself failed; the buffer is the checker's error text.
    ProcessFailed(String),
}

/// Classify raw checker output. A process-level failure takes precedence
/// over parsing: whatever text the checker produced is then error text, not
/// a report.
pub fn classify_output(raw: &str, process_failed: bool) -> ParseOutcome {
    if process_failed {
        return ParseOutcome::ProcessFailed(raw.to_string());
    }

    match serde_json::from_str::<Report>(raw) {
        Ok(report) => ParseOutcome::Parsed(report),
        Err(_) => ParseOutcome::Malformed(raw.to_string()),
    }
}

/// Wrap checker-level failure text as a single-fragment fatal report.
///
/// Path, line, start and code are left at their empty/zero sentinels; the
/// description carries the raw text verbatim.
pub fn synthetic_fatal(text: &str) -> Report {
    Report {
        errors: vec![Diagnostic {
            messages: vec![Fragment {
                path: String::new(),
                line: 0,
                start: 0,
                descr: text.to_string(),
                code: 0,
            }],
        }],
    }
}
