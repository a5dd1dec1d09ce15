use flowgate_types::{Diagnostic, Report};

use crate::parse::{classify_output, synthetic_fatal, ParseOutcome};
use crate::relevance::fragment_relevant;

/// The file-scoped result of one checker invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The checker ran and no diagnostic survived filtering for this file.
    Clean,
    /// One or more diagnostics were attributed to this file.
    Findings(Report),
    /// Checker-level failure: the process failed or its output was not
    /// parseable. The report is synthetic and fatal.
    Fatal(Report),
}

impl CheckOutcome {
    pub fn report(&self) -> Option<&Report> {
        match self {
            CheckOutcome::Clean => None,
            CheckOutcome::Findings(report) | CheckOutcome::Fatal(report) => Some(report),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Clean)
    }
}

/// Filter a report down to the diagnostics and fragments relevant to
/// `target`. Fragment order is preserved; diagnostics left with zero
/// fragments are dropped.
pub fn attribute(report: &Report, target: &str) -> Report {
    let errors = report
        .errors
        .iter()
        .filter_map(|diag| {
            let messages: Vec<_> = diag
                .messages
                .iter()
                .enumerate()
                .filter(|(i, _)| fragment_relevant(&diag.messages, *i, target))
                .map(|(_, f)| f.clone())
                .collect();

            if messages.is_empty() {
                None
            } else {
                Some(Diagnostic { messages })
            }
        })
        .collect();

    Report { errors }
}

/// Report compaction: a fragment with no location of its own (empty path,
/// line 0) continues the previous fragment's point, so its text is folded
/// into that fragment's description. A leading location-less fragment has
/// nothing to fold into and is kept as-is.
///
/// This is output formatting, not relevance filtering.
pub fn collapse_continuations(report: Report) -> Report {
    let errors = report
        .errors
        .into_iter()
        .map(|diag| {
            let mut messages: Vec<flowgate_types::Fragment> =
                Vec::with_capacity(diag.messages.len());

            for frag in diag.messages {
                if frag.path.is_empty() && frag.line == 0 {
                    if let Some(prev) = messages.last_mut() {
                        prev.descr.push('\n');
                        prev.descr.push_str(&frag.descr);
                        continue;
                    }
                }
                messages.push(frag);
            }

            Diagnostic { messages }
        })
        .collect();

    Report { errors }
}

/// The full engine: classify the raw buffer, then scope it to `target`.
///
/// Pure function of its arguments; all I/O belongs to the caller.
pub fn check_output(
    raw: &str,
    target: &str,
    process_failed: bool,
    collapse: bool,
) -> CheckOutcome {
    match classify_output(raw, process_failed) {
        ParseOutcome::Parsed(report) => {
            let mut filtered = attribute(&report, target);
            if collapse {
                filtered = collapse_continuations(filtered);
            }

            if filtered.is_empty() {
                CheckOutcome::Clean
            } else {
                CheckOutcome::Findings(filtered)
            }
        }
        ParseOutcome::Malformed(text) | ParseOutcome::ProcessFailed(text) => {
            CheckOutcome::Fatal(synthetic_fatal(&text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgate_types::Fragment;

    const TARGET: &str = "/a/b.js";

    fn frag(path: &str, descr: &str) -> Fragment {
        Fragment {
            path: path.to_string(),
            descr: descr.to_string(),
            ..Fragment::default()
        }
    }

    fn report(diags: Vec<Vec<Fragment>>) -> Report {
        Report {
            errors: diags
                .into_iter()
                .map(|messages| Diagnostic { messages })
                .collect(),
        }
    }

    #[test]
    fn foreign_diagnostics_are_dropped() {
        let input = report(vec![vec![
            frag("/c/d.js", "number"),
            frag("/e/f.js", "string"),
        ]]);

        assert!(attribute(&input, TARGET).is_empty());
    }

    #[test]
    fn target_fragments_survive() {
        let input = report(vec![
            vec![frag(TARGET, "number"), frag("/c/d.js", "string")],
            vec![frag("/c/d.js", "boolean")],
        ]);

        let filtered = attribute(&input, TARGET);
        assert_eq!(filtered.errors.len(), 1);
        assert_eq!(filtered.errors[0].messages.len(), 1);
        assert_eq!(filtered.errors[0].messages[0].path, TARGET);
    }

    #[test]
    fn connective_propagates_to_following_fragment() {
        let input = report(vec![vec![frag(TARGET, "X found"), frag("", "Y")]]);

        let filtered = attribute(&input, TARGET);
        assert_eq!(filtered.errors[0].messages.len(), 2);
        assert_eq!(filtered.errors[0].messages[1].descr, "Y");
    }

    #[test]
    fn connective_borrows_from_following_target_fragment() {
        let input = report(vec![vec![
            frag("/lib/defs.js", "This type is incompatible with"),
            frag(TARGET, "number"),
            frag("/c/d.js", "unrelated"),
        ]]);

        let filtered = attribute(&input, TARGET);
        let descrs: Vec<_> = filtered.errors[0]
            .messages
            .iter()
            .map(|f| f.descr.as_str())
            .collect();
        assert_eq!(descrs, ["This type is incompatible with", "number"]);
    }

    #[test]
    fn fatal_fragment_keeps_its_diagnostic_for_any_target() {
        let input = report(vec![vec![frag("", "Fatal: crashed")]]);

        let filtered = attribute(&input, "/nothing/matches.js");
        assert_eq!(filtered.errors.len(), 1);
        assert_eq!(filtered.errors[0].messages[0].descr, "Fatal: crashed");
    }

    #[test]
    fn surviving_diagnostics_keep_order() {
        let input = report(vec![
            vec![frag(TARGET, "first")],
            vec![frag("/c/d.js", "dropped")],
            vec![frag(TARGET, "second")],
        ]);

        let filtered = attribute(&input, TARGET);
        assert_eq!(filtered.errors.len(), 2);
        assert_eq!(filtered.errors[0].messages[0].descr, "first");
        assert_eq!(filtered.errors[1].messages[0].descr, "second");
    }

    #[test]
    fn collapse_folds_locationless_fragment_into_predecessor() {
        let input = report(vec![vec![
            frag(TARGET, "X found"),
            Fragment {
                descr: "continuation".to_string(),
                ..Fragment::default()
            },
        ]]);

        let collapsed = collapse_continuations(input);
        assert_eq!(collapsed.errors[0].messages.len(), 1);
        assert_eq!(collapsed.errors[0].messages[0].descr, "X found\ncontinuation");
    }

    #[test]
    fn collapse_keeps_leading_locationless_fragment() {
        let input = report(vec![vec![frag("", "Fatal: crashed")]]);

        let collapsed = collapse_continuations(input);
        assert_eq!(collapsed.errors[0].messages.len(), 1);
        assert_eq!(collapsed.errors[0].messages[0].descr, "Fatal: crashed");
    }

    #[test]
    fn collapse_does_not_touch_located_fragments() {
        let located = Fragment {
            path: String::new(),
            line: 4,
            descr: "has a line, keeps it".to_string(),
            ..Fragment::default()
        };
        let input = report(vec![vec![frag(TARGET, "head"), located.clone()]]);

        let collapsed = collapse_continuations(input);
        assert_eq!(collapsed.errors[0].messages.len(), 2);
        assert_eq!(collapsed.errors[0].messages[1], located);
    }

    #[test]
    fn check_output_clean_on_empty_report() {
        let outcome = check_output(r#"{"errors":[]}"#, TARGET, false, false);
        assert_eq!(outcome, CheckOutcome::Clean);
        assert!(outcome.passed());
    }

    #[test]
    fn check_output_clean_when_nothing_attributes() {
        let raw = r#"{"errors":[{"message":[{"path":"/c/d.js","line":1,"start":1,"descr":"number"}]}]}"#;
        assert_eq!(check_output(raw, TARGET, false, false), CheckOutcome::Clean);
    }

    #[test]
    fn check_output_findings_for_target() {
        let raw = r#"{"errors":[{"message":[{"path":"/a/b.js","line":1,"start":1,"descr":"type error"}]}]}"#;
        match check_output(raw, TARGET, false, false) {
            CheckOutcome::Findings(report) => {
                assert_eq!(report.errors.len(), 1);
                assert_eq!(report.errors[0].messages.len(), 1);
            }
            other => panic!("expected Findings, got {other:?}"),
        }
    }

    #[test]
    fn check_output_fatal_on_malformed() {
        match check_output("not json", TARGET, false, false) {
            CheckOutcome::Fatal(report) => {
                assert_eq!(report.errors.len(), 1);
                assert_eq!(report.errors[0].messages.len(), 1);
                assert_eq!(report.errors[0].messages[0].descr, "not json");
            }
            other => panic!("expected Fatal, got {other:?}"),
        }
    }

    #[test]
    fn check_output_fatal_on_process_failure() {
        let stderr = "Could not find a .flowconfig";
        match check_output(stderr, TARGET, true, false) {
            CheckOutcome::Fatal(report) => {
                assert_eq!(report.errors[0].messages[0].descr, stderr);
            }
            other => panic!("expected Fatal, got {other:?}"),
        }
    }

    #[test]
    fn attribution_is_idempotent() {
        let input = report(vec![
            vec![
                frag(TARGET, "property not found"),
                frag("", "in object literal"),
                frag("/c/d.js", "unrelated"),
            ],
            vec![frag("", "Fatal: crashed")],
            vec![frag("/c/d.js", "dropped entirely")],
        ]);

        let once = attribute(&input, TARGET);
        let twice = attribute(&once, TARGET);
        assert_eq!(once, twice);
    }
}
