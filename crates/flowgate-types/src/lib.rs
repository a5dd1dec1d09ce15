//! Data types (checker wire format + config) for flowgate.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.
//! The attribution semantics live in `flowgate-attribution`.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One location+text unit within a diagnostic.
///
/// Every field is optional on the wire; absent fields decode to the empty
/// string / zero. An empty `path` means "continuation of the previous
/// fragment's file".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Fragment {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub line: u32,

    /// Character offset within the line. Some checker revisions emit this
    /// under `column`; both spellings decode into the same field.
    #[serde(default, alias = "column")]
    pub start: u32,

    #[serde(default)]
    pub descr: String,

    /// Nonzero marks the fragment as a warning rather than an error.
    #[serde(default)]
    pub code: u32,
}

/// One logical problem found by the checker.
///
/// Fragment order is significant: it encodes a causal chain
/// ("value used here" -> "incompatible with type defined here").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    #[serde(rename = "message")]
    pub messages: Vec<Fragment>,
}

/// The checker's diagnostic report, parsed from its JSON output.
///
/// Unknown wire fields (the checker also emits `passed`, version metadata,
/// etc.) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Report {
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Renderer-facing projection of one surviving fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LintRecord {
    pub file: String,
    pub line: u32,
    pub character: u32,
    pub severity: Severity,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Reporter {
    #[default]
    Text,
    Json,
}

/// The on-disk configuration file (`flowgate.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Defaults for options that can also be given on the command line.
/// CLI flags win over config values; unset values fall back to built-ins
/// at the resolution site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weak: Option<bool>,

    /// Additional library/declaration search path passed to the checker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declarations: Option<PathBuf>,

    /// Terminate background checker servers at run end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kill: Option<bool>,

    /// Stop the pipeline on the first failing file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort: Option<bool>,

    /// Audible notification on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beep: Option<bool>,

    /// Fold location-less continuation fragments into their predecessor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<Reporter>,
}
