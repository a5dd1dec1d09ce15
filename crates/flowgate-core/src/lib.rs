//! Core engine: per-file orchestration (invoke -> attribute -> report),
//! the run-scoped context, and the renderers.

mod check;
mod context;
mod pipeline;
mod render;

pub use check::{check_file, lint_records, FileCheck};
pub use context::{RunContext, RunOptions, RunSummary};
pub use pipeline::{
    has_pragma, process_file, sentinel_config_exists, FileDisposition, InputError,
    SENTINEL_CONFIG,
};
pub use render::{render_json, render_text, success_message};
