//! Checker invocation: build the external checker's command line, launch
//! it, collect its output, and manage background-server lifecycle.
//!
//! The rest of the pipeline only depends on the shape of the result:
//! `CheckerOutput { success, raw }`.

mod invoke;
mod servers;

pub use invoke::{checker_bin, run_checker, run_checker_with, CheckerOptions, CheckerOutput, BIN_ENV};
pub use servers::{stop_servers, stop_servers_with, ServerRegistry, StopFailure, StopReport};
