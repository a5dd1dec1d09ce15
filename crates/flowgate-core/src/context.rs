use std::path::PathBuf;

use flowgate_checker::{checker_bin, stop_servers_with, CheckerOptions, ServerRegistry, StopReport};
use flowgate_types::Reporter;

/// Resolved options for one run. Built by the caller from CLI flags and
/// the config file; the core never reads configuration itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Check every file, ignoring per-file pragma detection.
    pub all: bool,
    pub weak: bool,
    pub declarations: Option<PathBuf>,
    /// Terminate background checker servers at run end.
    pub kill: bool,
    /// Stop the pipeline on the first failing file.
    pub abort: bool,
    /// Audible notification on failure.
    pub beep: bool,
    /// Fold location-less continuation fragments into their predecessor.
    pub collapse: bool,
    pub reporter: Reporter,
    /// Directory searched for the sentinel checker config.
    pub config_root: PathBuf,
    /// Checker binary override; `None` resolves `FLOWGATE_BIN`, then `flow`.
    pub checker: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            all: false,
            weak: false,
            declarations: None,
            kill: false,
            abort: false,
            beep: true,
            collapse: false,
            reporter: Reporter::Text,
            config_root: PathBuf::from("."),
            checker: None,
        }
    }
}

/// Run-scoped state, created at run start and threaded through each
/// per-file call. Replaces ambient module state so nothing leaks across
/// runs when a host process checks multiple projects.
#[derive(Debug)]
pub struct RunContext {
    pub options: RunOptions,
    pub passed: bool,
    pub servers: ServerRegistry,
}

/// What a finished run reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: bool,
    /// Present when server teardown ran (`kill` set and servers registered).
    pub stop: Option<StopReport>,
}

impl RunContext {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            passed: true,
            servers: ServerRegistry::new(),
        }
    }

    pub(crate) fn checker_options(&self) -> CheckerOptions {
        CheckerOptions {
            all: self.options.all,
            weak: self.options.weak,
            declarations: self.options.declarations.clone(),
        }
    }

    pub(crate) fn checker_bin(&self) -> String {
        self.options.checker.clone().unwrap_or_else(checker_bin)
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            2
        }
    }

    /// End the run: tear down background servers when requested, then
    /// hand the accumulated verdict to the caller.
    pub fn finish(self) -> RunSummary {
        let stop = if self.options.kill && !self.servers.is_empty() {
            Some(stop_servers_with(&self.checker_bin(), &self.servers))
        } else {
            None
        };

        RunSummary {
            passed: self.passed,
            stop,
        }
    }
}
