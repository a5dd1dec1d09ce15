use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::servers::ServerRegistry;

/// Environment variable overriding the checker binary. Defaults to `flow`
/// on PATH.
pub const BIN_ENV: &str = "FLOWGATE_BIN";

pub fn checker_bin() -> String {
    std::env::var(BIN_ENV).unwrap_or_else(|_| "flow".to_string())
}

/// Flags forwarded to the checker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckerOptions {
    /// Check every file, not just those with the pragma.
    pub all: bool,
    /// Weak-mode checking.
    pub weak: bool,
    /// Additional library/declaration search path.
    pub declarations: Option<PathBuf>,
}

impl CheckerOptions {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.all {
            args.push("--all".to_string());
        }
        if self.weak {
            args.push("--weak".to_string());
        }
        if let Some(lib) = &self.declarations {
            args.push("--lib".to_string());
            args.push(lib.display().to_string());
        }

        args
    }
}

/// What one invocation produced: the stdout buffer on success, the error
/// text otherwise. Downstream never sees the process itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerOutput {
    pub success: bool,
    pub raw: String,
}

/// Run the checker for one file and collect its raw output.
///
/// With no extra flags the server-backed `status` command is used and the
/// target's directory is recorded in `registry` so the server can be torn
/// down at run end. Extra flags only apply at server start, so their
/// presence forces a one-shot `check` instead.
///
/// The checker writes progress chatter to stderr even on success and exits
/// nonzero when it finds type errors, so neither signal alone marks
/// failure: an invocation failed when it produced no stdout. Spawn errors
/// are folded into the same shape; this function never escalates them.
pub fn run_checker(
    target: &Path,
    options: &CheckerOptions,
    registry: &mut ServerRegistry,
) -> CheckerOutput {
    run_checker_with(&checker_bin(), target, options, registry)
}

/// As [`run_checker`], with the binary given explicitly instead of
/// resolved from the environment.
pub fn run_checker_with(
    bin: &str,
    target: &Path,
    options: &CheckerOptions,
    registry: &mut ServerRegistry,
) -> CheckerOutput {
    let flags = options.to_args();
    let one_shot = !flags.is_empty();

    let command = if one_shot {
        "check"
    } else {
        if let Some(dir) = target.parent() {
            registry.register(dir);
        }
        "status"
    };

    debug!(
        checker = bin,
        command,
        target = %target.display(),
        ?flags,
        "invoking checker"
    );

    let output = match Command::new(bin)
        .arg(command)
        .args(&flags)
        .arg(target)
        .arg("--json")
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            return CheckerOutput {
                success: false,
                raw: format!("failed to launch checker '{bin}': {err}"),
            };
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if stdout.trim().is_empty() {
        let mut reason = String::from_utf8_lossy(&output.stderr)
            .trim_end()
            .to_string();
        if reason.is_empty() {
            reason = format!("checker exited with {} and produced no output", output.status);
        }
        return CheckerOutput {
            success: false,
            raw: reason,
        };
    }

    CheckerOutput {
        success: true,
        raw: stdout,
    }
}
