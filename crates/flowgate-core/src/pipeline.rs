use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::check::{check_file, FileCheck};
use crate::context::RunContext;

/// Sentinel config file the checker requires in the working directory.
pub const SENTINEL_CONFIG: &str = ".flowconfig";

/// Items the pipeline cannot process. These fail the run but never stop
/// the remaining files (unless the caller aborts).
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("'{0}' does not exist")]
    Missing(PathBuf),

    #[error("'{0}' is not a regular file")]
    NotAFile(PathBuf),

    #[error("could not read '{path}'")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How one file moved through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDisposition {
    /// No pragma and `all` not set; the file passes through untouched.
    SkippedNoPragma,
    /// Sentinel config missing; warned, file passes through untouched.
    SkippedNoConfig,
    Checked(FileCheck),
}

/// Marker comment opting a file into checking.
pub fn has_pragma(contents: &str) -> bool {
    static PRAGMA: OnceLock<Regex> = OnceLock::new();
    PRAGMA
        .get_or_init(|| Regex::new(r"(?i)@flow\b").expect("pragma regex is valid"))
        .is_match(contents)
}

pub fn sentinel_config_exists(root: &Path) -> bool {
    root.join(SENTINEL_CONFIG).is_file()
}

/// Run one file through the eligibility gate and, when eligible, through
/// the checker. The file itself is never modified.
pub fn process_file(ctx: &mut RunContext, path: &Path) -> Result<FileDisposition, InputError> {
    let meta = std::fs::metadata(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            InputError::Missing(path.to_path_buf())
        } else {
            InputError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if !meta.is_file() {
        return Err(InputError::NotAFile(path.to_path_buf()));
    }

    if !ctx.options.all {
        let contents = std::fs::read_to_string(path).map_err(|source| InputError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        if !has_pragma(&contents) {
            debug!(path = %path.display(), "no pragma, passing through");
            return Ok(FileDisposition::SkippedNoPragma);
        }
    }

    if !sentinel_config_exists(&ctx.options.config_root) {
        warn!(
            "missing {} in '{}'; skipping check",
            SENTINEL_CONFIG,
            ctx.options.config_root.display()
        );
        return Ok(FileDisposition::SkippedNoConfig);
    }

    Ok(FileDisposition::Checked(check_file(ctx, path)))
}
