use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::invoke::checker_bin;

/// Directories with a live background checker server, collected during one
/// run. Owned by the run context; deduplicated and iterated in a stable
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerRegistry {
    dirs: BTreeSet<PathBuf>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the directory was not yet registered.
    pub fn register(&mut self, dir: &Path) -> bool {
        self.dirs.insert(dir.to_path_buf())
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopFailure {
    pub dir: PathBuf,
    pub reason: String,
}

/// Result of a teardown pass. `attempted` counts every registered
/// directory, including those whose stop failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopReport {
    pub attempted: usize,
    pub failures: Vec<StopFailure>,
}

impl StopReport {
    pub fn all_stopped(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Terminate the background server in every registered directory,
/// sequentially. A failed stop is recorded and does not prevent the
/// remaining directories from being processed.
pub fn stop_servers(registry: &ServerRegistry) -> StopReport {
    stop_servers_with(&checker_bin(), registry)
}

/// As [`stop_servers`], with the binary given explicitly instead of
/// resolved from the environment.
pub fn stop_servers_with(bin: &str, registry: &ServerRegistry) -> StopReport {
    let mut report = StopReport::default();

    for dir in registry.dirs() {
        report.attempted += 1;
        debug!(dir = %dir.display(), "stopping checker server");

        let failure = match Command::new(bin).arg("stop").current_dir(dir).output() {
            Ok(output) if output.status.success() => None,
            Ok(output) => Some(format!(
                "stop exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end()
            )),
            Err(err) => Some(format!("failed to launch checker '{bin}': {err}")),
        };

        if let Some(reason) = failure {
            warn!(dir = %dir.display(), %reason, "checker server did not stop");
            report.failures.push(StopFailure {
                dir: dir.to_path_buf(),
                reason,
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_dedupes_and_orders() {
        let mut registry = ServerRegistry::new();
        assert!(registry.register(Path::new("/b")));
        assert!(registry.register(Path::new("/a")));
        assert!(!registry.register(Path::new("/b")));

        assert_eq!(registry.len(), 2);
        let dirs: Vec<_> = registry.dirs().collect();
        assert_eq!(dirs, [Path::new("/a"), Path::new("/b")]);
    }

    #[test]
    fn empty_registry_stops_nothing() {
        let report = stop_servers_with("/nonexistent/bin", &ServerRegistry::new());
        assert_eq!(report.attempted, 0);
        assert!(report.all_stopped());
    }

    #[test]
    fn teardown_continues_past_failures() {
        let mut registry = ServerRegistry::new();
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        registry.register(a.path());
        registry.register(b.path());

        let report = stop_servers_with("/nonexistent/flowgate-checker-bin", &registry);

        assert_eq!(report.attempted, 2);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures[0].reason.contains("failed to launch checker"));
    }

    #[cfg(unix)]
    #[test]
    fn teardown_reports_success() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("fake-checker");
        let mut f = std::fs::File::create(&bin).unwrap();
        writeln!(f, "#!/bin/sh\nexit 0").unwrap();
        drop(f);
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut registry = ServerRegistry::new();
        registry.register(dir.path());

        let report = stop_servers_with(bin.to_str().unwrap(), &registry);
        assert_eq!(report.attempted, 1);
        assert!(report.all_stopped());
    }
}
