//! Configuration loading for the CLI.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use flowgate_types::ConfigFile;

pub const DEFAULT_CONFIG: &str = "flowgate.toml";

/// Load the configuration file. An explicitly given path must exist and
/// parse; the default `./flowgate.toml` is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG), false),
    };

    if !path.is_file() {
        if required {
            bail!("config file '{}' not found", path.display());
        }
        return Ok(ConfigFile::default());
    }

    debug!("loading config from '{}'", path.display());

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgate_types::Reporter;

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn explicit_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowgate.toml");
        std::fs::write(
            &path,
            "[defaults]\nall = true\nreporter = \"json\"\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.all, Some(true));
        assert_eq!(cfg.defaults.reporter, Some(Reporter::Json));
    }

    #[test]
    fn explicit_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowgate.toml");
        std::fs::write(&path, "defaults = 3\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("parse config"));
    }
}
