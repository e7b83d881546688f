use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use quire_core::Config;
use tracing::info;

const CONFIG_FILE_NAME: &str = "quire.toml";

/// `quire.toml` in the current directory and each of its parents, nearest
/// first.
fn candidate_config_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        let mut cursor = Some(cwd.as_path());
        while let Some(path) = cursor {
            candidates.push(path.join(CONFIG_FILE_NAME));
            cursor = path.parent();
        }
    }
    candidates
}

#[tracing::instrument]
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return load_file(path);
    }

    if let Some(found) = candidate_config_paths().into_iter().find(|path| path.is_file()) {
        return load_file(&found);
    }

    info!("no quire.toml found; using built-in settings");
    Ok(Config::embedded())
}

fn load_file(path: &Path) -> anyhow::Result<Config> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    info!(config = %path.display(), "loading quire config");
    Config::from_toml_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::SelectionMode;
    use tempfile::tempdir;

    #[test]
    fn explicit_file_overrides_defaults() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[date_filter]\nmode = \"range\"\n").expect("write");

        let config = load(Some(&path)).expect("load config");
        assert_eq!(config.date_filter.mode, SelectionMode::Range);
        assert_eq!(config.keys.max_per_provider, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = tempdir().expect("tempdir");
        assert!(load(Some(&temp.path().join("absent.toml"))).is_err());
    }
}
