use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use quire_core::KeyValueStore;
use tempfile::NamedTempFile;
use tracing::{debug, info};

const STORE_FILE_NAME: &str = "store.json";

/// Key-value store kept in one JSON object file. Every write rewrites the
/// file atomically so a crash never leaves a half-written store behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let path = path.to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str::<BTreeMap<String, String>>(&raw).with_context(|| {
                    format!("{} is not a JSON object of strings", path.display())
                })?
            }
        } else {
            BTreeMap::new()
        };

        info!(store = %path.display(), keys = entries.len(), "opened key-value store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> anyhow::Result<()> {
        debug!(file = %self.path.display(), keys = self.entries.len(), "saving store atomically");

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        let serialized = serde_json::to_string_pretty(&self.entries)?;
        writeln!(temp, "{serialized}")?;
        temp.flush()?;

        temp.persist(&self.path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.path.display(), err))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn delete(&mut self, key: &str) -> anyhow::Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("quire").join(STORE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(".quire").join(STORE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_survive_reopen() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path).expect("open store");
        store.set("groq_api_keys", "[\"gsk_1\"]").expect("set");
        store.set("groq_api_key", "legacy").expect("set");
        store.delete("groq_api_key").expect("delete");

        let reopened = FileStore::open(&path).expect("reopen store");
        assert_eq!(
            reopened.get("groq_api_keys").expect("get").as_deref(),
            Some("[\"gsk_1\"]")
        );
        assert_eq!(reopened.get("groq_api_key").expect("get"), None);
    }

    #[test]
    fn rejects_non_object_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("store.json");
        fs::write(&path, "[1, 2]").expect("write");
        assert!(FileStore::open(&path).is_err());
    }
}
