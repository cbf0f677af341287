use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::KeyValueStorage;

/// One file per key under `dir`, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[tracing::instrument(skip(dir))]
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let dir = dir.to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        info!(dir = %dir.display(), "opened file storage");
        Ok(Self { dir })
    }

    /// Maps a key to its file. Bytes outside `[A-Za-z0-9._-]` are written as
    /// `%XX`, so distinct keys always land in distinct files.
    pub fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        if key.is_empty() {
            return Err(anyhow!("storage key cannot be empty"));
        }
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
                file_name.push(char::from(byte));
            } else {
                let _ = write!(file_name, "%{byte:02X}");
            }
        }
        Ok(self.dir.join(format!("{file_name}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            debug!(file = %path.display(), "no stored value");
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        Ok(Some(raw))
    }

    #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        debug!(file = %path.display(), "writing value atomically");

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_escape_unsafe_bytes() {
        let temp = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();
        assert_eq!(
            storage.path_for("ticklist/todos v1").unwrap(),
            temp.path().join("ticklist%2Ftodos%20v1.json")
        );
        assert_eq!(
            storage.path_for("ticklist.todos.v1").unwrap(),
            temp.path().join("ticklist.todos.v1.json")
        );
        assert_eq!(storage.path_for("100%").unwrap(), temp.path().join("100%25.json"));
        assert!(storage.path_for("").is_err());
    }

    #[test]
    fn distinct_keys_map_to_distinct_files() {
        let temp = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();
        let keys = ["todos/v1", "todos_v1", "todos%2Fv1", " k", "k", "k "];
        let paths: std::collections::HashSet<PathBuf> =
            keys.iter().map(|key| storage.path_for(key).unwrap()).collect();
        assert_eq!(paths.len(), keys.len());
    }
}
