use std::collections::BTreeMap;

use anyhow::{Context, bail};

use crate::task::Task;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

/// Synchronous string key-value storage the task list is persisted into.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Encodes the list as a JSON array of `{id, text, completed, createdAt}`.
pub fn encode_tasks(tasks: &[Task]) -> anyhow::Result<String> {
    serde_json::to_string(tasks).context("failed to encode task list")
}

pub fn decode_tasks(raw: &str) -> anyhow::Result<Vec<Task>> {
    serde_json::from_str(raw).context("persisted task list is not a valid task array")
}

/// In-process storage. An optional byte quota makes `set` fail once the
/// stored keys and values would exceed it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        if let Some(quota) = self.quota_bytes {
            let replaced = self.entries.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                bail!("storage quota exceeded: {needed} bytes needed, {quota} allowed");
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;

    #[test]
    fn decode_rejects_wrong_shapes() {
        assert!(decode_tasks("not-json").is_err());
        assert!(decode_tasks("null").is_err());
        assert!(decode_tasks("{}").is_err());
        assert!(decode_tasks("42").is_err());
        assert!(decode_tasks(r#"[{"id":"a"}]"#).is_err());
        assert!(decode_tasks("[]").unwrap().is_empty());
    }

    #[test]
    fn decode_accepts_records_from_other_writers() {
        let raw = r#"[{"id":"x","text":"Loaded","completed":true,"createdAt":1700000000000}]"#;
        let tasks = decode_tasks(raw).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, TaskId::from("x"));
        assert!(tasks[0].completed);
        assert_eq!(tasks[0].created_at, 1_700_000_000_000);
    }

    #[test]
    fn memory_quota_rejects_oversized_writes() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("k", "12345").unwrap();
        assert!(storage.set("k", "1234567890").is_err());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("12345"));
        // replacing a value only counts the new size
        storage.set("k", "123456789").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }
}
