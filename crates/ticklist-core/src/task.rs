use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ID_SUFFIX_LEN: usize = 6;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// A single to-do entry. Field names follow the persisted record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    pub text: String,

    #[serde(default)]
    pub completed: bool,

    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Task {
    pub fn new(id: TaskId, text: String, created_at: i64) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Issues task ids of the form `<base36 millis><6 random base36 chars>`.
///
/// Every id handed out or reserved is remembered, so an id is never produced
/// twice for the lifetime of the generator even if the random suffix repeats
/// within the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    issued: HashSet<TaskId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an externally sourced id (e.g. a loaded task) as taken.
    pub fn reserve(&mut self, id: &TaskId) -> bool {
        self.issued.insert(id.clone())
    }

    pub fn next_id(&mut self, now_millis: i64) -> TaskId {
        let prefix = to_base36(u128::from(now_millis.max(0).unsigned_abs()));
        loop {
            let candidate = TaskId(format!("{prefix}{}", random_suffix()));
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn random_suffix() -> String {
    // The low bits of a v4 uuid are all random.
    let mut value = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(ID_SUFFIX_LEN);
    for _ in 0..ID_SUFFIX_LEN {
        out.push(char::from(BASE36_DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    out
}

fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn ids_carry_time_prefix_and_suffix() {
        let mut ids = IdGenerator::new();
        let id = ids.next_id(36).to_string();
        assert!(id.starts_with("10"));
        assert_eq!(id.len(), 2 + ID_SUFFIX_LEN);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn rapid_ids_in_same_millisecond_never_collide() {
        let mut ids = IdGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..5_000 {
            assert!(seen.insert(ids.next_id(1_700_000_000_000)));
        }
    }

    #[test]
    fn reserved_ids_are_reported_once() {
        let mut ids = IdGenerator::new();
        let id = TaskId::from("abc");
        assert!(ids.reserve(&id));
        assert!(!ids.reserve(&id));
    }

    #[test]
    fn task_serializes_with_camel_case_created_at() {
        let task = Task::new(TaskId::from("a1"), "Buy milk".to_string(), 42);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a1",
                "text": "Buy milk",
                "completed": false,
                "createdAt": 42
            })
        );
    }
}
