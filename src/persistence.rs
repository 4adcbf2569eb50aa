use anyhow::{Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MARKS_KEY: &str = "marks";
pub const RULES_KEY: &str = "rules";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("stored value for `{key}` is corrupt: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed key-value store: one pretty-printed JSON document per key
/// under a state directory. Stands in for the durable storage the chart
/// host provides.
#[derive(Debug, Clone)]
pub struct KvStore {
    root: PathBuf,
}

impl KvStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create state directory {}", root.display()))?;
        Ok(Self { root })
    }

    /// Loads the value stored under `key`. An absent key yields the default,
    /// not an error; a corrupt document is discarded with a warning and the
    /// default takes its place.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.key_path(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read stored `{}` state", key))
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(source) => {
                let err = PersistenceError::Parse {
                    key: key.to_string(),
                    source,
                };
                warn!("{}; starting from defaults", err);
                Ok(T::default())
            }
        }
    }

    /// Serializes and writes `value` under `key`, replacing any previous
    /// document.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSet;
    use crate::models::{Direction, Mark, StopLossSource, Theme};

    fn scratch_store(name: &str) -> KvStore {
        let dir = std::env::temp_dir()
            .join("markbench_tests")
            .join(format!("{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        KvStore::open(dir).expect("open store")
    }

    #[test]
    fn absent_key_yields_default() {
        let store = scratch_store("absent");
        let marks: Vec<Mark> = store.load_or_default(MARKS_KEY).unwrap();
        assert!(marks.is_empty());
        let rules: RuleSet = store.load_or_default(RULES_KEY).unwrap();
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn marks_round_trip_every_field() {
        let store = scratch_store("round_trip");
        let mut mark_store = crate::marks::MarkStore::new();
        mark_store.add(1_700_000_000, Direction::Long, Theme::Dark);
        mark_store.add(1_700_000_300, Direction::Short, Theme::Light);
        store.save(MARKS_KEY, &mark_store.marks().to_vec()).unwrap();

        let restored: Vec<Mark> = store.load_or_default(MARKS_KEY).unwrap();
        assert_eq!(restored, mark_store.marks().to_vec());
    }

    #[test]
    fn marks_serialize_time_as_plain_number() {
        let store = scratch_store("plain_number");
        let mut mark_store = crate::marks::MarkStore::new();
        mark_store.add(1_700_000_000, Direction::Long, Theme::Dark);
        store.save(MARKS_KEY, &mark_store.marks().to_vec()).unwrap();

        let raw = std::fs::read_to_string(
            std::env::temp_dir()
                .join("markbench_tests")
                .join(format!("plain_number_{}", std::process::id()))
                .join("marks.json"),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value[0]["time"].is_i64());
    }

    #[test]
    fn corrupt_document_recovers_to_default() {
        let store = scratch_store("corrupt");
        let mut rules = RuleSet::default();
        rules.long.stop_loss_source = StopLossSource::Atr;
        store.save(RULES_KEY, &rules).unwrap();

        let path = std::env::temp_dir()
            .join("markbench_tests")
            .join(format!("corrupt_{}", std::process::id()))
            .join("rules.json");
        std::fs::write(&path, "{ not json").unwrap();

        let restored: RuleSet = store.load_or_default(RULES_KEY).unwrap();
        assert_eq!(restored, RuleSet::default());
    }
}
