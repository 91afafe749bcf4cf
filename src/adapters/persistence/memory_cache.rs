//! Implements CachePort in process memory.
//!
//! Used by tests and as the backing store of the JSON file cache.

use crate::domain::{DomainError, FieldMap};
use crate::ports::CachePort;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

/// Whole keyspace: sets and records share one key namespace.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CacheData {
    sets: HashMap<String, BTreeSet<String>>,
    records: HashMap<String, FieldMap>,
}

impl CacheData {
    pub(crate) fn add_members(&mut self, set_name: &str, members: &[String]) {
        self.records.remove(set_name);
        self.sets
            .entry(set_name.to_string())
            .or_default()
            .extend(members.iter().cloned());
    }

    pub(crate) fn members(&self, set_name: &str) -> Vec<String> {
        self.sets
            .get(set_name)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn merge_record(&mut self, key: &str, fields: &FieldMap) {
        self.sets.remove(key);
        let record = self.records.entry(key.to_string()).or_default();
        for (name, value) in fields {
            record.insert(name.clone(), value.clone());
        }
    }

    pub(crate) fn record(&self, key: &str) -> Option<FieldMap> {
        self.records.get(key).filter(|r| !r.is_empty()).cloned()
    }

    pub(crate) fn remove(&mut self, key: &str) {
        self.sets.remove(key);
        self.records.remove(key);
    }

    pub(crate) fn len(&self) -> usize {
        self.sets.len() + self.records.len()
    }
}

/// In-memory cache. Cheap to construct; contents vanish with the process.
#[derive(Default)]
pub struct MemoryCache {
    data: RwLock<CacheData>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn key_count(&self) -> usize {
        self.data.read().await.len()
    }
}

#[async_trait::async_trait]
impl CachePort for MemoryCache {
    async fn write_set(&self, set_name: &str, members: &[String]) -> Result<(), DomainError> {
        self.data.write().await.add_members(set_name, members);
        Ok(())
    }

    async fn read_set(&self, set_name: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.data.read().await.members(set_name))
    }

    async fn write_record(&self, key: &str, fields: &FieldMap) -> Result<(), DomainError> {
        self.data.write().await.merge_record(key, fields);
        Ok(())
    }

    async fn read_record(&self, key: &str) -> Result<Option<FieldMap>, DomainError> {
        Ok(self.data.read().await.record(key))
    }

    async fn delete_key(&self, key: &str) -> Result<(), DomainError> {
        self.data.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_sets_are_sorted_and_deduplicated() {
        let cache = MemoryCache::new();
        cache
            .write_set("t/years", &["2022".into(), "2020".into()])
            .await
            .unwrap();
        cache
            .write_set("t/years", &["2021".into(), "2020".into()])
            .await
            .unwrap();
        assert_eq!(
            cache.read_set("t/years").await.unwrap(),
            vec!["2020", "2021", "2022"]
        );
        assert!(cache.read_set("t/missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_merge_fields() {
        let cache = MemoryCache::new();
        cache
            .write_record("t/year/2021", &fields(&[("year", "2021"), ("days_in_year", "365")]))
            .await
            .unwrap();
        cache
            .write_record("t/year/2021", &fields(&[("max_week_number", "52")]))
            .await
            .unwrap();
        let record = cache.read_record("t/year/2021").await.unwrap().unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record["max_week_number"], "52");
    }

    #[tokio::test]
    async fn test_delete_key_clears_either_kind() {
        let cache = MemoryCache::new();
        cache.write_set("t/weeks", &["2021-01".into()]).await.unwrap();
        cache
            .write_record("t/week/2021-01", &fields(&[("year", "2021")]))
            .await
            .unwrap();
        assert_eq!(cache.key_count().await, 2);

        cache.delete_key("t/weeks").await.unwrap();
        cache.delete_key("t/week/2021-01").await.unwrap();
        cache.delete_key("t/never-written").await.unwrap();
        assert_eq!(cache.key_count().await, 0);
        assert!(cache.read_record("t/week/2021-01").await.unwrap().is_none());
    }
}
