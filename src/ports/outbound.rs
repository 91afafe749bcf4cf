//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, FieldMap};

/// Key-value cache holding the derived calendar.
///
/// Two kinds of values live under string keys: unordered sets of strings
/// (index collections) and flat records (field name -> value). Writes are
/// additive; callers clear a key with `delete_key` before repopulating it.
/// Nothing here is transactional.
#[async_trait::async_trait]
pub trait CachePort: Send + Sync {
    /// Add members to the set stored at `set_name`.
    async fn write_set(&self, set_name: &str, members: &[String]) -> Result<(), DomainError>;

    /// Members of the set, sorted. Empty when the key does not exist.
    async fn read_set(&self, set_name: &str) -> Result<Vec<String>, DomainError>;

    /// Set the given fields on the record at `key` (other fields are kept).
    async fn write_record(&self, key: &str, fields: &FieldMap) -> Result<(), DomainError>;

    /// The record at `key`, or `None` when absent.
    async fn read_record(&self, key: &str) -> Result<Option<FieldMap>, DomainError>;

    /// Remove whatever is stored at `key`. Missing keys are not an error.
    async fn delete_key(&self, key: &str) -> Result<(), DomainError>;

    /// Delete each key, then write its record in full. Backends with
    /// transactions may apply the whole batch at once.
    async fn replace_records(&self, records: &[(String, FieldMap)]) -> Result<(), DomainError> {
        for (key, fields) in records {
            self.delete_key(key).await?;
            self.write_record(key, fields).await?;
        }
        Ok(())
    }

    /// Persist buffered writes. Backends that write through need not override.
    async fn flush(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
