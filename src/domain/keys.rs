//! Cache key naming. Compound keys joined with `/`:
//!
//! - `<ns>/years`           set of year numbers
//! - `<ns>/weeks`           set of `YYYY-WW` week identifiers
//! - `<ns>/year/<YYYY>`     year record
//! - `<ns>/week/<YYYY-WW>`  week record
//! - `<ns>/day/<YYYY-MM-DD>` day record

use crate::domain::WeekNumber;
use chrono::NaiveDate;

pub const DEFAULT_NAMESPACE: &str = "temporal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
}

impl KeySpace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn years_set(&self) -> String {
        format!("{}/years", self.namespace)
    }

    pub fn weeks_set(&self) -> String {
        format!("{}/weeks", self.namespace)
    }

    pub fn year(&self, year: i32) -> String {
        format!("{}/year/{}", self.namespace, year)
    }

    pub fn week(&self, week: WeekNumber) -> String {
        format!("{}/week/{}", self.namespace, week)
    }

    pub fn day(&self, date: NaiveDate) -> String {
        format!("{}/day/{}", self.namespace, date.format("%Y-%m-%d"))
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
